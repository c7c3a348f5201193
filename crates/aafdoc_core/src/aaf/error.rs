use thiserror::Error;

use crate::aaf::Auid;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, AafError>;

/// Errors produced while decoding property data, reading MXF, and linking.
#[derive(Debug, Error)]
pub enum AafError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Bad key/length framing in the KLV stream.
	#[error("malformed container at offset {at}: {reason}")]
	MalformedContainer {
		/// Byte offset of the offending unit or field.
		at: usize,
		/// Short description of the framing problem.
		reason: &'static str,
	},
	/// Linking was requested for a file that is not OPAtom.
	#[error("unsupported operational pattern {pattern} (only OPAtom can be linked)")]
	UnsupportedOperationalPattern {
		/// Classified pattern label, or `unrecognized`.
		pattern: String,
	},
	/// A strong reference or property path did not resolve.
	#[error("unresolved reference {field} -> {key}")]
	UnresolvedReference {
		/// Field or property carrying the reference.
		field: String,
		/// Referenced key (instance id or property id).
		key: Auid,
	},
	/// Value or byte span does not fit the type it is decoded or encoded with.
	#[error("type mismatch for {type_name}: {reason}")]
	TypeMismatch {
		/// Name of the type definition involved.
		type_name: String,
		/// Human-readable detail.
		reason: String,
	},
	/// Type definition lookup failed.
	#[error("unknown type: {key}")]
	UnknownType {
		/// Name or AUID that was looked up.
		key: String,
	},
	/// Class definition lookup failed.
	#[error("unknown class: {key}")]
	UnknownClass {
		/// Name or AUID that was looked up.
		key: String,
	},
	/// Class definition has no property with the requested name.
	#[error("class {class} has no property {property}")]
	UnknownProperty {
		/// Class name.
		class: String,
		/// Requested property name.
		property: String,
	},
	/// Required field was absent at link time.
	#[error("{class} is missing required field {field}")]
	MissingRequiredField {
		/// Source object class label.
		class: &'static str,
		/// Missing field name.
		field: &'static str,
	},
	/// The file contained no preface object.
	#[error("preface not found")]
	MissingPreface,
}

impl AafError {
	/// Build a [`AafError::TypeMismatch`] for a named type.
	pub(crate) fn mismatch(type_name: &str, reason: impl Into<String>) -> Self {
		Self::TypeMismatch {
			type_name: type_name.to_owned(),
			reason: reason.into(),
		}
	}
}
