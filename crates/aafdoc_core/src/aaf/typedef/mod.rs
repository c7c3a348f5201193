use std::sync::OnceLock;

use crate::aaf::{AafError, Auid, ClassDef, PropertyDef, Result, TypeKey, TypeRegistry, require_classdef, require_typedef};

mod codec;

pub use codec::{INDIRECT_LITTLE_ENDIAN, decode_utf16le, encode_utf16le, iter_utf16_array};

/// Well-known type definition AUIDs the codec matches by identity.
pub mod type_ids {
	use crate::aaf::Auid;

	/// `Boolean`, the special-cased enumeration.
	pub const BOOLEAN: Auid = Auid::from_u128(0x0104_0100_0000_0000_060e_2b34_0104_0101);
	/// `Character`, one UTF-16 code unit.
	pub const CHARACTER: Auid = Auid::from_u128(0x0110_0100_0000_0000_060e_2b34_0104_0101);
	/// `String` of `Character`.
	pub const STRING: Auid = Auid::from_u128(0x0110_0200_0000_0000_060e_2b34_0104_0101);
	/// `Int32`.
	pub const INT32: Auid = Auid::from_u128(0x0101_0700_0000_0000_060e_2b34_0104_0101);
	/// `AUID` record.
	pub const AUID: Auid = Auid::from_u128(0x0103_0100_0000_0000_060e_2b34_0104_0101);
	/// `MobIDType` record.
	pub const MOB_ID: Auid = Auid::from_u128(0x0103_0200_0000_0000_060e_2b34_0104_0101);
	/// `Rational` record.
	pub const RATIONAL: Auid = Auid::from_u128(0x0301_0100_0000_0000_060e_2b34_0104_0101);
	/// `DateStruct` record.
	pub const DATE_STRUCT: Auid = Auid::from_u128(0x0301_0500_0000_0000_060e_2b34_0104_0101);
	/// `TimeStruct` record.
	pub const TIME_STRUCT: Auid = Auid::from_u128(0x0301_0600_0000_0000_060e_2b34_0104_0101);
	/// `TimeStamp` record.
	pub const TIMESTAMP: Auid = Auid::from_u128(0x0301_0700_0000_0000_060e_2b34_0104_0101);
}

/// How a property of a given type is laid out in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
	/// Inline bytes.
	Data,
	/// Single owned child object.
	StrongRef,
	/// Single key naming an object elsewhere.
	WeakRef,
	/// Ordered owned children.
	StrongRefVector,
	/// Ordered keys.
	WeakRefVector,
	/// Unordered owned children.
	StrongRefSet,
	/// Unordered keys.
	WeakRefSet,
	/// Out-of-line byte stream.
	DataStream,
}

impl StoreFormat {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Data => "data",
			Self::StrongRef => "strong_ref",
			Self::WeakRef => "weak_ref",
			Self::StrongRefVector => "strong_ref_vector",
			Self::WeakRefVector => "weak_ref_vector",
			Self::StrongRefSet => "strong_ref_set",
			Self::WeakRefSet => "weak_ref_set",
			Self::DataStream => "data_stream",
		}
	}
}

/// Variant-specific layout of a type definition.
///
/// Child types are held by AUID and resolved through the registry, so
/// recursive definitions need no owning cycles.
#[derive(Debug, Clone)]
pub enum TypeKind {
	/// Fixed-width integer.
	Integer {
		/// Width in bytes: 1, 2, 4, or 8.
		size: u8,
		/// Two's complement when true.
		signed: bool,
	},
	/// One UTF-16 code unit.
	Character,
	/// Null-terminated UTF-16 text.
	String {
		/// Character element type.
		element: Auid,
	},
	/// Owning object reference.
	StrongRef {
		/// Referenced class.
		class: Auid,
	},
	/// Non-owning reference resolved through a property path.
	WeakRef {
		/// Referenced class.
		class: Auid,
		/// Property AUIDs leading from `Root` to the target collection.
		target_set: Vec<Auid>,
	},
	/// Integer-coded labels.
	Enum {
		/// Underlying integer type.
		element: Auid,
		/// Labels, parallel to `values`.
		names: Vec<Box<str>>,
		/// Codes, parallel to `names`.
		values: Vec<i64>,
	},
	/// AUID-coded labels that may be extended at runtime.
	ExtEnum {
		/// Labels, parallel to `values`.
		names: Vec<Box<str>>,
		/// Codes, parallel to `names`.
		values: Vec<Auid>,
	},
	/// Array with a declared element count.
	FixedArray {
		/// Element type.
		element: Auid,
		/// Element capacity.
		count: u32,
	},
	/// Array sized by its byte span.
	VarArray {
		/// Element type.
		element: Auid,
	},
	/// Duplicate-free unordered collection.
	Set {
		/// Element type.
		element: Auid,
	},
	/// Ordered named members.
	Record {
		/// Member names, parallel to `members`.
		names: Vec<Box<str>>,
		/// Member types, parallel to `names`.
		members: Vec<Auid>,
	},
	/// Transparent alias.
	Rename {
		/// Aliased type.
		renamed: Auid,
	},
	/// Self-describing value: byte order, type AUID, payload.
	Indirect,
	/// Indirect value whose type may be unknown to the reader.
	Opaque,
	/// Out-of-line bytes.
	Stream,
}

/// Type definition: identity plus codec layout.
#[derive(Debug, Clone)]
pub struct TypeDef {
	/// Type identifier.
	pub auid: Auid,
	/// Type name.
	pub name: Box<str>,
	/// Variant layout.
	pub kind: TypeKind,
	byte_size: OnceLock<Option<usize>>,
}

/// One step of a resolved weak-reference property path.
#[derive(Debug, Clone)]
pub struct PathHop {
	/// Class the property was found on.
	pub class: Box<str>,
	/// Matched property.
	pub property: PropertyDef,
}

impl TypeDef {
	/// Build a type definition.
	pub fn new(auid: Auid, name: &str, kind: TypeKind) -> Self {
		Self {
			auid,
			name: name.into(),
			kind,
			byte_size: OnceLock::new(),
		}
	}

	/// Fixed encoded size, or `None` for variable-length kinds.
	///
	/// Record sizes are summed once and memoized.
	pub fn byte_size(&self, registry: &dyn TypeRegistry) -> Option<usize> {
		match &self.kind {
			TypeKind::Integer { size, .. } => Some(usize::from(*size)),
			TypeKind::Character => Some(2),
			TypeKind::Enum { element, .. } => registry.lookup_typedef(TypeKey::Auid(*element))?.byte_size(registry),
			TypeKind::ExtEnum { .. } => Some(16),
			TypeKind::FixedArray { element, count } => {
				let element = registry.lookup_typedef(TypeKey::Auid(*element))?.byte_size(registry)?;
				element.checked_mul(*count as usize)
			}
			TypeKind::Record { members, .. } => *self.byte_size.get_or_init(|| record_size(registry, members)),
			TypeKind::Rename { renamed } => registry.lookup_typedef(TypeKey::Auid(*renamed))?.byte_size(registry),
			TypeKind::String { .. }
			| TypeKind::StrongRef { .. }
			| TypeKind::WeakRef { .. }
			| TypeKind::VarArray { .. }
			| TypeKind::Set { .. }
			| TypeKind::Indirect
			| TypeKind::Opaque
			| TypeKind::Stream => None,
		}
	}

	/// Storage layout for properties of this type.
	pub fn store_format(&self, registry: &dyn TypeRegistry) -> Result<StoreFormat> {
		match &self.kind {
			TypeKind::StrongRef { .. } => Ok(StoreFormat::StrongRef),
			TypeKind::WeakRef { .. } => Ok(StoreFormat::WeakRef),
			TypeKind::Stream => Ok(StoreFormat::DataStream),
			TypeKind::VarArray { element } => Ok(match require_typedef(registry, *element)?.store_format(registry)? {
				StoreFormat::StrongRef => StoreFormat::StrongRefVector,
				StoreFormat::WeakRef => StoreFormat::WeakRefVector,
				_ => StoreFormat::Data,
			}),
			TypeKind::Set { element } => match require_typedef(registry, *element)?.store_format(registry)? {
				StoreFormat::StrongRef => Ok(StoreFormat::StrongRefSet),
				StoreFormat::WeakRef => Ok(StoreFormat::WeakRefSet),
				StoreFormat::Data => Ok(StoreFormat::Data),
				other => Err(AafError::mismatch(&self.name, format!("set element store format {} is not supported", other.as_str()))),
			},
			TypeKind::Rename { renamed } => require_typedef(registry, *renamed)?.store_format(registry),
			_ => Ok(StoreFormat::Data),
		}
	}

	/// Class referenced by a reference type or by a collection of references.
	pub fn ref_classdef<'r>(&self, registry: &'r dyn TypeRegistry) -> Option<&'r ClassDef> {
		match &self.kind {
			TypeKind::StrongRef { class } | TypeKind::WeakRef { class, .. } => registry.lookup_classdef(TypeKey::Auid(*class)),
			TypeKind::VarArray { element } | TypeKind::Set { element } | TypeKind::Rename { renamed: element } => {
				registry.lookup_typedef(TypeKey::Auid(*element))?.ref_classdef(registry)
			}
			_ => None,
		}
	}

	/// Resolve a weak reference's target set into property hops from `Root`.
	pub fn property_path(&self, registry: &dyn TypeRegistry) -> Result<Vec<PathHop>> {
		let TypeKind::WeakRef { target_set, .. } = &self.kind else {
			return Err(AafError::mismatch(&self.name, "only weak references carry a property path"));
		};

		let mut class = Some(require_classdef(registry, "Root")?);
		let mut hops = Vec::with_capacity(target_set.len());
		for auid in target_set {
			let field = format!("{}.target_set", self.name);
			let current = class.ok_or(AafError::UnresolvedReference { field: field.clone(), key: *auid })?;
			let property = current
				.properties
				.iter()
				.find(|prop| prop.auid == *auid)
				.ok_or(AafError::UnresolvedReference { field, key: *auid })?;

			class = registry
				.lookup_typedef(TypeKey::Auid(property.typedef))
				.and_then(|typedef| typedef.ref_classdef(registry));
			hops.push(PathHop {
				class: current.name.clone(),
				property: property.clone(),
			});
		}

		Ok(hops)
	}
}

fn record_size(registry: &dyn TypeRegistry, members: &[Auid]) -> Option<usize> {
	let mut total = 0_usize;
	for member in members {
		total = total.checked_add(registry.lookup_typedef(TypeKey::Auid(*member))?.byte_size(registry)?)?;
	}
	if total == 0 { None } else { Some(total) }
}
