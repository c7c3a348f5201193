mod auid;
mod builtin;
mod bytes;
mod error;
mod file;
mod klv;
mod link;
mod model;
mod object;
mod partition;
mod primer;
mod registry;
mod typedef;
mod value;

/// Identifier types.
pub use auid::{Auid, MobId, ParseMobIdError};
/// Builtin dictionary identifiers.
pub use builtin::{APP_CODE, CONTAINER_AAFKLV, FRAME_SAMPLE_SIZE, RESOLUTION_ID, property_auid};
/// Byte cursor primitives.
pub use bytes::{Cursor, Endianness};
/// Error and result aliases.
pub use error::{AafError, Result};
/// MXF file session, read options, and unit counts.
pub use file::{MxfFile, ReadOptions, UnitStats};
/// KLV framing primitives.
pub use klv::{Klv, KlvIter, MAX_BER_LENGTH_BYTES, TagIter, read_ber_length};
/// MXF to AAF link entry point and report types.
pub use link::{LinkFailure, LinkOptions, LinkReport, link_file};
/// AAF object model and destination graph.
pub use model::{AafObject, ContentModel, Property, PropertyData};
/// Decoded MXF local sets.
pub use object::{Field, MxfClass, MxfObject, MxfValue, StrongRef};
/// Partition pack and operational pattern types.
pub use partition::{OperationalPattern, PartitionHeader, PartitionKind};
/// Local tag primer.
pub use primer::{MAX_PRIMER_ENTRIES, PRIMER_ENTRY_SIZE, Primer};
/// Definition registry boundary and in-memory dictionary.
pub use registry::{ClassDef, Dictionary, PropertyDef, TypeKey, TypeRegistry, require_classdef, require_typedef};
/// Type definitions and the property codec.
pub use typedef::{INDIRECT_LITTLE_ENDIAN, PathHop, StoreFormat, TypeDef, TypeKind, decode_utf16le, encode_utf16le, iter_utf16_array, type_ids};
/// Cooked property values.
pub use value::{FieldValue, Rational, RecordValue, Value};
