use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::aaf::{Auid, MobId};

/// Cooked property value produced by the type codec.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
	/// Boolean (special-cased enum).
	Bool(bool),
	/// Signed integer of any declared width.
	I64(i64),
	/// Unsigned integer of any declared width.
	U64(u64),
	/// UTF-16 text decoded to UTF-8.
	String(String),
	/// Enumeration label.
	Enum(Box<str>),
	/// 128-bit identifier.
	Auid(Auid),
	/// 256-bit mob identifier.
	MobId(MobId),
	/// Numerator/denominator pair.
	Rational(Rational),
	/// Calendar date.
	Date(NaiveDate),
	/// Time of day.
	Time(NaiveTime),
	/// Date and time of day.
	Timestamp(NaiveDateTime),
	/// Opaque bytes (streams).
	Bytes(Vec<u8>),
	/// Ordered sequence.
	Array(Vec<Value>),
	/// Duplicate-free collection; wire order is not preserved.
	Set(BTreeSet<Value>),
	/// Generic record decoded field by field.
	Record(RecordValue),
}

/// Rational number as stored by AAF and MXF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rational {
	/// Numerator.
	pub numerator: i32,
	/// Denominator.
	pub denominator: i32,
}

impl Rational {
	/// Build a rational from its parts.
	pub const fn new(numerator: i32, denominator: i32) -> Self {
		Self { numerator, denominator }
	}
}

impl fmt::Display for Rational {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.numerator, self.denominator)
	}
}

/// Record value with ordered named members.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordValue {
	/// Record type name.
	pub type_name: Box<str>,
	/// Members in declaration order.
	pub fields: Vec<FieldValue>,
}

/// One named record member.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldValue {
	/// Member name.
	pub name: Box<str>,
	/// Member value.
	pub value: Value,
}

impl RecordValue {
	/// Build a record from `(name, value)` pairs.
	pub fn new(type_name: &str, fields: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
		Self {
			type_name: type_name.into(),
			fields: fields
				.into_iter()
				.map(|(name, value)| FieldValue { name: name.into(), value })
				.collect(),
		}
	}

	/// Look up a member by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.value)
	}
}

impl Value {
	/// Stable label for the value variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Bool(_) => "Bool",
			Self::I64(_) => "I64",
			Self::U64(_) => "U64",
			Self::String(_) => "String",
			Self::Enum(_) => "Enum",
			Self::Auid(_) => "Auid",
			Self::MobId(_) => "MobId",
			Self::Rational(_) => "Rational",
			Self::Date(_) => "Date",
			Self::Time(_) => "Time",
			Self::Timestamp(_) => "Timestamp",
			Self::Bytes(_) => "Bytes",
			Self::Array(_) => "Array",
			Self::Set(_) => "Set",
			Self::Record(_) => "Record",
		}
	}

	/// Widen any integer variant to `i128`.
	pub fn as_integer(&self) -> Option<i128> {
		match self {
			Self::I64(value) => Some(i128::from(*value)),
			Self::U64(value) => Some(i128::from(*value)),
			_ => None,
		}
	}

	/// Borrow text from string or enum-label variants.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			Self::Enum(value) => Some(value),
			_ => None,
		}
	}

	/// Borrow the elements of an array or set as an ordered list.
	pub fn elements(&self) -> Option<Vec<&Value>> {
		match self {
			Self::Array(items) => Some(items.iter().collect()),
			Self::Set(items) => Some(items.iter().collect()),
			_ => None,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(value) => write!(f, "{value}"),
			Self::I64(value) => write!(f, "{value}"),
			Self::U64(value) => write!(f, "{value}"),
			Self::String(value) => write!(f, "{value:?}"),
			Self::Enum(value) => write!(f, "{value}"),
			Self::Auid(value) => write!(f, "{value}"),
			Self::MobId(value) => write!(f, "{value}"),
			Self::Rational(value) => write!(f, "{value}"),
			Self::Date(value) => write!(f, "{value}"),
			Self::Time(value) => write!(f, "{value}"),
			Self::Timestamp(value) => write!(f, "{value}"),
			Self::Bytes(value) => write!(f, "<{} bytes>", value.len()),
			Self::Array(items) => write_list(f, "[", "]", items.iter()),
			Self::Set(items) => write_list(f, "{", "}", items.iter()),
			Self::Record(record) => {
				write!(f, "{} {{", record.type_name)?;
				for (idx, field) in record.fields.iter().enumerate() {
					let sep = if idx == 0 { " " } else { ", " };
					write!(f, "{sep}{}: {}", field.name, field.value)?;
				}
				f.write_str(" }")
			}
		}
	}
}

fn write_list<'a>(f: &mut fmt::Formatter<'_>, open: &str, close: &str, items: impl Iterator<Item = &'a Value>) -> fmt::Result {
	f.write_str(open)?;
	for (idx, item) in items.enumerate() {
		if idx > 0 {
			f.write_str(", ")?;
		}
		write!(f, "{item}")?;
	}
	f.write_str(close)
}
