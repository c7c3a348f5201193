use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::aaf::typedef::type_ids;
use crate::aaf::{AafError, Auid, FieldValue, MobId, Rational, RecordValue, Result, TypeDef, TypeKey, TypeKind, TypeRegistry, Value, require_typedef};

/// Byte-order marker leading every indirect value (`'L'`, little-endian).
pub const INDIRECT_LITTLE_ENDIAN: u8 = 0x4c;

const INDIRECT_HEADER: usize = 17;
const TIME_FRACTION_NANOS: u32 = 1_000;
const TIME_FRACTION_MAX: u32 = u8::MAX as u32;

impl TypeDef {
	/// Decode native property bytes into a cooked value.
	pub fn decode(&self, registry: &dyn TypeRegistry, bytes: &[u8]) -> Result<Value> {
		if let Some(expected) = self.byte_size(registry)
			&& bytes.len() != expected
		{
			return Err(AafError::mismatch(&self.name, format!("expected {expected} bytes, got {}", bytes.len())));
		}

		match &self.kind {
			TypeKind::Integer { size, signed } => decode_integer(self, *size, *signed, bytes),
			TypeKind::Character => decode_character(self, bytes),
			TypeKind::String { .. } => Ok(Value::String(decode_utf16le(bytes))),
			TypeKind::StrongRef { .. } | TypeKind::WeakRef { .. } => decode_ref_key(self, bytes),
			TypeKind::Enum { element, names, values } => {
				if self.auid == type_ids::BOOLEAN {
					return decode_bool(self, bytes);
				}
				let code = require_typedef(registry, *element)?.decode(registry, bytes)?;
				let code = code.as_integer().ok_or_else(|| AafError::mismatch(&self.name, "enum element is not an integer"))?;
				values
					.iter()
					.position(|value| i128::from(*value) == code)
					.map(|idx| Value::Enum(names[idx].clone()))
					.ok_or_else(|| AafError::mismatch(&self.name, format!("no label for code {code}")))
			}
			TypeKind::ExtEnum { names, values } => {
				let auid = Auid::from_bytes_le(to_array(self, bytes)?);
				Ok(match values.iter().position(|value| *value == auid) {
					Some(idx) => Value::Enum(names[idx].clone()),
					None => Value::Auid(auid),
				})
			}
			TypeKind::FixedArray { element, count } => {
				let element = require_typedef(registry, *element)?;
				let items = decode_chunks(self, registry, element, bytes)?;
				if items.len() != *count as usize {
					return Err(AafError::mismatch(&self.name, format!("expected {count} elements, got {}", items.len())));
				}
				Ok(Value::Array(items))
			}
			TypeKind::VarArray { element } => {
				let element = require_typedef(registry, *element)?;
				if matches!(element.kind, TypeKind::Character) {
					return Ok(Value::Array(iter_utf16_array(bytes).map(Value::String).collect()));
				}
				Ok(Value::Array(decode_chunks(self, registry, element, bytes)?))
			}
			TypeKind::Set { element } => {
				let element = require_typedef(registry, *element)?;
				let items: BTreeSet<Value> = decode_chunks(self, registry, element, bytes)?.into_iter().collect();
				Ok(Value::Set(items))
			}
			TypeKind::Record { names, members } => decode_record(self, registry, names, members, bytes),
			TypeKind::Rename { renamed } => require_typedef(registry, *renamed)?.decode(registry, bytes),
			TypeKind::Indirect | TypeKind::Opaque => decode_indirect(self, registry, bytes),
			TypeKind::Stream => Ok(Value::Bytes(bytes.to_vec())),
		}
	}

	/// Encode a cooked value into native property bytes.
	pub fn encode(&self, registry: &dyn TypeRegistry, value: &Value) -> Result<Vec<u8>> {
		match &self.kind {
			TypeKind::Integer { size, signed } => encode_integer(self, *size, *signed, value),
			TypeKind::Character => encode_character(self, value),
			TypeKind::String { .. } => match value {
				Value::String(text) => Ok(encode_utf16le(text)),
				other => Err(wrong_kind(self, "String", other)),
			},
			TypeKind::StrongRef { .. } | TypeKind::WeakRef { .. } => encode_ref_key(self, value),
			TypeKind::Enum { element, names, values } => {
				if self.auid == type_ids::BOOLEAN {
					return match value {
						Value::Bool(flag) => Ok(vec![u8::from(*flag)]),
						other => Err(wrong_kind(self, "Bool", other)),
					};
				}
				let code = enum_code(self, names, values, value)?;
				require_typedef(registry, *element)?.encode(registry, &Value::I64(code))
			}
			TypeKind::ExtEnum { names, values } => {
				let auid = match (value, value.as_str()) {
					(Value::Auid(auid), _) => *auid,
					(_, Some(label)) => names
						.iter()
						.position(|name| name.eq_ignore_ascii_case(label))
						.map(|idx| values[idx])
						.ok_or_else(|| AafError::mismatch(&self.name, format!("invalid extensible enum label {label}")))?,
					(other, None) => return Err(wrong_kind(self, "Auid or label", other)),
				};
				Ok(auid.to_bytes_le().to_vec())
			}
			TypeKind::FixedArray { element, count } => {
				let element = require_typedef(registry, *element)?;
				let size = element_size(self, registry, element)?;
				let items = elements_of(self, value)?;
				let capacity = *count as usize;
				if items.len() > capacity {
					return Err(AafError::mismatch(
						&self.name,
						format!("too many elements for fixed array: expected at most {capacity}, got {}", items.len()),
					));
				}

				let mut out = Vec::with_capacity(size * capacity);
				for item in items {
					out.extend(element.encode(registry, item)?);
				}
				out.resize(size * capacity, 0);
				Ok(out)
			}
			TypeKind::VarArray { element } => {
				let element = require_typedef(registry, *element)?;
				let items = elements_of(self, value)?;
				let mut out = Vec::new();
				if matches!(element.kind, TypeKind::Character) {
					for item in items {
						match item {
							Value::String(text) => out.extend(encode_utf16le(text)),
							other => return Err(wrong_kind(self, "String", other)),
						}
					}
					return Ok(out);
				}
				for item in items {
					out.extend(element.encode(registry, item)?);
				}
				Ok(out)
			}
			TypeKind::Set { element } => {
				let element = require_typedef(registry, *element)?;
				let unique: BTreeSet<&Value> = elements_of(self, value)?.into_iter().collect();
				let mut out = Vec::new();
				for item in unique {
					out.extend(element.encode(registry, item)?);
				}
				Ok(out)
			}
			TypeKind::Record { names, members } => encode_record(self, registry, names, members, value),
			TypeKind::Rename { renamed } => require_typedef(registry, *renamed)?.encode(registry, value),
			TypeKind::Indirect | TypeKind::Opaque => self.encode_indirect(registry, value, None),
			TypeKind::Stream => match value {
				Value::Bytes(bytes) => Ok(bytes.clone()),
				other => Err(wrong_kind(self, "Bytes", other)),
			},
		}
	}

	/// Encode a self-describing indirect value.
	///
	/// Without `target`, the element type is guessed from the value: text maps
	/// to `String` and integers map to `Int32`. Other kinds need an explicit
	/// target.
	pub fn encode_indirect(&self, registry: &dyn TypeRegistry, value: &Value, target: Option<TypeKey<'_>>) -> Result<Vec<u8>> {
		let typedef = match target {
			Some(key) => require_typedef(registry, key)?,
			None => {
				let inferred = match value {
					Value::String(_) => type_ids::STRING,
					Value::I64(_) | Value::U64(_) => type_ids::INT32,
					other => return Err(wrong_kind(self, "String or integer (no explicit indirect type)", other)),
				};
				require_typedef(registry, inferred)?
			}
		};

		let mut out = Vec::with_capacity(INDIRECT_HEADER);
		out.push(INDIRECT_LITTLE_ENDIAN);
		out.extend_from_slice(&typedef.auid.to_bytes_le());
		out.extend(typedef.encode(registry, value)?);
		Ok(out)
	}

	/// Return the element type named by an indirect value's header.
	pub fn indirect_typedef<'r>(&self, registry: &'r dyn TypeRegistry, bytes: &[u8]) -> Result<&'r TypeDef> {
		if bytes.len() < INDIRECT_HEADER {
			return Err(AafError::mismatch(&self.name, format!("indirect header needs {INDIRECT_HEADER} bytes, got {}", bytes.len())));
		}
		if bytes[0] != INDIRECT_LITTLE_ENDIAN {
			return Err(AafError::mismatch(&self.name, format!("unsupported byte order marker 0x{:02x}", bytes[0])));
		}

		let mut raw = [0_u8; 16];
		raw.copy_from_slice(&bytes[1..INDIRECT_HEADER]);
		require_typedef(registry, Auid::from_bytes_le(raw))
	}
}

fn decode_indirect(typedef: &TypeDef, registry: &dyn TypeRegistry, bytes: &[u8]) -> Result<Value> {
	let element = typedef.indirect_typedef(registry, bytes)?;
	element.decode(registry, &bytes[INDIRECT_HEADER..])
}

fn decode_integer(typedef: &TypeDef, size: u8, signed: bool, bytes: &[u8]) -> Result<Value> {
	if !matches!(size, 1 | 2 | 4 | 8) || bytes.len() != usize::from(size) {
		return Err(AafError::mismatch(&typedef.name, format!("unsupported integer width {size}")));
	}

	let mut buf = [0_u8; 8];
	buf[..bytes.len()].copy_from_slice(bytes);
	let raw = u64::from_le_bytes(buf);
	if !signed {
		return Ok(Value::U64(raw));
	}

	let shift = 64 - u32::from(size) * 8;
	Ok(Value::I64(((raw << shift) as i64) >> shift))
}

fn encode_integer(typedef: &TypeDef, size: u8, signed: bool, value: &Value) -> Result<Vec<u8>> {
	if !matches!(size, 1 | 2 | 4 | 8) {
		return Err(AafError::mismatch(&typedef.name, format!("unsupported integer width {size}")));
	}

	let number = value.as_integer().ok_or_else(|| wrong_kind(typedef, "integer", value))?;
	let bits = u32::from(size) * 8;
	let (min, max) = if signed {
		(-(1_i128 << (bits - 1)), (1_i128 << (bits - 1)) - 1)
	} else {
		(0, (1_i128 << bits) - 1)
	};
	if number < min || number > max {
		return Err(AafError::mismatch(&typedef.name, format!("{number} does not fit {bits}-bit integer")));
	}

	let bytes = (number as u64).to_le_bytes();
	Ok(bytes[..usize::from(size)].to_vec())
}

fn decode_character(typedef: &TypeDef, bytes: &[u8]) -> Result<Value> {
	let unit = u16::from_le_bytes(to_array(typedef, bytes)?);
	let text: String = char::decode_utf16([unit]).map(|item| item.unwrap_or(char::REPLACEMENT_CHARACTER)).collect();
	Ok(Value::String(text))
}

fn encode_character(typedef: &TypeDef, value: &Value) -> Result<Vec<u8>> {
	let Value::String(text) = value else {
		return Err(wrong_kind(typedef, "String", value));
	};
	let units: Vec<u16> = text.encode_utf16().collect();
	match units.as_slice() {
		[unit] => Ok(unit.to_le_bytes().to_vec()),
		_ => Err(AafError::mismatch(&typedef.name, "character needs exactly one UTF-16 code unit")),
	}
}

fn decode_bool(typedef: &TypeDef, bytes: &[u8]) -> Result<Value> {
	match bytes {
		[byte] => Ok(Value::Bool(*byte == 0x01)),
		_ => Err(AafError::mismatch(&typedef.name, format!("expected 1 byte, got {}", bytes.len()))),
	}
}

fn enum_code(typedef: &TypeDef, names: &[Box<str>], values: &[i64], value: &Value) -> Result<i64> {
	if let Some(label) = value.as_str() {
		return names
			.iter()
			.position(|name| name.as_ref() == label)
			.map(|idx| values[idx])
			.ok_or_else(|| AafError::mismatch(&typedef.name, format!("invalid enum label {label}")));
	}

	let code = value.as_integer().ok_or_else(|| wrong_kind(typedef, "label or integer", value))?;
	values
		.iter()
		.copied()
		.find(|item| i128::from(*item) == code)
		.ok_or_else(|| AafError::mismatch(&typedef.name, format!("invalid enum code {code}")))
}

fn decode_ref_key(typedef: &TypeDef, bytes: &[u8]) -> Result<Value> {
	match bytes.len() {
		16 => Ok(Value::Auid(Auid::from_bytes_le(to_array(typedef, bytes)?))),
		MobId::SIZE => Ok(Value::MobId(MobId::from_bytes_le(to_array(typedef, bytes)?))),
		len => Err(AafError::mismatch(&typedef.name, format!("reference key must be 16 or 32 bytes, got {len}"))),
	}
}

fn encode_ref_key(typedef: &TypeDef, value: &Value) -> Result<Vec<u8>> {
	match value {
		Value::Auid(auid) => Ok(auid.to_bytes_le().to_vec()),
		Value::MobId(mob_id) => Ok(mob_id.to_bytes_le().to_vec()),
		other => Err(wrong_kind(typedef, "Auid or MobId reference key", other)),
	}
}

fn decode_record(typedef: &TypeDef, registry: &dyn TypeRegistry, names: &[Box<str>], members: &[Auid], bytes: &[u8]) -> Result<Value> {
	if typedef.auid == type_ids::MOB_ID {
		return Ok(Value::MobId(MobId::from_bytes_le(to_array(typedef, bytes)?)));
	}
	if typedef.auid == type_ids::AUID {
		return Ok(Value::Auid(Auid::from_bytes_le(to_array(typedef, bytes)?)));
	}

	let mut start = 0_usize;
	let mut fields = Vec::with_capacity(names.len());
	for (name, member) in names.iter().zip(members) {
		let member = require_typedef(registry, *member)?;
		let size = element_size(typedef, registry, member)?;
		let end = start + size;
		let slice = bytes
			.get(start..end)
			.ok_or_else(|| AafError::mismatch(&typedef.name, format!("member {name} runs past {} bytes", bytes.len())))?;
		fields.push((name.as_ref(), member.decode(registry, slice)?));
		start = end;
	}

	if typedef.auid == type_ids::TIME_STRUCT {
		let fraction = member_u32(typedef, &fields, "fraction")?;
		return NaiveTime::from_hms_nano_opt(
			member_u32(typedef, &fields, "hour")?,
			member_u32(typedef, &fields, "minute")?,
			member_u32(typedef, &fields, "second")?,
			fraction.saturating_mul(TIME_FRACTION_NANOS),
		)
		.map(Value::Time)
		.ok_or_else(|| AafError::mismatch(&typedef.name, "invalid time of day"));
	}
	if typedef.auid == type_ids::DATE_STRUCT {
		let year = member_int(typedef, &fields, "year")?;
		let year = i32::try_from(year).map_err(|_| AafError::mismatch(&typedef.name, "year out of range"))?;
		return NaiveDate::from_ymd_opt(year, member_u32(typedef, &fields, "month")?, member_u32(typedef, &fields, "day")?)
			.map(Value::Date)
			.ok_or_else(|| AafError::mismatch(&typedef.name, "invalid calendar date"));
	}
	if typedef.auid == type_ids::TIMESTAMP {
		return match (member(typedef, &fields, "date")?, member(typedef, &fields, "time")?) {
			(Value::Date(date), Value::Time(time)) => Ok(Value::Timestamp(NaiveDateTime::new(*date, *time))),
			_ => Err(AafError::mismatch(&typedef.name, "timestamp members must be date and time")),
		};
	}
	if typedef.auid == type_ids::RATIONAL {
		let numerator = i32::try_from(member_int(typedef, &fields, "Numerator")?);
		let denominator = i32::try_from(member_int(typedef, &fields, "Denominator")?);
		return match (numerator, denominator) {
			(Ok(numerator), Ok(denominator)) => Ok(Value::Rational(Rational::new(numerator, denominator))),
			_ => Err(AafError::mismatch(&typedef.name, "rational member out of range")),
		};
	}

	Ok(Value::Record(RecordValue {
		type_name: typedef.name.clone(),
		fields: fields.into_iter().map(|(name, value)| FieldValue { name: name.into(), value }).collect(),
	}))
}

fn encode_record(typedef: &TypeDef, registry: &dyn TypeRegistry, names: &[Box<str>], members: &[Auid], value: &Value) -> Result<Vec<u8>> {
	let special = match value {
		Value::MobId(mob_id) if typedef.auid == type_ids::MOB_ID => return Ok(mob_id.to_bytes_le().to_vec()),
		Value::Auid(auid) if typedef.auid == type_ids::AUID => return Ok(auid.to_bytes_le().to_vec()),
		Value::Timestamp(stamp) if typedef.auid == type_ids::TIMESTAMP => Some(RecordValue::new(
			&typedef.name,
			[("date", Value::Date(stamp.date())), ("time", Value::Time(stamp.time()))],
		)),
		Value::Date(date) if typedef.auid == type_ids::DATE_STRUCT => Some(RecordValue::new(
			&typedef.name,
			[
				("year", Value::I64(i64::from(date.year()))),
				("month", Value::U64(u64::from(date.month()))),
				("day", Value::U64(u64::from(date.day()))),
			],
		)),
		Value::Time(time) if typedef.auid == type_ids::TIME_STRUCT => Some(RecordValue::new(
			&typedef.name,
			[
				("hour", Value::U64(u64::from(time.hour()))),
				("minute", Value::U64(u64::from(time.minute()))),
				("second", Value::U64(u64::from(time.second()))),
				("fraction", Value::U64(u64::from((time.nanosecond() / TIME_FRACTION_NANOS).min(TIME_FRACTION_MAX)))),
			],
		)),
		Value::Rational(rational) if typedef.auid == type_ids::RATIONAL => Some(RecordValue::new(
			&typedef.name,
			[
				("Numerator", Value::I64(i64::from(rational.numerator))),
				("Denominator", Value::I64(i64::from(rational.denominator))),
			],
		)),
		_ => None,
	};
	let record = match (&special, value) {
		(Some(record), _) => record,
		(None, Value::Record(record)) => record,
		(None, other) => return Err(wrong_kind(typedef, "Record", other)),
	};

	let mut out = Vec::new();
	for (name, member) in names.iter().zip(members) {
		let member = require_typedef(registry, *member)?;
		let field = record
			.get(name)
			.ok_or_else(|| AafError::mismatch(&typedef.name, format!("missing record member {name}")))?;
		out.extend(member.encode(registry, field)?);
	}
	Ok(out)
}

fn member<'v>(typedef: &TypeDef, fields: &'v [(&str, Value)], name: &str) -> Result<&'v Value> {
	fields
		.iter()
		.find(|(field, _)| *field == name)
		.map(|(_, value)| value)
		.ok_or_else(|| AafError::mismatch(&typedef.name, format!("missing record member {name}")))
}

fn member_int(typedef: &TypeDef, fields: &[(&str, Value)], name: &str) -> Result<i128> {
	member(typedef, fields, name)?
		.as_integer()
		.ok_or_else(|| AafError::mismatch(&typedef.name, format!("record member {name} is not an integer")))
}

fn member_u32(typedef: &TypeDef, fields: &[(&str, Value)], name: &str) -> Result<u32> {
	u32::try_from(member_int(typedef, fields, name)?).map_err(|_| AafError::mismatch(&typedef.name, format!("record member {name} out of range")))
}

fn decode_chunks(typedef: &TypeDef, registry: &dyn TypeRegistry, element: &TypeDef, bytes: &[u8]) -> Result<Vec<Value>> {
	let size = element_size(typedef, registry, element)?;
	if bytes.len() % size != 0 {
		return Err(AafError::mismatch(&typedef.name, format!("{} bytes is not a multiple of element size {size}", bytes.len())));
	}
	bytes.chunks_exact(size).map(|chunk| element.decode(registry, chunk)).collect()
}

fn element_size(typedef: &TypeDef, registry: &dyn TypeRegistry, element: &TypeDef) -> Result<usize> {
	match element.byte_size(registry) {
		Some(size) if size > 0 => Ok(size),
		_ => Err(AafError::mismatch(&typedef.name, format!("element type {} has no fixed size", element.name))),
	}
}

fn elements_of<'v>(typedef: &TypeDef, value: &'v Value) -> Result<Vec<&'v Value>> {
	value.elements().ok_or_else(|| wrong_kind(typedef, "Array or Set", value))
}

fn to_array<const N: usize>(typedef: &TypeDef, bytes: &[u8]) -> Result<[u8; N]> {
	bytes
		.try_into()
		.map_err(|_| AafError::mismatch(&typedef.name, format!("expected {N} bytes, got {}", bytes.len())))
}

fn wrong_kind(typedef: &TypeDef, expected: &str, got: &Value) -> AafError {
	AafError::mismatch(&typedef.name, format!("expected {expected}, got {}", got.kind()))
}

/// Decode UTF-16LE text, stopping at the first aligned `00 00` terminator.
pub fn decode_utf16le(bytes: &[u8]) -> String {
	let units: Vec<u16> = bytes
		.chunks_exact(2)
		.map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
		.take_while(|unit| *unit != 0)
		.collect();
	String::from_utf16_lossy(&units)
}

/// Encode text as UTF-16LE followed by a two-byte terminator.
pub fn encode_utf16le(text: &str) -> Vec<u8> {
	let mut out: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
	out.extend_from_slice(&[0, 0]);
	out
}

/// Split a buffer of terminator-delimited UTF-16LE runs into strings.
pub fn iter_utf16_array(bytes: &[u8]) -> impl Iterator<Item = String> + '_ {
	let mut start = 0_usize;
	let mut idx = 0_usize;
	std::iter::from_fn(move || {
		while idx + 1 < bytes.len() {
			let at = idx;
			idx += 2;
			if bytes[at] == 0 && bytes[at + 1] == 0 {
				let run = decode_utf16le(&bytes[start..at]);
				start = idx;
				return Some(run);
			}
		}
		None
	})
}
