use crate::aaf::bytes::Cursor;
use crate::aaf::{AafError, Auid, Result};

/// Default upper bound on BER long-form length bytes.
pub const MAX_BER_LENGTH_BYTES: usize = 8;

/// One key-length-value unit borrowed from the file bytes.
#[derive(Debug, Clone, Copy)]
pub struct Klv<'a> {
	/// 16-byte key in wire order.
	pub key: Auid,
	/// Byte offset of the key within the source buffer.
	pub offset: usize,
	/// Value bytes, exactly the declared length.
	pub value: &'a [u8],
}

impl Klv<'_> {
	/// Raw key bytes.
	pub fn key_bytes(&self) -> &[u8; 16] {
		self.key.as_bytes()
	}

	/// Return whether this unit is a local set (registry designator `0x53`).
	pub fn is_local_set(&self) -> bool {
		self.key_bytes()[5] == 0x53
	}
}

/// Read a BER-encoded length.
///
/// Short form is one byte below `0x80`. Long form carries the count of
/// following big-endian length bytes in the low seven bits.
pub fn read_ber_length(cursor: &mut Cursor<'_>, max_len_bytes: usize) -> Result<u64> {
	let at = cursor.pos();
	let first = cursor.read_u8()?;
	if first < 0x80 {
		return Ok(u64::from(first));
	}

	let count = usize::from(first & 0x7f);
	if count == 0 {
		return Err(AafError::MalformedContainer {
			at,
			reason: "indefinite BER length",
		});
	}
	if count > max_len_bytes.min(8) {
		return Err(AafError::MalformedContainer {
			at,
			reason: "BER length has too many bytes",
		});
	}

	let mut length = 0_u64;
	for byte in cursor.read_exact(count)? {
		length = (length << 8) | u64::from(*byte);
	}
	Ok(length)
}

/// Iterator over consecutive KLV units.
pub struct KlvIter<'a> {
	cursor: Cursor<'a>,
	offset_base: usize,
	max_ber: usize,
	done: bool,
}

impl<'a> KlvIter<'a> {
	/// Iterate units starting at `offset` within `bytes`.
	pub fn new(bytes: &'a [u8], offset: usize) -> Self {
		Self::with_limit(bytes, offset, MAX_BER_LENGTH_BYTES)
	}

	/// Iterate with an explicit BER length-byte bound.
	pub fn with_limit(bytes: &'a [u8], offset: usize, max_ber: usize) -> Self {
		let slice = bytes.get(offset..).unwrap_or(&[]);
		Self {
			cursor: Cursor::new(slice),
			offset_base: offset,
			max_ber,
			done: false,
		}
	}

	fn read_unit(&mut self) -> Result<Klv<'a>> {
		let offset = self.offset_base + self.cursor.pos();
		let key = self.cursor.read_auid_be()?;
		let length = read_ber_length(&mut self.cursor, self.max_ber)?;

		let length = usize::try_from(length).ok().filter(|len| *len <= self.cursor.remaining());
		let Some(length) = length else {
			return Err(AafError::MalformedContainer {
				at: offset,
				reason: "KLV length overruns input",
			});
		};

		let value = self.cursor.read_exact(length)?;
		Ok(Klv { key, offset, value })
	}
}

impl<'a> Iterator for KlvIter<'a> {
	type Item = Result<Klv<'a>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done || self.cursor.remaining() == 0 {
			self.done = true;
			return None;
		}

		let unit = self.read_unit();
		if unit.is_err() {
			self.done = true;
		}
		Some(unit)
	}
}

/// Iterator over `(tag, payload)` pairs inside one local set body.
///
/// Zero-length items are consumed but not yielded.
pub struct TagIter<'a> {
	cursor: Cursor<'a>,
	done: bool,
}

impl<'a> TagIter<'a> {
	/// Iterate the tags of a local set value.
	pub fn new(body: &'a [u8]) -> Self {
		Self {
			cursor: Cursor::new(body),
			done: false,
		}
	}

	fn read_item(&mut self) -> Result<(u16, &'a [u8])> {
		let tag = self.cursor.read_u16_be()?;
		let size = self.cursor.read_u16_be()?;
		Ok((tag, self.cursor.read_exact(usize::from(size))?))
	}
}

impl<'a> Iterator for TagIter<'a> {
	type Item = Result<(u16, &'a [u8])>;

	fn next(&mut self) -> Option<Self::Item> {
		while !self.done && self.cursor.remaining() > 0 {
			match self.read_item() {
				Ok((_, payload)) if payload.is_empty() => continue,
				Ok(pair) => return Some(Ok(pair)),
				Err(err) => {
					self.done = true;
					return Some(Err(err));
				}
			}
		}

		self.done = true;
		None
	}
}

#[cfg(test)]
mod tests;
