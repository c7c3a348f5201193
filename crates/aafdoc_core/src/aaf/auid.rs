use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

/// 128-bit identifier for types, classes, properties, and MXF instances.
///
/// Bytes are held in wire (big-endian, UL) order. Native AAF property data
/// stores AUIDs with the first three fields little-endian, see
/// [`Auid::from_bytes_le`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Auid(Uuid);

impl Auid {
	/// All-zero identifier.
	pub const NIL: Self = Self(Uuid::nil());

	/// Build from a 128-bit literal in canonical string order.
	pub const fn from_u128(value: u128) -> Self {
		Self(Uuid::from_u128(value))
	}

	/// Build from bytes in wire order.
	pub const fn from_bytes(bytes: [u8; 16]) -> Self {
		Self(Uuid::from_bytes(bytes))
	}

	/// Build from bytes in native AAF order (little-endian leading fields).
	pub fn from_bytes_le(bytes: [u8; 16]) -> Self {
		Self(Uuid::from_bytes_le(bytes))
	}

	/// Return bytes in wire order.
	pub fn as_bytes(&self) -> &[u8; 16] {
		self.0.as_bytes()
	}

	/// Return bytes in native AAF order.
	pub fn to_bytes_le(&self) -> [u8; 16] {
		self.0.to_bytes_le()
	}

	/// Swap the two 8-byte halves, converting between SMPTE UL and AUID layout.
	pub fn swap_halves(&self) -> Self {
		let bytes = self.as_bytes();
		let mut out = [0_u8; 16];
		out[..8].copy_from_slice(&bytes[8..]);
		out[8..].copy_from_slice(&bytes[..8]);
		Self::from_bytes(out)
	}

	/// Return whether every byte is zero.
	pub fn is_nil(&self) -> bool {
		self.0.is_nil()
	}
}

impl fmt::Display for Auid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.hyphenated().fmt(f)
	}
}

impl FromStr for Auid {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Uuid::parse_str(s).map(Self)
	}
}

/// 256-bit SMPTE UMID naming a mob.
///
/// Held as the MXF wire layout: a 16-byte label/instance prefix followed by a
/// 16-byte material number in big-endian order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MobId([u8; 32]);

impl MobId {
	/// Encoded size in bytes.
	pub const SIZE: usize = 32;

	/// Build from wire-order bytes.
	pub const fn from_bytes(bytes: [u8; 32]) -> Self {
		Self(bytes)
	}

	/// Build from the native AAF record layout, where the material number is
	/// stored with little-endian leading fields.
	pub fn from_bytes_le(bytes: [u8; 32]) -> Self {
		let mut out = bytes;
		let mut material = [0_u8; 16];
		material.copy_from_slice(&bytes[16..]);
		out[16..].copy_from_slice(Auid::from_bytes_le(material).as_bytes());
		Self(out)
	}

	/// Return wire-order bytes.
	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}

	/// Return the native AAF record layout.
	pub fn to_bytes_le(&self) -> [u8; 32] {
		let mut out = self.0;
		out[16..].copy_from_slice(&self.material().to_bytes_le());
		out
	}

	/// Return the material number half.
	pub fn material(&self) -> Auid {
		let mut material = [0_u8; 16];
		material.copy_from_slice(&self.0[16..]);
		Auid::from_bytes(material)
	}
}

impl fmt::Display for MobId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("urn:smpte:umid:")?;
		for (idx, chunk) in self.0.chunks(4).enumerate() {
			if idx > 0 {
				f.write_str(".")?;
			}
			for byte in chunk {
				write!(f, "{byte:02x}")?;
			}
		}
		Ok(())
	}
}

/// Error returned when a UMID string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid umid string")]
pub struct ParseMobIdError;

impl FromStr for MobId {
	type Err = ParseMobIdError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let body = s.strip_prefix("urn:smpte:umid:").unwrap_or(s);
		let hex: Vec<u8> = body.bytes().filter(|byte| *byte != b'.').collect();
		if hex.len() != 64 {
			return Err(ParseMobIdError);
		}

		let mut out = [0_u8; 32];
		for (idx, pair) in hex.chunks(2).enumerate() {
			let text = std::str::from_utf8(pair).map_err(|_| ParseMobIdError)?;
			out[idx] = u8::from_str_radix(text, 16).map_err(|_| ParseMobIdError)?;
		}
		Ok(Self(out))
	}
}
