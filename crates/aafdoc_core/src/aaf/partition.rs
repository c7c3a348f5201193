use std::fmt;

use crate::aaf::bytes::Cursor;
use crate::aaf::{Auid, Result};

const PARTITION_PREFIX: [u8; 13] = [0x06, 0x0e, 0x2b, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01];

const OP_PREFIXES: [[u8; 12]; 3] = [
	[0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01],
	[0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x02, 0x0d, 0x01, 0x02, 0x01],
	[0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x03, 0x0d, 0x01, 0x02, 0x01],
];

/// Position of a partition pack within the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKind {
	/// Leading partition carrying the header metadata.
	Header,
	/// Essence-bearing body partition.
	Body,
	/// Trailing partition.
	Footer,
}

impl PartitionKind {
	/// Classify a KLV key as a partition pack.
	pub fn from_key(key: &Auid) -> Option<Self> {
		let bytes = key.as_bytes();
		if bytes[..13] != PARTITION_PREFIX {
			return None;
		}

		match bytes[13] {
			0x02 => Some(Self::Header),
			0x03 => Some(Self::Body),
			0x04 => Some(Self::Footer),
			_ => None,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Header => "header",
			Self::Body => "body",
			Self::Footer => "footer",
		}
	}
}

/// Decoded partition pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionHeader {
	/// Partition role.
	pub kind: PartitionKind,
	/// Major format version.
	pub major_version: u16,
	/// Minor format version.
	pub minor_version: u16,
	/// KLV alignment grid size.
	pub kag_size: u32,
	/// Byte offset of this partition.
	pub this_partition: u64,
	/// Byte offset of the previous partition.
	pub previous_partition: u64,
	/// Byte offset of the footer partition, 0 when unknown.
	pub footer_partition: u64,
	/// Header metadata byte count.
	pub header_byte_count: u64,
	/// Index table byte count.
	pub index_byte_count: u64,
	/// Index table stream id.
	pub index_sid: u32,
	/// Essence offset within the body stream.
	pub body_offset: u64,
	/// Essence body stream id.
	pub body_sid: u32,
	/// Operational pattern label.
	pub operational_pattern: Auid,
	/// Essence container labels.
	pub essence_containers: Vec<Auid>,
}

impl PartitionHeader {
	/// Parse a partition pack value.
	pub fn parse(kind: PartitionKind, value: &[u8]) -> Result<Self> {
		let mut cur = Cursor::new(value);
		let mut header = Self {
			kind,
			major_version: cur.read_u16_be()?,
			minor_version: cur.read_u16_be()?,
			kag_size: cur.read_u32_be()?,
			this_partition: cur.read_u64_be()?,
			previous_partition: cur.read_u64_be()?,
			footer_partition: cur.read_u64_be()?,
			header_byte_count: cur.read_u64_be()?,
			index_byte_count: cur.read_u64_be()?,
			index_sid: cur.read_u32_be()?,
			body_offset: cur.read_u64_be()?,
			body_sid: cur.read_u32_be()?,
			operational_pattern: cur.read_auid_be()?,
			essence_containers: Vec::new(),
		};

		if cur.remaining() >= 8 {
			let count = cur.read_u32_be()?;
			let size = cur.read_u32_be()?;
			if size == 16 {
				for _ in 0..count {
					if cur.remaining() < 16 {
						break;
					}
					header.essence_containers.push(cur.read_auid_be()?);
				}
			}
		}

		Ok(header)
	}
}

/// MXF operational pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationalPattern {
	/// Single item, single package.
	Op1a,
	/// Single item, ganged packages.
	Op1b,
	/// Single item, alternate packages.
	Op1c,
	/// Playlist items, single package.
	Op2a,
	/// Playlist items, ganged packages.
	Op2b,
	/// Playlist items, alternate packages.
	Op2c,
	/// Edit items, single package.
	Op3a,
	/// Edit items, ganged packages.
	Op3b,
	/// Edit items, alternate packages.
	Op3c,
	/// One essence track per file.
	OpAtom,
}

impl OperationalPattern {
	/// Classify an operational pattern label.
	pub fn classify(label: &Auid) -> Option<Self> {
		let bytes = label.as_bytes();
		if !OP_PREFIXES.iter().any(|prefix| bytes[..12] == prefix[..]) {
			return None;
		}

		match (bytes[12], bytes[13]) {
			(1, 1) => Some(Self::Op1a),
			(1, 2) => Some(Self::Op1b),
			(1, 3) => Some(Self::Op1c),
			(2, 1) => Some(Self::Op2a),
			(2, 2) => Some(Self::Op2b),
			(2, 3) => Some(Self::Op2c),
			(3, 1) => Some(Self::Op3a),
			(3, 2) => Some(Self::Op3b),
			(3, 3) => Some(Self::Op3c),
			(0x10, _) => Some(Self::OpAtom),
			_ => None,
		}
	}

	/// Conventional label such as `OP1a` or `OPAtom`.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Op1a => "OP1a",
			Self::Op1b => "OP1b",
			Self::Op1c => "OP1c",
			Self::Op2a => "OP2a",
			Self::Op2b => "OP2b",
			Self::Op2c => "OP2c",
			Self::Op3a => "OP3a",
			Self::Op3b => "OP3b",
			Self::Op3c => "OP3c",
			Self::OpAtom => "OPAtom",
		}
	}
}

impl fmt::Display for OperationalPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests;
