use std::collections::HashMap;

use tracing::warn;

use crate::aaf::Auid;
use crate::aaf::bytes::Cursor;

const PRIMER_KEY: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x05, 0x01, 0x00];

/// Entry stride: 2-byte local tag plus 16-byte UUID.
pub const PRIMER_ENTRY_SIZE: u32 = 18;

/// Default cap on primer entry count.
pub const MAX_PRIMER_ENTRIES: u32 = 65_536;

/// Local tag to UUID mapping read from a primer pack.
#[derive(Debug, Clone, Default)]
pub struct Primer {
	entries: HashMap<u16, Auid>,
}

impl Primer {
	/// Return whether a KLV key names a primer pack.
	///
	/// Byte 7 (registry version) is ignored.
	pub fn is_primer_key(key: &Auid) -> bool {
		let bytes = key.as_bytes();
		bytes[..7] == PRIMER_KEY[..7] && bytes[8..] == PRIMER_KEY[8..]
	}

	/// Parse a primer pack value.
	///
	/// Implausible counts, a stride other than 18, or a truncated table yield
	/// an empty primer.
	pub fn parse(value: &[u8], max_entries: u32) -> Self {
		let mut cur = Cursor::new(value);
		let (Ok(count), Ok(stride)) = (cur.read_u32_be(), cur.read_u32_be()) else {
			warn!(len = value.len(), "primer pack header truncated; using empty primer");
			return Self::default();
		};

		if stride != PRIMER_ENTRY_SIZE {
			warn!(stride, "primer entry stride is not 18; using empty primer");
			return Self::default();
		}
		if count > max_entries {
			warn!(count, max_entries, "primer entry count exceeds limit; using empty primer");
			return Self::default();
		}

		let mut entries = HashMap::with_capacity(count as usize);
		for _ in 0..count {
			let (Ok(tag), Ok(uid)) = (cur.read_u16_be(), cur.read_auid_be()) else {
				warn!(count, parsed = entries.len(), "primer table truncated; using empty primer");
				return Self::default();
			};
			entries.insert(tag, uid);
		}

		Self { entries }
	}

	/// Look up the UUID behind a local tag.
	pub fn get(&self, tag: u16) -> Option<Auid> {
		self.entries.get(&tag).copied()
	}

	/// Number of mapped tags.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return whether no tags are mapped.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate `(tag, uuid)` entries sorted by tag.
	pub fn entries(&self) -> Vec<(u16, Auid)> {
		let mut out: Vec<_> = self.entries.iter().map(|(tag, uid)| (*tag, *uid)).collect();
		out.sort_unstable_by_key(|(tag, _)| *tag);
		out
	}
}

#[cfg(test)]
mod tests;
