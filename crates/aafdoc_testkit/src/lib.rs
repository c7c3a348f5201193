//! Shared test helpers for workspace crates: synthetic MXF byte builders and
//! ready-made OPAtom fixtures.

/// Header partition pack key (open incomplete header).
pub const HEADER_PARTITION: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x02, 0x04, 0x00];
/// Footer partition pack key.
pub const FOOTER_PARTITION: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x04, 0x04, 0x00];
/// Primer pack key.
pub const PRIMER: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x05, 0x01, 0x00];
/// Essence element key (not a local set).
pub const ESSENCE_ELEMENT: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x01, 0x02, 0x01, 0x01, 0x0d, 0x01, 0x03, 0x01, 0x15, 0x01, 0x05, 0x01];

/// OPAtom operational pattern label.
pub const OP_ATOM: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x02, 0x0d, 0x01, 0x02, 0x01, 0x10, 0x00, 0x00, 0x00];
/// OP1a operational pattern label.
pub const OP_1A: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x01, 0x09, 0x00];

/// Picture data definition label.
pub const PICTURE_DEF: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x01, 0x03, 0x02, 0x02, 0x01, 0x00, 0x00, 0x00];
/// Timecode data definition label.
pub const TIMECODE_DEF: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x01, 0x03, 0x02, 0x01, 0x01, 0x00, 0x00, 0x00];
/// Sound data definition label.
pub const SOUND_DEF: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x01, 0x03, 0x02, 0x02, 0x02, 0x00, 0x00, 0x00];
/// DNxHD compression label.
pub const DNXHD_COMPRESSION: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0a, 0x04, 0x01, 0x02, 0x02, 0x71, 0x01, 0x00, 0x00];

/// `FrameSampleSize` extension UUID in wire order.
pub const FRAME_SAMPLE_SIZE_UID: [u8; 16] = [0xa0, 0x24, 0x00, 0x60, 0x94, 0xeb, 0x75, 0xcb, 0xce, 0x2a, 0xca, 0x50, 0x51, 0xab, 0x11, 0xd3];
/// `ResolutionID` extension UUID in wire order.
pub const RESOLUTION_ID_UID: [u8; 16] = [0xa0, 0x24, 0x00, 0x60, 0x94, 0xeb, 0x75, 0xcb, 0xce, 0x2a, 0xca, 0x4d, 0x51, 0xab, 0x11, 0xd3];
/// `AppCode` extension UUID in wire order.
pub const APP_CODE_UID: [u8; 16] = [0xa0, 0x22, 0x00, 0x60, 0x94, 0xeb, 0x75, 0xcb, 0x96, 0xc4, 0x69, 0x92, 0x4f, 0x62, 0x11, 0xd3];

/// Structural metadata class keys by their byte-14 code.
pub mod class {
	const fn key(code: u8) -> [u8; 16] {
		[0x06, 0x0e, 0x2b, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0d, 0x01, 0x01, 0x01, 0x01, 0x01, code, 0x00]
	}

	/// Preface.
	pub const PREFACE: [u8; 16] = key(0x2f);
	/// Content storage.
	pub const CONTENT_STORAGE: [u8; 16] = key(0x18);
	/// Material package.
	pub const MATERIAL_PACKAGE: [u8; 16] = key(0x36);
	/// Source package.
	pub const SOURCE_PACKAGE: [u8; 16] = key(0x37);
	/// Timeline track.
	pub const TRACK: [u8; 16] = key(0x3b);
	/// Sequence.
	pub const SEQUENCE: [u8; 16] = key(0x0f);
	/// Source clip.
	pub const SOURCE_CLIP: [u8; 16] = key(0x11);
	/// Timecode component.
	pub const TIMECODE: [u8; 16] = key(0x14);
	/// Pulldown.
	pub const PULLDOWN: [u8; 16] = key(0x0c);
	/// Filler.
	pub const FILLER: [u8; 16] = key(0x09);
	/// Scope reference.
	pub const SCOPE_REFERENCE: [u8; 16] = key(0x0d);
	/// Essence group.
	pub const ESSENCE_GROUP: [u8; 16] = key(0x05);
	/// Multiple descriptor.
	pub const MULTIPLE_DESCRIPTOR: [u8; 16] = key(0x44);
	/// CDCI picture descriptor.
	pub const CDCI_DESCRIPTOR: [u8; 16] = key(0x28);
	/// RGBA picture descriptor.
	pub const RGBA_DESCRIPTOR: [u8; 16] = key(0x29);
	/// Sound descriptor.
	pub const SOUND_DESCRIPTOR: [u8; 16] = key(0x42);
	/// PCM descriptor.
	pub const PCM_DESCRIPTOR: [u8; 16] = key(0x48);
	/// Import descriptor.
	pub const IMPORT_DESCRIPTOR: [u8; 16] = key(0x4a);
	/// Tape descriptor.
	pub const TAPE_DESCRIPTOR: [u8; 16] = key(0x2e);
	/// Network locator.
	pub const NETWORK_LOCATOR: [u8; 16] = key(0x32);
	/// Essence container data.
	pub const ESSENCE_DATA: [u8; 16] = key(0x23);
	/// Identification set, outside the reader dispatch table.
	pub const IDENTIFICATION: [u8; 16] = key(0x30);
}

/// Deterministic instance id.
pub fn id(n: u8) -> [u8; 16] {
	let mut out = [0_u8; 16];
	out[0] = 0x1d;
	out[15] = n;
	out
}

/// Deterministic UMID with material number ending in `n`.
pub fn mob_id(n: u8) -> [u8; 32] {
	let mut out = [0_u8; 32];
	out[..12].copy_from_slice(&[0x06, 0x0a, 0x2b, 0x34, 0x01, 0x01, 0x01, 0x05, 0x01, 0x01, 0x0d, 0x20]);
	out[12] = 0x13;
	out[16] = 0x4d;
	out[31] = n;
	out
}

/// BER length: short form below 128, four-byte long form otherwise.
pub fn ber(len: usize) -> Vec<u8> {
	if len < 0x80 {
		return vec![len as u8];
	}
	let bytes = (len as u32).to_be_bytes();
	vec![0x83, bytes[1], bytes[2], bytes[3]]
}

/// Frame one key-length-value unit.
pub fn klv(key: [u8; 16], value: &[u8]) -> Vec<u8> {
	let mut out = key.to_vec();
	out.extend(ber(value.len()));
	out.extend_from_slice(value);
	out
}

/// Strong-reference array payload: count, element size, ids.
pub fn ref_array(ids: &[[u8; 16]]) -> Vec<u8> {
	let mut out = Vec::with_capacity(8 + ids.len() * 16);
	out.extend_from_slice(&(ids.len() as u32).to_be_bytes());
	out.extend_from_slice(&16_u32.to_be_bytes());
	for id in ids {
		out.extend_from_slice(id);
	}
	out
}

/// UTF-16BE payload with a terminator.
pub fn utf16be(text: &str) -> Vec<u8> {
	let mut out: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
	out.extend_from_slice(&[0, 0]);
	out
}

/// Rational payload: two big-endian 32-bit integers.
pub fn rational(numerator: i32, denominator: i32) -> Vec<u8> {
	let mut out = numerator.to_be_bytes().to_vec();
	out.extend_from_slice(&denominator.to_be_bytes());
	out
}

/// Packed timestamp payload.
pub fn timestamp(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8, quarter_ms: u8) -> Vec<u8> {
	let mut out = year.to_be_bytes().to_vec();
	out.extend_from_slice(&[month, day, hour, minute, second, quarter_ms]);
	out
}

/// Builder for one local set.
#[derive(Debug, Clone)]
pub struct LocalSet {
	key: [u8; 16],
	body: Vec<u8>,
}

impl LocalSet {
	/// Start a local set with an instance id tag.
	pub fn new(key: [u8; 16], instance: [u8; 16]) -> Self {
		Self::anonymous(key).tag(0x3c0a, &instance)
	}

	/// Start a local set without an instance id.
	pub fn anonymous(key: [u8; 16]) -> Self {
		Self { key, body: Vec::new() }
	}

	/// Append a raw tag.
	pub fn tag(mut self, tag: u16, payload: &[u8]) -> Self {
		self.body.extend_from_slice(&tag.to_be_bytes());
		self.body.extend_from_slice(&(payload.len() as u16).to_be_bytes());
		self.body.extend_from_slice(payload);
		self
	}

	/// Append a single strong reference.
	pub fn strong_ref(self, tag: u16, target: [u8; 16]) -> Self {
		self.tag(tag, &target)
	}

	/// Append a strong-reference array.
	pub fn refs(self, tag: u16, targets: &[[u8; 16]]) -> Self {
		self.tag(tag, &ref_array(targets))
	}

	/// Append a UTF-16BE string.
	pub fn string(self, tag: u16, text: &str) -> Self {
		self.tag(tag, &utf16be(text))
	}

	/// Append a rational.
	pub fn rational(self, tag: u16, numerator: i32, denominator: i32) -> Self {
		self.tag(tag, &rational(numerator, denominator))
	}

	/// Append a big-endian `u8`.
	pub fn u8(self, tag: u16, value: u8) -> Self {
		self.tag(tag, &[value])
	}

	/// Append a big-endian `u16`.
	pub fn u16(self, tag: u16, value: u16) -> Self {
		self.tag(tag, &value.to_be_bytes())
	}

	/// Append a big-endian `u32`.
	pub fn u32(self, tag: u16, value: u32) -> Self {
		self.tag(tag, &value.to_be_bytes())
	}

	/// Append a big-endian `i32`.
	pub fn i32(self, tag: u16, value: i32) -> Self {
		self.tag(tag, &value.to_be_bytes())
	}

	/// Append a big-endian `i64`.
	pub fn i64(self, tag: u16, value: i64) -> Self {
		self.tag(tag, &value.to_be_bytes())
	}

	/// Frame the set as a KLV unit.
	pub fn build(&self) -> Vec<u8> {
		klv(self.key, &self.body)
	}
}

/// Primer pack with the standard 18-byte stride.
pub fn primer(entries: &[(u16, [u8; 16])]) -> Vec<u8> {
	let mut body = Vec::new();
	for (tag, uid) in entries {
		body.extend_from_slice(&tag.to_be_bytes());
		body.extend_from_slice(uid);
	}
	primer_raw(entries.len() as u32, 18, &body)
}

/// Primer pack with an arbitrary header.
pub fn primer_raw(count: u32, stride: u32, body: &[u8]) -> Vec<u8> {
	let mut value = count.to_be_bytes().to_vec();
	value.extend_from_slice(&stride.to_be_bytes());
	value.extend_from_slice(body);
	klv(PRIMER, &value)
}

/// Partition pack with the given key and operational pattern.
pub fn partition(key: [u8; 16], op: [u8; 16]) -> Vec<u8> {
	let mut value = Vec::new();
	value.extend_from_slice(&1_u16.to_be_bytes());
	value.extend_from_slice(&3_u16.to_be_bytes());
	value.extend_from_slice(&1_u32.to_be_bytes());
	for field in [0_u64; 5] {
		value.extend_from_slice(&field.to_be_bytes());
	}
	value.extend_from_slice(&0_u32.to_be_bytes());
	value.extend_from_slice(&0_u64.to_be_bytes());
	value.extend_from_slice(&1_u32.to_be_bytes());
	value.extend_from_slice(&op);
	value.extend_from_slice(&0_u32.to_be_bytes());
	value.extend_from_slice(&16_u32.to_be_bytes());
	klv(key, &value)
}

/// Accumulates KLV units into a file image.
#[derive(Debug, Clone, Default)]
pub struct MxfBuilder {
	bytes: Vec<u8>,
}

impl MxfBuilder {
	/// Start a file with a header partition for `op`.
	pub fn new(op: [u8; 16]) -> Self {
		Self::empty().unit(partition(HEADER_PARTITION, op))
	}

	/// Start a file with no partition pack.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Append pre-framed bytes.
	pub fn unit(mut self, bytes: Vec<u8>) -> Self {
		self.bytes.extend(bytes);
		self
	}

	/// Append a local set.
	pub fn set(self, set: LocalSet) -> Self {
		self.unit(set.build())
	}

	/// Return the file image.
	pub fn finish(self) -> Vec<u8> {
		self.bytes
	}
}

/// Ready-made file images.
pub mod fixtures {
	use super::{
		APP_CODE_UID, DNXHD_COMPRESSION, ESSENCE_ELEMENT, FOOTER_PARTITION, FRAME_SAMPLE_SIZE_UID, LocalSet, MxfBuilder, OP_1A, OP_ATOM,
		PICTURE_DEF, TIMECODE_DEF, class, id, klv, mob_id, partition, primer, timestamp,
	};

	/// Material package UMID used by [`opatom_picture`].
	pub const MATERIAL_MOB: u8 = 0xa1;
	/// Source package UMID used by [`opatom_picture`].
	pub const SOURCE_MOB: u8 = 0xb2;

	/// Preface plus content storage listing `packages`.
	pub fn storage(op: [u8; 16], packages: &[[u8; 16]]) -> MxfBuilder {
		MxfBuilder::new(op)
			.unit(primer(&[(0x3c0a, [0; 16]), (0x8001, FRAME_SAMPLE_SIZE_UID), (0x8002, APP_CODE_UID)]))
			.set(
				LocalSet::new(class::PREFACE, id(1))
					.strong_ref(0x3b03, id(2))
					.tag(0x3b09, &op),
			)
			.set(LocalSet::new(class::CONTENT_STORAGE, id(2)).refs(0x1901, packages))
	}

	/// One OPAtom picture file: a material package with picture and
	/// timecode tracks, and a source package with a CDCI descriptor and a
	/// network locator.
	pub fn opatom_picture() -> Vec<u8> {
		storage(OP_ATOM, &[id(10), id(20)])
			.set(
				LocalSet::new(class::MATERIAL_PACKAGE, id(10))
					.tag(0x4401, &mob_id(MATERIAL_MOB))
					.string(0x4402, "interview")
					.refs(0x4403, &[id(11), id(14)])
					.tag(0x4404, &timestamp(2019, 3, 7, 10, 30, 5, 100))
					.tag(0x4405, &timestamp(2019, 3, 7, 10, 29, 0, 0))
					.i32(0x8002, 7),
			)
			.set(
				LocalSet::new(class::TRACK, id(11))
					.u32(0x4801, 1)
					.string(0x4802, "V1")
					.u32(0x4804, 1)
					.rational(0x4b01, 25, 1)
					.i64(0x4b02, 0)
					.strong_ref(0x4803, id(12)),
			)
			.set(
				LocalSet::new(class::SEQUENCE, id(12))
					.tag(0x0201, &PICTURE_DEF)
					.i64(0x0202, 100)
					.refs(0x1001, &[id(13)]),
			)
			.set(
				LocalSet::new(class::SOURCE_CLIP, id(13))
					.tag(0x0201, &PICTURE_DEF)
					.i64(0x0202, 100)
					.i64(0x1201, 0)
					.tag(0x1101, &mob_id(SOURCE_MOB))
					.u32(0x1102, 1),
			)
			.set(
				LocalSet::new(class::TRACK, id(14))
					.u32(0x4801, 2)
					.rational(0x4b01, 25, 1)
					.i64(0x4b02, 0)
					.strong_ref(0x4803, id(15)),
			)
			.set(
				LocalSet::new(class::TIMECODE, id(15))
					.tag(0x0201, &TIMECODE_DEF)
					.i64(0x0202, 100)
					.u16(0x1502, 25)
					.u8(0x1503, 0)
					.i64(0x1501, 90_000),
			)
			.set(
				LocalSet::new(class::SOURCE_PACKAGE, id(20))
					.tag(0x4401, &mob_id(SOURCE_MOB))
					.refs(0x4403, &[id(21)])
					.strong_ref(0x4701, id(30)),
			)
			.set(
				LocalSet::new(class::TRACK, id(21))
					.u32(0x4801, 1)
					.rational(0x4b01, 25, 1)
					.i64(0x4b02, 0)
					.strong_ref(0x4803, id(22)),
			)
			.set(
				LocalSet::new(class::SOURCE_CLIP, id(22))
					.tag(0x0201, &PICTURE_DEF)
					.i64(0x0202, 100)
					.i64(0x1201, 0)
					.tag(0x1101, &[0; 32])
					.u32(0x1102, 0),
			)
			.set(
				LocalSet::new(class::CDCI_DESCRIPTOR, id(30))
					.rational(0x3001, 25, 1)
					.i64(0x3002, 100)
					.u32(0x3203, 1920)
					.u32(0x3202, 1080)
					.u8(0x320c, 1)
					.tag(0x320d, &[0, 0, 0, 2, 0, 0, 0, 4, 0, 0, 0, 21, 0, 0, 2, 72])
					.rational(0x320e, 16, 9)
					.tag(0x3201, &DNXHD_COMPRESSION)
					.u32(0x3301, 8)
					.u32(0x3302, 2)
					.u32(0x3308, 1)
					.i32(0x8001, 458_752)
					.refs(0x2f01, &[id(31)]),
			)
			.set(LocalSet::new(class::NETWORK_LOCATOR, id(31)).string(0x4001, "file:///media/interview.mxf"))
			.set(LocalSet::new(class::IDENTIFICATION, id(40)).string(0x3c01, "aafdoc testkit"))
			.unit(klv(ESSENCE_ELEMENT, &[0x55; 64]))
			.unit(partition(FOOTER_PARTITION, OP_ATOM))
			.finish()
	}

	/// Two packages where the second package's track segment is dangling.
	pub fn dangling_second_package() -> Vec<u8> {
		storage(OP_ATOM, &[id(10), id(20)])
			.set(
				LocalSet::new(class::MATERIAL_PACKAGE, id(10))
					.tag(0x4401, &mob_id(1))
					.refs(0x4403, &[id(11)]),
			)
			.set(
				LocalSet::new(class::TRACK, id(11))
					.u32(0x4801, 1)
					.rational(0x4b01, 24, 1)
					.strong_ref(0x4803, id(12)),
			)
			.set(LocalSet::new(class::FILLER, id(12)).tag(0x0201, &PICTURE_DEF).i64(0x0202, 48))
			.set(
				LocalSet::new(class::SOURCE_PACKAGE, id(20))
					.tag(0x4401, &mob_id(2))
					.refs(0x4403, &[id(21)]),
			)
			.set(
				LocalSet::new(class::TRACK, id(21))
					.u32(0x4801, 1)
					.rational(0x4b01, 24, 1)
					.strong_ref(0x4803, id(99)),
			)
			.finish()
	}

	/// Minimal OP1a file with one material package.
	pub fn op1a() -> Vec<u8> {
		storage(OP_1A, &[id(10)])
			.set(LocalSet::new(class::MATERIAL_PACKAGE, id(10)).tag(0x4401, &mob_id(1)))
			.finish()
	}
}
