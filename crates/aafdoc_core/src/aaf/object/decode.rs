use chrono::NaiveDate;
use tracing::warn;

use crate::aaf::builtin::{APP_CODE, FRAME_SAMPLE_SIZE, RESOLUTION_ID};
use crate::aaf::bytes::{Cursor, Endianness};
use crate::aaf::object::{Family, Field, MxfValue, StrongRef};
use crate::aaf::{Auid, MobId, Rational, RecordValue, Result, Value};

const PIXEL_LAYOUT_ENTRIES: usize = 8;

type Decoded = Option<(Field, MxfValue)>;

pub(super) fn extension_field(uid: Auid) -> Option<Field> {
	match uid {
		uid if uid == FRAME_SAMPLE_SIZE => Some(Field::FrameSampleSize),
		uid if uid == RESOLUTION_ID => Some(Field::ResolutionId),
		uid if uid == APP_CODE => Some(Field::AppCode),
		_ => None,
	}
}

pub(super) fn extension_value(payload: &[u8]) -> Result<MxfValue> {
	Ok(int(Cursor::new(payload).read_i32(Endianness::Big)?))
}

pub(super) fn family_field(family: Family, tag: u16, payload: &[u8], offset: usize) -> Result<Decoded> {
	match family {
		Family::Preface => preface(tag, payload),
		Family::ContentStorage => content_storage(tag, payload),
		Family::Package => package(tag, payload, offset),
		Family::Track => track(tag, payload),
		Family::Component => component(tag, payload),
		Family::Descriptor => descriptor(tag, payload),
		Family::Locator => Ok(match tag {
			0x4001 => Some((Field::UrlString, utf16be(payload))),
			_ => None,
		}),
		Family::EssenceData => Ok(match tag {
			0x2701 => Some((Field::MobId, mob_id(payload)?)),
			_ => None,
		}),
		Family::Other => Ok(None),
	}
}

fn preface(tag: u16, payload: &[u8]) -> Result<Decoded> {
	Ok(match tag {
		0x3b09 => Some((Field::OperationalPattern, MxfValue::Value(Value::Auid(auid(payload)?)))),
		0x3b03 => Some((Field::ContentStorage, strong_ref(payload)?)),
		_ => None,
	})
}

fn content_storage(tag: u16, payload: &[u8]) -> Result<Decoded> {
	Ok(match tag {
		0x1901 => Some((Field::Packages, strong_ref_array(payload)?)),
		0x1902 => Some((Field::EssenceContainerData, strong_ref_array(payload)?)),
		_ => None,
	})
}

fn package(tag: u16, payload: &[u8], offset: usize) -> Result<Decoded> {
	Ok(match tag {
		0x4403 => Some((Field::Slots, strong_ref_array(payload)?)),
		0x4401 => Some((Field::MobId, mob_id(payload)?)),
		0x4402 => Some((Field::Name, utf16be(payload))),
		0x4701 => Some((Field::Descriptor, strong_ref(payload)?)),
		0x4404 => timestamp(payload, offset)?.map(|value| (Field::LastModified, value)),
		0x4405 => timestamp(payload, offset)?.map(|value| (Field::CreationTime, value)),
		0x4408 => Some((Field::UsageCode, MxfValue::Value(Value::Auid(auid(payload)?)))),
		_ => None,
	})
}

fn track(tag: u16, payload: &[u8]) -> Result<Decoded> {
	let mut cur = Cursor::new(payload);
	Ok(match tag {
		0x4b02 => Some((Field::Origin, int(cur.read_i64(Endianness::Big)?))),
		0x4b01 => Some((Field::EditRate, rational(payload)?)),
		0x4803 => Some((Field::Segment, strong_ref(payload)?)),
		0x4804 => Some((Field::PhysicalTrackNumber, uint(cur.read_u32_be()?))),
		0x4801 => Some((Field::SlotId, uint(cur.read_u32_be()?))),
		0x4802 => Some((Field::SlotName, utf16be(payload))),
		_ => None,
	})
}

fn component(tag: u16, payload: &[u8]) -> Result<Decoded> {
	let mut cur = Cursor::new(payload);
	Ok(match tag {
		0x1001 => Some((Field::Components, strong_ref_array(payload)?)),
		0x1201 => Some((Field::StartTime, int(cur.read_i64(Endianness::Big)?))),
		0x1102 => Some((Field::SourceMobSlotId, uint(cur.read_u32_be()?))),
		0x1101 => Some((Field::SourceId, mob_id(payload)?)),
		0x0202 => Some((Field::Length, int(cur.read_i64(Endianness::Big)?))),
		0x0201 => Some((Field::DataDef, label(payload)?)),
		0x1503 => Some((Field::DropFrame, boolean(cur.read_u8()?))),
		0x1502 => Some((Field::Fps, uint(cur.read_u16_be()?))),
		0x1501 => Some((Field::Start, int(cur.read_i64(Endianness::Big)?))),
		0x0501 => Some((Field::Choices, strong_ref_array(payload)?)),
		0x0502 => Some((Field::StillFrame, strong_ref(payload)?)),
		0x0d01 => Some((Field::InputSegment, strong_ref(payload)?)),
		0x0d02 => Some((Field::PulldownKind, uint(cur.read_u8()?))),
		0x0d03 => Some((Field::PulldownDirection, uint(cur.read_u8()?))),
		0x0d04 => Some((Field::PhaseFrame, int(cur.read_i32(Endianness::Big)?))),
		0x0e01 => Some((Field::RelativeScope, int(cur.read_i32(Endianness::Big)?))),
		0x0e02 => Some((Field::RelativeSlot, int(cur.read_i32(Endianness::Big)?))),
		_ => None,
	})
}

fn descriptor(tag: u16, payload: &[u8]) -> Result<Decoded> {
	let mut cur = Cursor::new(payload);
	Ok(match tag {
		0x3f01 => Some((Field::SubDescriptors, strong_ref_array(payload)?)),
		0x3004 => Some((Field::ContainerFormat, label(payload)?)),
		0x3005 => Some((Field::CodecDefinition, label(payload)?)),
		0x3006 => Some((Field::LinkedTrackId, uint(cur.read_u32_be()?))),
		0x3203 => Some((Field::StoredWidth, uint(cur.read_u32_be()?))),
		0x3202 => Some((Field::StoredHeight, uint(cur.read_u32_be()?))),
		0x320d => Some((Field::VideoLineMap, video_line_map(payload)?)),
		0x3211 => Some((Field::ImageAlignmentOffset, uint(cur.read_u32_be()?))),
		0x3002 => Some((Field::Length, int(cur.read_i64(Endianness::Big)?))),
		0x3001 => Some((Field::SampleRate, rational(payload)?)),
		0x3d03 => Some((Field::AudioSamplingRate, rational(payload)?)),
		0x3d0a => Some((Field::BlockAlign, uint(cur.read_u16_be()?))),
		0x3d01 => Some((Field::QuantizationBits, uint(cur.read_u32_be()?))),
		0x3d07 => Some((Field::Channels, uint(cur.read_u32_be()?))),
		0x3d09 => Some((Field::AverageBps, uint(cur.read_u32_be()?))),
		0x3d02 => Some((Field::Locked, boolean(cur.read_u8()?))),
		0x3301 => Some((Field::ComponentWidth, uint(cur.read_u32_be()?))),
		0x320c => Some((Field::FrameLayout, uint(cur.read_u8()?))),
		0x320e => Some((Field::ImageAspectRatio, rational(payload)?)),
		0x3d06 => Some((Field::SoundCompression, label(payload)?)),
		0x3201 => Some((Field::Compression, label(payload)?)),
		0x3302 => Some((Field::HorizontalSubsampling, uint(cur.read_u32_be()?))),
		0x3308 => Some((Field::VerticalSubsampling, uint(cur.read_u32_be()?))),
		0x2f01 => Some((Field::Locator, strong_ref_array(payload)?)),
		0x3401 => Some((Field::PixelLayout, pixel_layout(payload)?)),
		_ => None,
	})
}

fn int(value: impl Into<i64>) -> MxfValue {
	MxfValue::Value(Value::I64(value.into()))
}

fn uint(value: impl Into<u64>) -> MxfValue {
	MxfValue::Value(Value::U64(value.into()))
}

fn boolean(byte: u8) -> MxfValue {
	MxfValue::Value(Value::Bool(byte == 1))
}

pub(super) fn auid(payload: &[u8]) -> Result<Auid> {
	Cursor::new(payload).read_auid_be()
}

fn strong_ref(payload: &[u8]) -> Result<MxfValue> {
	Ok(MxfValue::Ref(StrongRef(auid(payload)?)))
}

/// Universal label stored with its halves swapped into AUID order.
fn label(payload: &[u8]) -> Result<MxfValue> {
	Ok(MxfValue::Value(Value::Auid(auid(payload)?.swap_halves())))
}

fn strong_ref_array(payload: &[u8]) -> Result<MxfValue> {
	let mut cur = Cursor::new(payload);
	let count = cur.read_u32_be()?;
	let _size = cur.read_u32_be()?;

	let mut refs = Vec::with_capacity((count as usize).min(cur.remaining() / 16));
	for _ in 0..count {
		refs.push(StrongRef(cur.read_auid_be()?));
	}
	Ok(MxfValue::RefArray(refs))
}

fn utf16be(payload: &[u8]) -> MxfValue {
	let units: Vec<u16> = payload
		.chunks_exact(2)
		.map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
		.take_while(|unit| *unit != 0)
		.collect();
	MxfValue::Value(Value::String(String::from_utf16_lossy(&units)))
}

fn rational(payload: &[u8]) -> Result<MxfValue> {
	let mut cur = Cursor::new(payload);
	let numerator = cur.read_i32(Endianness::Big)?;
	let denominator = cur.read_i32(Endianness::Big)?;
	Ok(MxfValue::Value(Value::Rational(Rational::new(numerator, denominator))))
}

fn mob_id(payload: &[u8]) -> Result<MxfValue> {
	let raw = Cursor::new(payload).read_array::<{ MobId::SIZE }>()?;
	Ok(MxfValue::Value(Value::MobId(MobId::from_bytes(raw))))
}

/// Packed timestamp: year(16) month day hour minute second quarter-ms.
fn timestamp(payload: &[u8], offset: usize) -> Result<Option<MxfValue>> {
	let packed = Cursor::new(payload).read_u64_be()?;
	let byte = |shift: u32| ((packed >> shift) & 0xff) as u32;
	let year = (packed >> 48) as i32;

	let stamp = NaiveDate::from_ymd_opt(year, byte(40), byte(32))
		.and_then(|date| date.and_hms_milli_opt(byte(24), byte(16), byte(8), byte(0) * 4));
	match stamp {
		Some(stamp) => Ok(Some(MxfValue::Value(Value::Timestamp(stamp)))),
		None => {
			warn!(offset, packed, "invalid timestamp; dropping field");
			Ok(None)
		}
	}
}

fn video_line_map(payload: &[u8]) -> Result<MxfValue> {
	let mut cur = Cursor::new(payload);
	let count = cur.read_u32_be()?;
	let size = cur.read_u32_be()?;

	let mut lines = Vec::with_capacity(2);
	if size == 4 {
		for idx in 0..2 {
			let line = if idx < count { cur.read_i32(Endianness::Big)? } else { 0 };
			lines.push(Value::I64(i64::from(line)));
		}
	}
	Ok(MxfValue::Value(Value::Array(lines)))
}

fn pixel_layout(payload: &[u8]) -> Result<MxfValue> {
	let mut cur = Cursor::new(payload);
	let mut layout = Vec::new();
	for _ in 0..PIXEL_LAYOUT_ENTRIES {
		if cur.remaining() < 2 {
			break;
		}
		let code = cur.read_u8()?;
		let depth = cur.read_u8()?;
		if code == 0 {
			break;
		}
		layout.push(Value::Record(RecordValue::new(
			"RGBAComponent",
			[("Code", Value::U64(u64::from(code))), ("Size", Value::U64(u64::from(depth)))],
		)));
	}
	Ok(MxfValue::Value(Value::Array(layout)))
}
