use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::aaf::klv::TagIter;
use crate::aaf::primer::Primer;
use crate::aaf::{Auid, Result, Value};

mod decode;

const INSTANCE_ID_TAG: u16 = 0x3c0a;
const CLASS_KEY_PREFIX: [u8; 13] = [0x06, 0x0e, 0x2b, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0d, 0x01, 0x01, 0x01, 0x01];

/// Concrete MXF structural metadata class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MxfClass {
	/// Graph root.
	Preface,
	/// Package and essence container index.
	ContentStorage,
	/// Material package.
	MaterialPackage,
	/// File or physical source package.
	SourcePackage,
	/// Timeline track.
	Track,
	/// Ordered component list.
	Sequence,
	/// Reference into a source package.
	SourceClip,
	/// Timecode component.
	Timecode,
	/// Pulldown conversion.
	Pulldown,
	/// Gap.
	Filler,
	/// Reference to a sibling track in an enclosing scope.
	ScopeReference,
	/// Alternate renditions.
	EssenceGroup,
	/// Container of sub-descriptors.
	MultipleDescriptor,
	/// Color-difference picture descriptor.
	CdciDescriptor,
	/// RGBA picture descriptor.
	RgbaDescriptor,
	/// Generic sound descriptor.
	SoundDescriptor,
	/// Wave PCM sound descriptor.
	PcmDescriptor,
	/// Import source descriptor.
	ImportDescriptor,
	/// Tape source descriptor.
	TapeDescriptor,
	/// URL locator.
	NetworkLocator,
	/// Essence container data link.
	EssenceData,
	/// Local set whose class is outside the dispatch table.
	Other(Auid),
}

/// Class-family grouping that selects the tag decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Family {
	Preface,
	ContentStorage,
	Package,
	Track,
	Component,
	Descriptor,
	Locator,
	EssenceData,
	Other,
}

impl MxfClass {
	/// Resolve a local-set key through the dispatch table.
	pub fn from_key(key: &Auid) -> Option<Self> {
		let bytes = key.as_bytes();
		if bytes[..13] != CLASS_KEY_PREFIX || bytes[15] != 0x00 {
			return None;
		}

		Some(match bytes[14] {
			0x2f => Self::Preface,
			0x18 => Self::ContentStorage,
			0x36 => Self::MaterialPackage,
			0x37 => Self::SourcePackage,
			0x3b => Self::Track,
			0x0f => Self::Sequence,
			0x11 => Self::SourceClip,
			0x14 => Self::Timecode,
			0x0c => Self::Pulldown,
			0x09 => Self::Filler,
			0x0d => Self::ScopeReference,
			0x05 => Self::EssenceGroup,
			0x44 => Self::MultipleDescriptor,
			0x28 => Self::CdciDescriptor,
			0x29 => Self::RgbaDescriptor,
			0x42 => Self::SoundDescriptor,
			0x48 => Self::PcmDescriptor,
			0x4a => Self::ImportDescriptor,
			0x2e => Self::TapeDescriptor,
			0x32 => Self::NetworkLocator,
			0x23 => Self::EssenceData,
			_ => return None,
		})
	}

	/// Stable class label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Preface => "Preface",
			Self::ContentStorage => "ContentStorage",
			Self::MaterialPackage => "MaterialPackage",
			Self::SourcePackage => "SourcePackage",
			Self::Track => "Track",
			Self::Sequence => "Sequence",
			Self::SourceClip => "SourceClip",
			Self::Timecode => "Timecode",
			Self::Pulldown => "Pulldown",
			Self::Filler => "Filler",
			Self::ScopeReference => "ScopeReference",
			Self::EssenceGroup => "EssenceGroup",
			Self::MultipleDescriptor => "MultipleDescriptor",
			Self::CdciDescriptor => "CDCIDescriptor",
			Self::RgbaDescriptor => "RGBADescriptor",
			Self::SoundDescriptor => "SoundDescriptor",
			Self::PcmDescriptor => "PCMDescriptor",
			Self::ImportDescriptor => "ImportDescriptor",
			Self::TapeDescriptor => "TapeDescriptor",
			Self::NetworkLocator => "NetworkLocator",
			Self::EssenceData => "EssenceData",
			Self::Other(_) => "Other",
		}
	}

	/// Return whether this is a material or source package.
	pub fn is_package(self) -> bool {
		matches!(self, Self::MaterialPackage | Self::SourcePackage)
	}

	pub(crate) fn family(self) -> Family {
		match self {
			Self::Preface => Family::Preface,
			Self::ContentStorage => Family::ContentStorage,
			Self::MaterialPackage | Self::SourcePackage => Family::Package,
			Self::Track => Family::Track,
			Self::Sequence
			| Self::SourceClip
			| Self::Timecode
			| Self::Pulldown
			| Self::Filler
			| Self::ScopeReference
			| Self::EssenceGroup => Family::Component,
			Self::MultipleDescriptor
			| Self::CdciDescriptor
			| Self::RgbaDescriptor
			| Self::SoundDescriptor
			| Self::PcmDescriptor
			| Self::ImportDescriptor
			| Self::TapeDescriptor => Family::Descriptor,
			Self::NetworkLocator => Family::Locator,
			Self::EssenceData => Family::EssenceData,
			Self::Other(_) => Family::Other,
		}
	}
}

impl fmt::Display for MxfClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Other(key) => write!(f, "Other({key})"),
			_ => f.write_str(self.as_str()),
		}
	}
}

/// Logical field name of a decoded MXF property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Field {
	OperationalPattern,
	ContentStorage,
	Packages,
	EssenceContainerData,
	MobId,
	Name,
	Slots,
	Descriptor,
	LastModified,
	CreationTime,
	UsageCode,
	AppCode,
	SlotId,
	SlotName,
	PhysicalTrackNumber,
	EditRate,
	Origin,
	Segment,
	DataDef,
	Length,
	Components,
	StartTime,
	SourceId,
	SourceMobSlotId,
	Start,
	Fps,
	DropFrame,
	Choices,
	StillFrame,
	InputSegment,
	PulldownKind,
	PulldownDirection,
	PhaseFrame,
	RelativeScope,
	RelativeSlot,
	SubDescriptors,
	ContainerFormat,
	CodecDefinition,
	LinkedTrackId,
	SampleRate,
	StoredWidth,
	StoredHeight,
	VideoLineMap,
	ImageAlignmentOffset,
	ImageAspectRatio,
	FrameLayout,
	Compression,
	ComponentWidth,
	HorizontalSubsampling,
	VerticalSubsampling,
	PixelLayout,
	FrameSampleSize,
	ResolutionId,
	AudioSamplingRate,
	Locked,
	Channels,
	QuantizationBits,
	SoundCompression,
	BlockAlign,
	AverageBps,
	Locator,
	UrlString,
}

impl Field {
	/// MXF property name as written in dumps and error messages.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::OperationalPattern => "OperationalPattern",
			Self::ContentStorage => "ContentStorage",
			Self::Packages => "Packages",
			Self::EssenceContainerData => "EssenceContainerData",
			Self::MobId => "MobID",
			Self::Name => "Name",
			Self::Slots => "Slots",
			Self::Descriptor => "Descriptor",
			Self::LastModified => "LastModified",
			Self::CreationTime => "CreationTime",
			Self::UsageCode => "UsageCode",
			Self::AppCode => "AppCode",
			Self::SlotId => "SlotID",
			Self::SlotName => "SlotName",
			Self::PhysicalTrackNumber => "PhysicalTrackNumber",
			Self::EditRate => "EditRate",
			Self::Origin => "Origin",
			Self::Segment => "Segment",
			Self::DataDef => "DataDef",
			Self::Length => "Length",
			Self::Components => "Components",
			Self::StartTime => "StartTime",
			Self::SourceId => "SourceID",
			Self::SourceMobSlotId => "SourceMobSlotID",
			Self::Start => "Start",
			Self::Fps => "FPS",
			Self::DropFrame => "DropFrame",
			Self::Choices => "Choices",
			Self::StillFrame => "StillFrame",
			Self::InputSegment => "InputSegment",
			Self::PulldownKind => "PulldownKind",
			Self::PulldownDirection => "PulldownDirection",
			Self::PhaseFrame => "PhaseFrame",
			Self::RelativeScope => "RelativeScope",
			Self::RelativeSlot => "RelativeSlot",
			Self::SubDescriptors => "SubDescriptors",
			Self::ContainerFormat => "ContainerFormat",
			Self::CodecDefinition => "CodecDefinition",
			Self::LinkedTrackId => "LinkedTrackID",
			Self::SampleRate => "SampleRate",
			Self::StoredWidth => "StoredWidth",
			Self::StoredHeight => "StoredHeight",
			Self::VideoLineMap => "VideoLineMap",
			Self::ImageAlignmentOffset => "ImageAlignmentOffset",
			Self::ImageAspectRatio => "ImageAspectRatio",
			Self::FrameLayout => "FrameLayout",
			Self::Compression => "Compression",
			Self::ComponentWidth => "ComponentWidth",
			Self::HorizontalSubsampling => "HorizontalSubsampling",
			Self::VerticalSubsampling => "VerticalSubsampling",
			Self::PixelLayout => "PixelLayout",
			Self::FrameSampleSize => "FrameSampleSize",
			Self::ResolutionId => "ResolutionID",
			Self::AudioSamplingRate => "AudioSamplingRate",
			Self::Locked => "Locked",
			Self::Channels => "Channels",
			Self::QuantizationBits => "QuantizationBits",
			Self::SoundCompression => "SoundCompression",
			Self::BlockAlign => "BlockAlign",
			Self::AverageBps => "AverageBPS",
			Self::Locator => "Locator",
			Self::UrlString => "URLString",
		}
	}
}

impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Forward reference to another object by instance id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrongRef(pub Auid);

impl fmt::Display for StrongRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "-> {}", self.0)
	}
}

/// Decoded field payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MxfValue {
	/// Scalar or composite value.
	Value(Value),
	/// Single forward reference.
	Ref(StrongRef),
	/// Ordered forward references.
	RefArray(Vec<StrongRef>),
}

/// Decoded MXF local set.
#[derive(Debug, Clone)]
pub struct MxfObject {
	/// Concrete class.
	pub class: MxfClass,
	/// Instance id from tag `0x3c0a`.
	pub instance_id: Auid,
	/// Byte offset of the local set key.
	pub offset: usize,
	fields: BTreeMap<Field, MxfValue>,
}

impl MxfObject {
	/// Decode one local set body.
	///
	/// Returns `Ok(None)` when the set carries no instance id.
	pub fn read(class: MxfClass, offset: usize, body: &[u8], primer: &Primer) -> Result<Option<Self>> {
		let family = class.family();
		let mut instance_id = None;
		let mut fields = BTreeMap::new();

		for item in TagIter::new(body) {
			let (tag, payload) = item?;
			if tag == INSTANCE_ID_TAG {
				instance_id = Some(decode::auid(payload)?);
				continue;
			}

			let decoded = match primer.get(tag).and_then(decode::extension_field) {
				Some(field) => Some((field, decode::extension_value(payload)?)),
				None => decode::family_field(family, tag, payload, offset)?,
			};
			if let Some((field, value)) = decoded {
				fields.insert(field, value);
			}
		}

		let Some(instance_id) = instance_id else {
			warn!(class = class.as_str(), offset, "local set has no instance id; skipping");
			return Ok(None);
		};

		Ok(Some(Self {
			class,
			instance_id,
			offset,
			fields,
		}))
	}

	/// Look up a decoded field.
	pub fn get(&self, field: Field) -> Option<&MxfValue> {
		self.fields.get(&field)
	}

	/// Return a scalar field.
	pub fn value(&self, field: Field) -> Option<&Value> {
		match self.fields.get(&field)? {
			MxfValue::Value(value) => Some(value),
			_ => None,
		}
	}

	/// Return a single-reference field.
	pub fn strong_ref(&self, field: Field) -> Option<StrongRef> {
		match self.fields.get(&field)? {
			MxfValue::Ref(r) => Some(*r),
			_ => None,
		}
	}

	/// Return a reference-array field.
	pub fn ref_array(&self, field: Field) -> Option<&[StrongRef]> {
		match self.fields.get(&field)? {
			MxfValue::RefArray(refs) => Some(refs),
			_ => None,
		}
	}

	/// Return whether a field was decoded.
	pub fn has(&self, field: Field) -> bool {
		self.fields.contains_key(&field)
	}

	/// Iterate decoded fields in field order.
	pub fn fields(&self) -> impl Iterator<Item = (Field, &MxfValue)> {
		self.fields.iter().map(|(field, value)| (*field, value))
	}
}
