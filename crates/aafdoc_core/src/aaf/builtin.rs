use crate::aaf::typedef::type_ids;
use crate::aaf::{Auid, ClassDef, Dictionary, PropertyDef, TypeDef, TypeKind};

/// `AAFKLV` container definition: essence stored in KLV-wrapped MXF.
pub const CONTAINER_AAFKLV: Auid = Auid::from_u128(0x4313_b572_d8ba_11d2_809b_0060_0814_3e6f);

const ROOT: Auid = Auid::from_u128(0xb3b3_98a5_1c90_11d4_8053_0800_3621_0804);

/// Extension property carried by Avid-flavoured descriptors.
pub const FRAME_SAMPLE_SIZE: Auid = Auid::from_u128(0xa024_0060_94eb_75cb_ce2a_ca50_51ab_11d3);
/// Extension property naming an Avid resolution.
pub const RESOLUTION_ID: Auid = Auid::from_u128(0xa024_0060_94eb_75cb_ce2a_ca4d_51ab_11d3);
/// Extension property carrying an application-defined mob code.
pub const APP_CODE: Auid = Auid::from_u128(0xa022_0060_94eb_75cb_96c4_6992_4f62_11d3);

const fn ty(code: u32) -> Auid {
	Auid::from_u128(((code as u128) << 96) | 0x0000_0000_060e_2b34_0104_0101)
}

const fn class(code: u8) -> Auid {
	Auid::from_u128(0x0d01_0101_0101_0000_060e_2b34_0206_0101 | ((code as u128) << 72))
}

/// Synthesized property AUID for a builtin property with local id `pid`.
pub const fn property_auid(pid: u16) -> Auid {
	Auid::from_u128(((pid as u128) << 112) | 0x0000_0000_0000_0000_060e_2b34_0101_0101)
}

const UINT8: Auid = ty(0x0101_0100);
const UINT16: Auid = ty(0x0101_0200);
const UINT32: Auid = ty(0x0101_0300);
const UINT64: Auid = ty(0x0101_0400);
const INT8: Auid = ty(0x0101_0500);
const INT16: Auid = ty(0x0101_0600);
const INT64: Auid = ty(0x0101_0800);
const POSITION: Auid = ty(0x0101_2001);
const LENGTH: Auid = ty(0x0101_2002);
const PHASE_FRAME: Auid = ty(0x0101_2300);
const STRING_ARRAY: Auid = ty(0x0401_0500);
const UINT8_ARRAY: Auid = ty(0x0401_0100);
const UINT8_ARRAY12: Auid = ty(0x0401_0200);
const INT32_ARRAY: Auid = ty(0x0401_0300);
const AUID_ARRAY: Auid = ty(0x0401_0600);
const AUID_SET: Auid = ty(0x0403_0100);
const UINT8_ARRAY8: Auid = ty(0x0401_0800);
const RGBA_COMPONENT: Auid = ty(0x0301_0400);
const RGBA_LAYOUT: Auid = ty(0x0402_0100);
const FRAME_LAYOUT: Auid = ty(0x0201_0108);
const RGBA_COMPONENT_KIND: Auid = ty(0x0201_010e);
const PULLDOWN_KIND: Auid = ty(0x0201_0107);
const PULLDOWN_DIRECTION: Auid = ty(0x0201_0106);
const INDIRECT: Auid = ty(0x0410_0300);
const OPAQUE: Auid = ty(0x0410_0400);
const STREAM: Auid = ty(0x0410_0200);

const DATA_DEF_WEAK: Auid = ty(0x0501_0300);
const CONTAINER_DEF_WEAK: Auid = ty(0x0501_0200);

impl Dictionary {
	/// Dictionary preloaded with the standard definitions the MXF link layer
	/// assigns through: integers, strings, records, references, and the mob,
	/// slot, component, descriptor, and locator classes.
	pub fn builtin() -> Self {
		let mut dict = Self::new();
		install_scalars(&mut dict);
		install_records(&mut dict);
		install_collections(&mut dict);
		install_references(&mut dict);
		install_classes(&mut dict);
		dict.insert_containerdef("AAFKLV", CONTAINER_AAFKLV);
		dict
	}
}

fn install_scalars(dict: &mut Dictionary) {
	for (code, name, size, signed) in [
		(UINT8, "UInt8", 1, false),
		(UINT16, "UInt16", 2, false),
		(UINT32, "UInt32", 4, false),
		(UINT64, "UInt64", 8, false),
		(INT8, "Int8", 1, true),
		(INT16, "Int16", 2, true),
		(type_ids::INT32, "Int32", 4, true),
		(INT64, "Int64", 8, true),
	] {
		dict.insert_typedef(TypeDef::new(code, name, TypeKind::Integer { size, signed }));
	}

	dict.insert_typedef(TypeDef::new(POSITION, "PositionType", TypeKind::Rename { renamed: INT64 }));
	dict.insert_typedef(TypeDef::new(LENGTH, "LengthType", TypeKind::Rename { renamed: INT64 }));
	dict.insert_typedef(TypeDef::new(PHASE_FRAME, "PhaseFrameType", TypeKind::Rename { renamed: type_ids::INT32 }));
	dict.insert_typedef(TypeDef::new(type_ids::CHARACTER, "Character", TypeKind::Character));
	dict.insert_typedef(TypeDef::new(
		type_ids::STRING,
		"String",
		TypeKind::String {
			element: type_ids::CHARACTER,
		},
	));
	dict.insert_typedef(TypeDef::new(INDIRECT, "Indirect", TypeKind::Indirect));
	dict.insert_typedef(TypeDef::new(OPAQUE, "Opaque", TypeKind::Opaque));
	dict.insert_typedef(TypeDef::new(STREAM, "Stream", TypeKind::Stream));

	dict.insert_typedef(enum_def(type_ids::BOOLEAN, "Boolean", UINT8, &[("False", 0), ("True", 1)]));
	dict.insert_typedef(enum_def(
		FRAME_LAYOUT,
		"LayoutType",
		UINT8,
		&[
			("FullFrame", 0),
			("SeparateFields", 1),
			("OneField", 2),
			("MixedFields", 3),
			("SegmentedFrame", 4),
		],
	));
	dict.insert_typedef(enum_def(
		RGBA_COMPONENT_KIND,
		"RGBAComponentKind",
		UINT8,
		&[
			("CompNull", 0x00),
			("CompNone", 0x30),
			("CompAlpha", 0x41),
			("CompBlue", 0x42),
			("CompFill", 0x46),
			("CompGreen", 0x47),
			("CompPalette", 0x50),
			("CompRed", 0x52),
			("CompChromaU", 0x55),
			("CompChromaV", 0x56),
			("CompLuma", 0x59),
			("CompAlphaLSBs", 0x61),
			("CompBlueLSBs", 0x62),
			("CompGreenLSBs", 0x67),
			("CompRedLSBs", 0x72),
		],
	));
	dict.insert_typedef(enum_def(
		PULLDOWN_KIND,
		"PulldownKindType",
		UINT8,
		&[
			("TwoThreePD", 0),
			("PALPD", 1),
			("OneToOneNTSC", 2),
			("OneToOnePAL", 3),
			("VideoTapNTSC", 4),
			("OneToOneHDSixty", 5),
			("TwentyFourToSixtyPD", 6),
			("TwoToOnePD", 7),
		],
	));
	dict.insert_typedef(enum_def(
		PULLDOWN_DIRECTION,
		"PulldownDirectionType",
		UINT8,
		&[("TapeToFilmSpeed", 0), ("FilmToTapeSpeed", 1)],
	));
}

fn install_records(dict: &mut Dictionary) {
	dict.insert_typedef(record_def(
		type_ids::AUID,
		"AUID",
		&[("Data1", UINT32), ("Data2", UINT16), ("Data3", UINT16), ("Data4", UINT8_ARRAY8)],
	));
	dict.insert_typedef(record_def(
		type_ids::MOB_ID,
		"MobIDType",
		&[
			("SMPTELabel", UINT8_ARRAY12),
			("length", UINT8),
			("instanceHigh", UINT8),
			("instanceMid", UINT8),
			("instanceLow", UINT8),
			("material", type_ids::AUID),
		],
	));
	dict.insert_typedef(record_def(
		type_ids::RATIONAL,
		"Rational",
		&[("Numerator", type_ids::INT32), ("Denominator", type_ids::INT32)],
	));
	dict.insert_typedef(record_def(
		type_ids::DATE_STRUCT,
		"DateStruct",
		&[("year", INT16), ("month", UINT8), ("day", UINT8)],
	));
	dict.insert_typedef(record_def(
		type_ids::TIME_STRUCT,
		"TimeStruct",
		&[("hour", UINT8), ("minute", UINT8), ("second", UINT8), ("fraction", UINT8)],
	));
	dict.insert_typedef(record_def(
		type_ids::TIMESTAMP,
		"TimeStamp",
		&[("date", type_ids::DATE_STRUCT), ("time", type_ids::TIME_STRUCT)],
	));
	dict.insert_typedef(record_def(RGBA_COMPONENT, "RGBAComponent", &[("Code", RGBA_COMPONENT_KIND), ("Size", UINT8)]));
}

fn install_collections(dict: &mut Dictionary) {
	dict.insert_typedef(TypeDef::new(UINT8_ARRAY, "UInt8Array", TypeKind::VarArray { element: UINT8 }));
	dict.insert_typedef(TypeDef::new(UINT8_ARRAY8, "UInt8Array8", TypeKind::FixedArray { element: UINT8, count: 8 }));
	dict.insert_typedef(TypeDef::new(UINT8_ARRAY12, "UInt8Array12", TypeKind::FixedArray { element: UINT8, count: 12 }));
	dict.insert_typedef(TypeDef::new(
		INT32_ARRAY,
		"Int32Array",
		TypeKind::VarArray {
			element: type_ids::INT32,
		},
	));
	dict.insert_typedef(TypeDef::new(
		STRING_ARRAY,
		"StringArray",
		TypeKind::VarArray {
			element: type_ids::CHARACTER,
		},
	));
	dict.insert_typedef(TypeDef::new(AUID_ARRAY, "AUIDArray", TypeKind::VarArray { element: type_ids::AUID }));
	dict.insert_typedef(TypeDef::new(AUID_SET, "AUIDSet", TypeKind::Set { element: type_ids::AUID }));
	dict.insert_typedef(TypeDef::new(
		RGBA_LAYOUT,
		"RGBALayout",
		TypeKind::FixedArray {
			element: RGBA_COMPONENT,
			count: 8,
		},
	));
}

const STRONG_REFS: &[(u32, &str, u8)] = &[
	(0x0502_0100, "ContentStorage", 0x18),
	(0x0502_0200, "Dictionary", 0x22),
	(0x0502_0300, "EssenceDescriptor", 0x24),
	(0x0502_0600, "Segment", 0x03),
	(0x0502_0900, "Header", 0x2f),
	(0x0502_0a00, "Component", 0x02),
	(0x0502_0b00, "Locator", 0x31),
	(0x0502_0c00, "MobSlot", 0x38),
	(0x0502_0d00, "FileDescriptor", 0x25),
	(0x0502_0e00, "Mob", 0x34),
	(0x0502_0f00, "DataDefinition", 0x1b),
	(0x0502_1000, "ContainerDefinition", 0x20),
];

const VECTORS: &[(u32, &str)] = &[
	(0x0506_0100, "Component"),
	(0x0506_0300, "Locator"),
	(0x0506_0400, "MobSlot"),
	(0x0506_0500, "Segment"),
	(0x0506_0b00, "FileDescriptor"),
];

const SETS: &[(u32, &str)] = &[(0x0505_0500, "Mob"), (0x0505_0300, "DataDefinition"), (0x0505_0400, "ContainerDefinition")];

fn strong_ref(name: &str) -> Auid {
	STRONG_REFS
		.iter()
		.find(|(_, target, _)| *target == name)
		.map_or(Auid::NIL, |(code, _, _)| ty(*code))
}

fn vector(name: &str) -> Auid {
	VECTORS.iter().find(|(_, target)| *target == name).map_or(Auid::NIL, |(code, _)| ty(*code))
}

fn set(name: &str) -> Auid {
	SETS.iter().find(|(_, target)| *target == name).map_or(Auid::NIL, |(code, _)| ty(*code))
}

fn install_references(dict: &mut Dictionary) {
	for (code, target, class_code) in STRONG_REFS {
		dict.insert_typedef(TypeDef::new(
			ty(*code),
			&format!("{target}StrongReference"),
			TypeKind::StrongRef { class: class(*class_code) },
		));
	}

	for (code, target) in VECTORS {
		dict.insert_typedef(TypeDef::new(
			ty(*code),
			&format!("{target}StrongReferenceVector"),
			TypeKind::VarArray { element: strong_ref(target) },
		));
	}

	for (code, target) in SETS {
		dict.insert_typedef(TypeDef::new(
			ty(*code),
			&format!("{target}StrongReferenceSet"),
			TypeKind::Set { element: strong_ref(target) },
		));
	}

	let to_dictionary = [property_auid(pid::ROOT_HEADER), property_auid(pid::HEADER_DICTIONARY)];
	dict.insert_typedef(TypeDef::new(
		DATA_DEF_WEAK,
		"DataDefinitionWeakReference",
		TypeKind::WeakRef {
			class: class(0x1b),
			target_set: [&to_dictionary[..], &[property_auid(pid::DICTIONARY_DATA_DEFS)]].concat(),
		},
	));
	dict.insert_typedef(TypeDef::new(
		CONTAINER_DEF_WEAK,
		"ContainerDefinitionWeakReference",
		TypeKind::WeakRef {
			class: class(0x20),
			target_set: [&to_dictionary[..], &[property_auid(pid::DICTIONARY_CONTAINER_DEFS)]].concat(),
		},
	));
}

mod pid {
	pub const ROOT_HEADER: u16 = 0x0002;
	pub const HEADER_DICTIONARY: u16 = 0x3b04;
	pub const DICTIONARY_DATA_DEFS: u16 = 0x2605;
	pub const DICTIONARY_CONTAINER_DEFS: u16 = 0x2603;
}

type PropSpec = (&'static str, u16, Auid, bool);

fn install_classes(dict: &mut Dictionary) {
	dict.insert_classdef(ClassDef {
		auid: ROOT,
		name: "Root".into(),
		parent: None,
		properties: props(&[("Header", pid::ROOT_HEADER, strong_ref("Header"), false)]),
	});

	let classes: Vec<(u8, &str, Option<u8>, Vec<PropSpec>)> = vec![
		(0x01, "InterchangeObject", None, vec![]),
		(
			0x2f,
			"Header",
			Some(0x01),
			vec![
				("Content", 0x3b03, strong_ref("ContentStorage"), false),
				("Dictionary", pid::HEADER_DICTIONARY, strong_ref("Dictionary"), false),
			],
		),
		(
			0x22,
			"Dictionary",
			Some(0x01),
			vec![
				("ContainerDefinitions", pid::DICTIONARY_CONTAINER_DEFS, set("ContainerDefinition"), true),
				("DataDefinitions", pid::DICTIONARY_DATA_DEFS, set("DataDefinition"), true),
			],
		),
		(0x18, "ContentStorage", Some(0x01), vec![("Mobs", 0x1901, set("Mob"), false)]),
		(
			0x1a,
			"DefinitionObject",
			Some(0x01),
			vec![
				("Identification", 0x1b01, type_ids::AUID, false),
				("Name", 0x1b02, type_ids::STRING, false),
			],
		),
		(0x1b, "DataDefinition", Some(0x1a), vec![]),
		(0x20, "ContainerDefinition", Some(0x1a), vec![]),
		(
			0x34,
			"Mob",
			Some(0x01),
			vec![
				("MobID", 0x4401, type_ids::MOB_ID, false),
				("Name", 0x4402, type_ids::STRING, true),
				("Slots", 0x4403, vector("MobSlot"), false),
				("LastModified", 0x4404, type_ids::TIMESTAMP, false),
				("CreationTime", 0x4405, type_ids::TIMESTAMP, false),
				("UsageCode", 0x4408, type_ids::AUID, true),
			],
		),
		(0x36, "MasterMob", Some(0x34), vec![]),
		(
			0x37,
			"SourceMob",
			Some(0x34),
			vec![("EssenceDescription", 0x4701, strong_ref("EssenceDescriptor"), false)],
		),
		(
			0x38,
			"MobSlot",
			Some(0x01),
			vec![
				("SlotID", 0x4801, UINT32, false),
				("SlotName", 0x4802, type_ids::STRING, true),
				("Segment", 0x4803, strong_ref("Segment"), false),
				("PhysicalTrackNumber", 0x4804, UINT32, true),
			],
		),
		(
			0x3b,
			"TimelineMobSlot",
			Some(0x38),
			vec![("EditRate", 0x4b01, type_ids::RATIONAL, false), ("Origin", 0x4b02, POSITION, false)],
		),
		(
			0x02,
			"Component",
			Some(0x01),
			vec![
				("DataDefinition", 0x0201, DATA_DEF_WEAK, false),
				("Length", 0x0202, LENGTH, true),
			],
		),
		(0x03, "Segment", Some(0x02), vec![]),
		(0x0f, "Sequence", Some(0x03), vec![("Components", 0x1001, vector("Component"), false)]),
		(
			0x10,
			"SourceReference",
			Some(0x03),
			vec![
				("SourceID", 0x1101, type_ids::MOB_ID, true),
				("SourceMobSlotID", 0x1102, UINT32, false),
			],
		),
		(0x11, "SourceClip", Some(0x10), vec![("StartTime", 0x1201, POSITION, true)]),
		(
			0x14,
			"Timecode",
			Some(0x03),
			vec![
				("Start", 0x1501, POSITION, false),
				("FPS", 0x1502, UINT16, false),
				("Drop", 0x1503, type_ids::BOOLEAN, false),
			],
		),
		(
			0x0c,
			"Pulldown",
			Some(0x03),
			vec![
				("InputSegment", 0x0d01, strong_ref("Segment"), false),
				("PulldownKind", 0x0d02, PULLDOWN_KIND, false),
				("PulldownDirection", 0x0d03, PULLDOWN_DIRECTION, false),
				("PhaseFrame", 0x0d04, PHASE_FRAME, false),
			],
		),
		(0x09, "Filler", Some(0x03), vec![]),
		(
			0x0d,
			"ScopeReference",
			Some(0x03),
			vec![("RelativeScope", 0x0e01, UINT32, false), ("RelativeSlot", 0x0e02, UINT32, false)],
		),
		(
			0x05,
			"EssenceGroup",
			Some(0x03),
			vec![
				("Choices", 0x0501, vector("Segment"), false),
				("StillFrame", 0x0502, strong_ref("Segment"), true),
			],
		),
		(
			0x24,
			"EssenceDescriptor",
			Some(0x01),
			vec![("Locator", 0x2f01, vector("Locator"), true)],
		),
		(
			0x25,
			"FileDescriptor",
			Some(0x24),
			vec![
				("SampleRate", 0x3001, type_ids::RATIONAL, false),
				("Length", 0x3002, LENGTH, false),
				("ContainerFormat", 0x3004, CONTAINER_DEF_WEAK, true),
				("LinkedSlotID", 0x3006, UINT32, true),
			],
		),
		(
			0x27,
			"DigitalImageDescriptor",
			Some(0x25),
			vec![
				("Compression", 0x3201, type_ids::AUID, true),
				("StoredHeight", 0x3202, UINT32, false),
				("StoredWidth", 0x3203, UINT32, false),
				("FrameLayout", 0x320c, FRAME_LAYOUT, false),
				("VideoLineMap", 0x320d, INT32_ARRAY, false),
				("ImageAspectRatio", 0x320e, type_ids::RATIONAL, false),
				("ImageAlignmentFactor", 0x3211, UINT32, true),
			],
		),
		(
			0x28,
			"CDCIDescriptor",
			Some(0x27),
			vec![
				("ComponentWidth", 0x3301, UINT32, false),
				("HorizontalSubsampling", 0x3302, UINT32, false),
				("VerticalSubsampling", 0x3308, UINT32, true),
			],
		),
		(0x29, "RGBADescriptor", Some(0x27), vec![("PixelLayout", 0x3401, RGBA_LAYOUT, false)]),
		(
			0x42,
			"SoundDescriptor",
			Some(0x25),
			vec![
				("QuantizationBits", 0x3d01, UINT32, false),
				("Locked", 0x3d02, type_ids::BOOLEAN, true),
				("AudioSamplingRate", 0x3d03, type_ids::RATIONAL, false),
				("Compression", 0x3d06, type_ids::AUID, true),
				("Channels", 0x3d07, UINT32, false),
			],
		),
		(
			0x48,
			"PCMDescriptor",
			Some(0x42),
			vec![("AverageBPS", 0x3d09, UINT32, false), ("BlockAlign", 0x3d0a, UINT16, false)],
		),
		(
			0x44,
			"MultipleDescriptor",
			Some(0x25),
			vec![("FileDescriptors", 0x3f01, vector("FileDescriptor"), false)],
		),
		(0x4a, "ImportDescriptor", Some(0x24), vec![]),
		(0x2e, "TapeDescriptor", Some(0x24), vec![]),
		(0x31, "Locator", Some(0x01), vec![]),
		(0x32, "NetworkLocator", Some(0x31), vec![("URLString", 0x4001, type_ids::STRING, false)]),
	];

	for (code, name, parent, specs) in classes {
		dict.insert_classdef(ClassDef {
			auid: class(code),
			name: name.into(),
			parent: parent.map(class),
			properties: props(&specs),
		});
	}

	extend_class(dict, class(0x34), PropertyDef {
		auid: APP_CODE,
		name: "AppCode".into(),
		pid: 0xffca,
		typedef: type_ids::INT32,
		optional: true,
	});
	for (auid, name, pid) in [(FRAME_SAMPLE_SIZE, "FrameSampleSize", 0xffcb), (RESOLUTION_ID, "ResolutionID", 0xffcc)] {
		extend_class(dict, class(0x27), PropertyDef {
			auid,
			name: name.into(),
			pid,
			typedef: type_ids::INT32,
			optional: true,
		});
	}
}

fn extend_class(dict: &mut Dictionary, auid: Auid, property: PropertyDef) {
	let Some(existing) = dict.classdefs().iter().find(|class| class.auid == auid) else {
		return;
	};
	let mut updated = existing.clone();
	updated.properties.push(property);
	dict.insert_classdef(updated);
}

fn props(specs: &[PropSpec]) -> Vec<PropertyDef> {
	specs
		.iter()
		.map(|(name, pid, typedef, optional)| PropertyDef {
			auid: property_auid(*pid),
			name: (*name).into(),
			pid: *pid,
			typedef: *typedef,
			optional: *optional,
		})
		.collect()
}

fn enum_def(auid: Auid, name: &str, element: Auid, entries: &[(&str, i64)]) -> TypeDef {
	TypeDef::new(
		auid,
		name,
		TypeKind::Enum {
			element,
			names: entries.iter().map(|(label, _)| (*label).into()).collect(),
			values: entries.iter().map(|(_, code)| *code).collect(),
		},
	)
}

fn record_def(auid: Auid, name: &str, members: &[(&str, Auid)]) -> TypeDef {
	TypeDef::new(
		auid,
		name,
		TypeKind::Record {
			names: members.iter().map(|(member, _)| (*member).into()).collect(),
			members: members.iter().map(|(_, typedef)| *typedef).collect(),
		},
	)
}
