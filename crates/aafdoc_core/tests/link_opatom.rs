#![allow(missing_docs)]

use aafdoc::aaf::{
	AafError, AafObject, CONTAINER_AAFKLV, ContentModel, Dictionary, LinkOptions, MobId, MxfFile, ReadOptions, Value, link_file,
};
use aafdoc_testkit::fixtures::{self, MATERIAL_MOB, SOURCE_MOB};
use aafdoc_testkit::mob_id;

fn open(bytes: &[u8]) -> MxfFile {
	MxfFile::parse(bytes, &ReadOptions::default()).expect("file parses")
}

fn mob(n: u8) -> MobId {
	MobId::from_bytes(mob_id(n))
}

#[test]
fn opatom_picture_links_both_packages() {
	let dict = Dictionary::builtin();
	let file = open(&fixtures::opatom_picture());
	let mut model = ContentModel::new();

	let report = link_file(&file, &dict, &mut model, &LinkOptions::default()).expect("link runs");
	assert!(report.is_clean(), "{:?}", report.failed);
	assert_eq!(report.linked, vec![mob(MATERIAL_MOB), mob(SOURCE_MOB)]);

	let master = model.mob(&mob(MATERIAL_MOB)).expect("master mob");
	assert_eq!(master.class_name(), "MasterMob");
	assert_eq!(master.value(&dict, "Name").expect("decodes"), Some(Value::String("interview".into())));
	assert_eq!(master.value(&dict, "AppCode").expect("decodes"), Some(Value::I64(7)));
	assert!(master.has("LastModified"));

	let slots = master.children("Slots");
	assert_eq!(slots.len(), 2);
	assert_eq!(slots[0].value(&dict, "SlotName").expect("decodes"), Some(Value::String("V1".into())));
	assert_eq!(slots[0].value(&dict, "PhysicalTrackNumber").expect("decodes"), Some(Value::U64(1)));

	let sequence = slots[0].child("Segment").expect("segment");
	assert_eq!(sequence.class_name(), "Sequence");
	let clips = sequence.children("Components");
	assert_eq!(clips.len(), 1);
	assert_eq!(clips[0].value(&dict, "SourceID").expect("decodes"), Some(Value::MobId(mob(SOURCE_MOB))));

	let timecode = slots[1].child("Segment").expect("segment");
	assert_eq!(timecode.class_name(), "Timecode");
	assert_eq!(timecode.value(&dict, "Start").expect("decodes"), Some(Value::I64(90_000)));
	assert_eq!(timecode.value(&dict, "Drop").expect("decodes"), Some(Value::Bool(false)));
}

#[test]
fn source_mob_carries_the_linked_descriptor() {
	let dict = Dictionary::builtin();
	let file = open(&fixtures::opatom_picture());
	let mut model = ContentModel::new();
	link_file(&file, &dict, &mut model, &LinkOptions::default()).expect("link runs");

	let source = model.mob(&mob(SOURCE_MOB)).expect("source mob");
	assert_eq!(source.class_name(), "SourceMob");

	let cdci = source.child("EssenceDescription").expect("descriptor");
	assert_eq!(cdci.class_name(), "CDCIDescriptor");
	assert_eq!(cdci.value(&dict, "StoredWidth").expect("decodes"), Some(Value::U64(1920)));
	assert_eq!(cdci.value(&dict, "FrameLayout").expect("decodes"), Some(Value::Enum("SeparateFields".into())));
	assert_eq!(
		cdci.value(&dict, "VideoLineMap").expect("decodes"),
		Some(Value::Array(vec![Value::I64(21), Value::I64(584)]))
	);
	assert_eq!(cdci.value(&dict, "FrameSampleSize").expect("decodes"), Some(Value::I64(458_752)));
	assert_eq!(cdci.value(&dict, "ContainerFormat").expect("decodes"), Some(Value::Auid(CONTAINER_AAFKLV)));
	assert!(cdci.has("Compression"));
	assert!(!cdci.has("ResolutionID"));

	let locators: Vec<_> = cdci
		.children("Locator")
		.iter()
		.map(|locator| locator.value(&dict, "URLString").expect("decodes"))
		.collect();
	assert_eq!(locators, vec![Some(Value::String("file:///media/interview.mxf".into()))]);
}

#[test]
fn op1a_is_rejected_before_any_mob_is_created() {
	let dict = Dictionary::builtin();
	let file = open(&fixtures::op1a());
	let mut model = ContentModel::new();

	let err = link_file(&file, &dict, &mut model, &LinkOptions::default()).expect_err("only OPAtom links");
	assert!(matches!(err, AafError::UnsupportedOperationalPattern { ref pattern } if pattern == "OP1a"));
	assert!(model.is_empty());
}

#[test]
fn dangling_second_package_does_not_abort_the_first() {
	let dict = Dictionary::builtin();
	let file = open(&fixtures::dangling_second_package());
	let mut model = ContentModel::new();

	let report = link_file(&file, &dict, &mut model, &LinkOptions::default()).expect("link runs");
	assert_eq!(report.linked, vec![mob(1)]);
	assert_eq!(report.failed.len(), 1);
	assert_eq!(report.failed[0].mob_id, Some(mob(2)));
	assert!(matches!(report.failed[0].error, AafError::UnresolvedReference { .. }));

	assert!(model.contains_mob(&mob(1)));
	assert!(!model.contains_mob(&mob(2)));
	let filler = model.mob(&mob(1)).expect("linked").children("Slots")[0].child("Segment").map(AafObject::class_name);
	assert_eq!(filler, Some("Filler"));
}

#[test]
fn relinking_the_same_file_adds_nothing() {
	let dict = Dictionary::builtin();
	let file = open(&fixtures::opatom_picture());
	let mut model = ContentModel::new();

	link_file(&file, &dict, &mut model, &LinkOptions::default()).expect("first link");
	let again = link_file(&file, &dict, &mut model, &LinkOptions::default()).expect("second link");

	assert_eq!(model.len(), 2);
	assert!(again.linked.is_empty());
	assert_eq!(again.skipped, vec![mob(MATERIAL_MOB), mob(SOURCE_MOB)]);
}

#[test]
fn track_origin_is_copied_only_when_present() {
	let dict = Dictionary::builtin();

	let file = open(&fixtures::opatom_picture());
	let mut model = ContentModel::new();
	link_file(&file, &dict, &mut model, &LinkOptions::default()).expect("link runs");
	let slots = model.mob(&mob(MATERIAL_MOB)).expect("master mob").children("Slots");
	assert_eq!(slots[0].value(&dict, "Origin").expect("decodes"), Some(Value::I64(0)));

	let file = open(&fixtures::dangling_second_package());
	let mut model = ContentModel::new();
	link_file(&file, &dict, &mut model, &LinkOptions::default()).expect("link runs");
	let slots = model.mob(&mob(1)).expect("linked").children("Slots");
	assert!(!slots[0].has("Origin"));
}
