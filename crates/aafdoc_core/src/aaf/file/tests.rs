use aafdoc_testkit::fixtures::{self, MATERIAL_MOB};
use aafdoc_testkit::{LocalSet, MxfBuilder, OP_1A, OP_ATOM, PICTURE_DEF, class, id, mob_id, primer_raw};

use crate::aaf::{AafError, Auid, Field, MobId, MxfClass, MxfFile, OperationalPattern, PartitionKind, ReadOptions, StrongRef, Value};

fn parse(bytes: &[u8]) -> MxfFile {
	MxfFile::parse(bytes, &ReadOptions::default()).expect("file parses")
}

fn auid(n: u8) -> Auid {
	Auid::from_bytes(id(n))
}

#[test]
fn opatom_fixture_builds_the_object_table() {
	let file = parse(&fixtures::opatom_picture());

	assert_eq!(file.objects().len(), 13);
	assert_eq!(file.stats.partitions, 2);
	assert_eq!(file.stats.local_sets, 14);
	assert_eq!(file.stats.unknown_sets, 1);
	assert_eq!(file.stats.other_units, 1);
	assert_eq!(file.primer.len(), 3);

	let partition = file.partition.as_ref().expect("header partition");
	assert_eq!(partition.kind, PartitionKind::Header);
	assert_eq!(file.operational_pattern(), Some(OperationalPattern::OpAtom));

	let preface = file.preface().expect("preface");
	assert_eq!(preface.instance_id, auid(1));
	assert_eq!(file.content_storage().expect("storage").class, MxfClass::ContentStorage);
}

#[test]
fn packages_walk_from_the_preface() {
	let file = parse(&fixtures::opatom_picture());

	let material = file.material_packages().expect("packages");
	let source = file.source_packages().expect("packages");
	assert_eq!(material.len(), 1);
	assert_eq!(source.len(), 1);
	assert_eq!(
		material[0].value(Field::MobId),
		Some(&Value::MobId(MobId::from_bytes(mob_id(MATERIAL_MOB))))
	);

	let tracks: Vec<_> = file
		.iter_strong_refs(material[0], Field::Slots)
		.map(|track| track.expect("track resolves").instance_id)
		.collect();
	assert_eq!(tracks, vec![auid(11), auid(14)]);

	let descriptor = file.resolve_field(source[0], Field::Descriptor).expect("descriptor");
	assert_eq!(descriptor.class, MxfClass::CdciDescriptor);
	assert_eq!(descriptor.value(Field::FrameSampleSize), Some(&Value::I64(458_752)));
	assert_eq!(material[0].value(Field::AppCode), Some(&Value::I64(7)));
}

#[test]
fn dangling_references_surface_at_resolution() {
	let file = parse(&fixtures::dangling_second_package());
	let source = file.source_packages().expect("packages");
	let track = file.iter_strong_refs(source[0], Field::Slots).next().expect("one track").expect("track resolves");

	assert!(file.resolve(StrongRef(auid(99))).is_none());
	let err = file.resolve_field(track, Field::Segment).expect_err("segment dangles");
	assert!(matches!(err, AafError::UnresolvedReference { ref field, key } if field == "Track.Segment" && key == auid(99)));

	let err = file.resolve_field(track, Field::Descriptor).expect_err("field absent");
	assert!(matches!(err, AafError::UnresolvedReference { key, .. } if key.is_nil()));
	assert_eq!(file.iter_strong_refs(track, Field::Components).count(), 0);
}

#[test]
fn dangling_package_entries_are_error_items() {
	let bytes = fixtures::storage(OP_ATOM, &[id(10), id(77)])
		.set(LocalSet::new(class::MATERIAL_PACKAGE, id(10)).tag(0x4401, &mob_id(1)))
		.finish();
	let file = parse(&bytes);

	let items: Vec<_> = file.packages().expect("storage resolves").collect();
	assert_eq!(items.len(), 2);
	assert!(items[0].is_ok());
	assert!(matches!(items[1], Err(AafError::UnresolvedReference { key, .. }) if key == auid(77)));
	assert!(file.material_packages().is_err());
}

#[test]
fn operational_pattern_falls_back_to_the_preface() {
	let bytes = MxfBuilder::empty()
		.set(LocalSet::new(class::PREFACE, id(1)).tag(0x3b09, &OP_1A))
		.finish();
	let file = parse(&bytes);

	assert!(file.partition.is_none());
	assert_eq!(file.operational_pattern(), Some(OperationalPattern::Op1a));
	assert_eq!(file.operational_pattern_label(), Some(Auid::from_bytes(OP_1A)));
}

#[test]
fn missing_preface_is_reported() {
	let bytes = MxfBuilder::new(OP_ATOM).set(LocalSet::new(class::FILLER, id(5))).finish();
	let file = parse(&bytes);

	assert!(matches!(file.preface(), Err(AafError::MissingPreface)));
	assert!(matches!(file.packages().map(|_| ()), Err(AafError::MissingPreface)));
}

#[test]
fn duplicate_instance_id_keeps_the_first_object() {
	let bytes = MxfBuilder::new(OP_ATOM)
		.set(LocalSet::new(class::FILLER, id(5)).i64(0x0202, 1))
		.set(LocalSet::new(class::FILLER, id(5)).i64(0x0202, 2))
		.finish();
	let file = parse(&bytes);

	assert_eq!(file.objects().len(), 1);
	let filler = file.object(&auid(5)).expect("registered");
	assert_eq!(filler.value(Field::Length), Some(&Value::I64(1)));
}

#[test]
fn unknown_classes_register_only_on_request() {
	let bytes = MxfBuilder::new(OP_ATOM)
		.set(LocalSet::new(class::IDENTIFICATION, id(40)).string(0x3c01, "tool"))
		.set(LocalSet::new(class::FILLER, id(5)).tag(0x0201, &PICTURE_DEF))
		.finish();

	let file = parse(&bytes);
	assert_eq!(file.objects().len(), 1);
	assert_eq!(file.stats.unknown_sets, 1);

	let file = MxfFile::parse(&bytes, &ReadOptions::for_inspection()).expect("file parses");
	assert_eq!(file.objects().len(), 2);
	assert_eq!(file.objects()[0].class, MxfClass::Other(Auid::from_bytes(class::IDENTIFICATION)));
	assert!(!file.objects()[0].has(Field::Name));
	assert_eq!(file.class_counts(), vec![("Filler", 1), ("Other", 1)]);
}

#[test]
fn bad_primer_stride_degrades_to_an_empty_primer() {
	let bytes = MxfBuilder::new(OP_ATOM)
		.unit(primer_raw(1, 20, &[0; 20]))
		.set(LocalSet::new(class::FILLER, id(5)).i64(0x0202, 3))
		.finish();
	let file = parse(&bytes);

	assert!(file.primer.is_empty());
	assert_eq!(file.objects().len(), 1);
}

#[test]
fn oversized_ber_length_is_rejected() {
	let mut bytes = MxfBuilder::new(OP_ATOM).finish();
	bytes.extend_from_slice(&class::FILLER);
	bytes.extend_from_slice(&[0x84, 0x7f, 0xff, 0xff, 0xff]);

	let err = MxfFile::parse(&bytes, &ReadOptions::default()).expect_err("length overruns the file");
	assert!(matches!(err, AafError::MalformedContainer { .. }));
}
