#![allow(missing_docs)]

use aafdoc::aaf::{AafError, ContentModel, Dictionary, Field, LinkOptions, MxfClass, MxfFile, OperationalPattern, ReadOptions, Value, link_file};
use aafdoc_testkit::fixtures::{self, storage};
use aafdoc_testkit::{FRAME_SAMPLE_SIZE_UID, LocalSet, MxfBuilder, OP_ATOM, PICTURE_DEF, class, id, mob_id, primer, primer_raw};

#[test]
fn primer_with_bad_stride_is_dropped_and_parsing_continues() {
	let mut entry = 0x8001_u16.to_be_bytes().to_vec();
	entry.extend_from_slice(&FRAME_SAMPLE_SIZE_UID);
	let bytes = MxfBuilder::new(OP_ATOM)
		.unit(primer_raw(1, 17, &entry))
		.set(LocalSet::new(class::CDCI_DESCRIPTOR, id(30)).i32(0x8001, 1024).u32(0x3203, 64))
		.finish();

	let file = MxfFile::parse(&bytes, &ReadOptions::default()).expect("file parses");
	assert!(file.primer.is_empty());

	let cdci = &file.objects()[0];
	assert_eq!(cdci.class, MxfClass::CdciDescriptor);
	assert!(!cdci.has(Field::FrameSampleSize));
	assert_eq!(cdci.value(Field::StoredWidth), Some(&Value::U64(64)));
}

#[test]
fn primer_over_entry_limit_is_dropped() {
	let bytes = MxfBuilder::new(OP_ATOM)
		.unit(primer(&[(0x8001, FRAME_SAMPLE_SIZE_UID), (0x8002, FRAME_SAMPLE_SIZE_UID)]))
		.finish();
	let opt = ReadOptions {
		max_primer_entries: 1,
		..ReadOptions::default()
	};

	let file = MxfFile::parse(&bytes, &opt).expect("file parses");
	assert!(file.primer.is_empty());
}

#[test]
fn file_round_trips_through_disk() {
	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join("opatom.mxf");
	std::fs::write(&path, fixtures::opatom_picture()).expect("fixture written");

	let file = MxfFile::open(&path).expect("file opens");
	assert_eq!(file.operational_pattern(), Some(OperationalPattern::OpAtom));
	assert_eq!(file.source_packages().expect("packages").len(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
	let err = MxfFile::open("/nonexistent/aafdoc/missing.mxf").expect_err("no such file");
	assert!(matches!(err, AafError::Io(_)));
}

#[test]
fn truncated_unit_aborts_the_parse() {
	let mut bytes = fixtures::opatom_picture();
	bytes.truncate(bytes.len() - 10);

	let err = MxfFile::parse(&bytes, &ReadOptions::default()).expect_err("footer is cut");
	assert!(matches!(err, AafError::MalformedContainer { .. } | AafError::UnexpectedEof { .. }));
}

#[test]
fn storage_without_packages_links_nothing() {
	let bytes = storage(OP_ATOM, &[]).finish();
	let file = MxfFile::parse(&bytes, &ReadOptions::default()).expect("file parses");
	let mut model = ContentModel::new();

	let report = link_file(&file, &Dictionary::builtin(), &mut model, &LinkOptions::default()).expect("link runs");
	assert!(report.linked.is_empty() && report.failed.is_empty());
	assert!(model.is_empty());
}

#[test]
fn non_package_in_storage_is_reported_per_package() {
	let bytes = storage(OP_ATOM, &[id(10), id(12)])
		.set(LocalSet::new(class::MATERIAL_PACKAGE, id(10)).tag(0x4401, &mob_id(1)))
		.set(LocalSet::new(class::FILLER, id(12)).tag(0x0201, &PICTURE_DEF).i64(0x0202, 1))
		.finish();
	let file = MxfFile::parse(&bytes, &ReadOptions::default()).expect("file parses");
	let mut model = ContentModel::new();

	let report = link_file(&file, &Dictionary::builtin(), &mut model, &LinkOptions::default()).expect("link runs");
	assert_eq!(report.linked.len(), 1);
	assert_eq!(report.failed.len(), 1);
	assert!(matches!(report.failed[0].error, AafError::UnknownClass { .. }));
}
