use crate::aaf::{AafError, Auid, CONTAINER_AAFKLV, ClassDef, Dictionary, PropertyDef, TypeKey, TypeRegistry, require_classdef, require_typedef, type_ids};

fn class(code: u128, name: &str, parent: Option<u128>, properties: Vec<PropertyDef>) -> ClassDef {
	ClassDef {
		auid: Auid::from_u128(code),
		name: name.into(),
		parent: parent.map(Auid::from_u128),
		properties,
	}
}

fn prop(code: u128, name: &str, pid: u16) -> PropertyDef {
	PropertyDef {
		auid: Auid::from_u128(code),
		name: name.into(),
		pid,
		typedef: type_ids::INT32,
		optional: false,
	}
}

#[test]
fn builtin_lineage_walks_to_the_root() {
	let dict = Dictionary::builtin();
	let clip = require_classdef(&dict, "SourceClip").expect("SourceClip");

	let names: Vec<&str> = clip.lineage(&dict).map(|class| class.name.as_ref()).collect();
	assert_eq!(names.first(), Some(&"SourceClip"));
	assert!(names.contains(&"Segment"));
	assert!(names.contains(&"Component"));
	assert!(clip.is_a(&dict, "Component"));
	assert!(!clip.is_a(&dict, "Mob"));
}

#[test]
fn inherited_property_is_found_by_name_and_auid() {
	let dict = Dictionary::builtin();
	let clip = require_classdef(&dict, "SourceClip").expect("SourceClip");

	let length = clip.find_property(&dict, "Length").expect("inherited Length");
	let by_auid = clip.find_property_by_auid(&dict, length.auid).expect("same property by auid");
	assert_eq!(by_auid.pid, length.pid);
	assert!(clip.find_property(&dict, "StoredWidth").is_none());
}

#[test]
fn cyclic_parents_terminate() {
	let mut dict = Dictionary::new();
	dict.insert_classdef(class(1, "A", Some(2), vec![prop(10, "Left", 0x0101)]));
	dict.insert_classdef(class(2, "B", Some(1), vec![]));

	let a = require_classdef(&dict, "A").expect("A");
	assert!(a.lineage(&dict).count() <= 64);
	assert!(a.is_a(&dict, "B"));
	assert!(!a.is_a(&dict, "C"));
	assert!(a.find_property(&dict, "Right").is_none());
}

#[test]
fn reinsert_replaces_by_auid() {
	let mut dict = Dictionary::new();
	dict.insert_classdef(class(1, "Old", None, vec![]));
	dict.insert_classdef(class(1, "New", None, vec![prop(10, "Field", 0x0101)]));

	assert_eq!(dict.classdefs().len(), 1);
	let by_auid = dict.lookup_classdef(TypeKey::Auid(Auid::from_u128(1))).expect("by auid");
	assert_eq!(by_auid.name.as_ref(), "New");
	assert_eq!(by_auid.properties.len(), 1);
	assert!(dict.lookup_classdef(TypeKey::Name("New")).is_some());
}

#[test]
fn missing_definitions_map_to_typed_errors() {
	let dict = Dictionary::new();

	let err = require_typedef(&dict, "UInt32").expect_err("empty dictionary");
	assert!(matches!(err, AafError::UnknownType { ref key } if key == "UInt32"));

	let err = require_classdef(&dict, Auid::from_u128(7)).expect_err("empty dictionary");
	assert!(matches!(err, AafError::UnknownClass { .. }));
}

#[test]
fn container_definitions_are_looked_up_by_name() {
	let dict = Dictionary::builtin();
	assert_eq!(dict.lookup_containerdef("AAFKLV"), Some(CONTAINER_AAFKLV));
	assert_eq!(dict.lookup_containerdef("External"), None);
}
