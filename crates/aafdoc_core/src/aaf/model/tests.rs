use crate::aaf::{
	AafError, AafObject, Auid, ClassDef, ContentModel, Dictionary, MobId, PropertyData, PropertyDef, Rational, TypeDef, TypeKind, Value, require_classdef,
};

fn mob_id(seed: u8) -> MobId {
	let mut raw = [0_u8; 32];
	raw[..12].copy_from_slice(&[0x06, 0x0a, 0x2b, 0x34, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x0f, 0x00]);
	raw[31] = seed;
	MobId::from_bytes(raw)
}

fn master_mob(dict: &Dictionary, seed: u8) -> AafObject {
	let mut mob = AafObject::new(dict, "MasterMob").expect("class exists");
	mob.set_value(dict, "MobID", &Value::MobId(mob_id(seed))).expect("mob id encodes");
	mob
}

#[test]
fn inherited_properties_encode_through_their_typedef() {
	let dict = Dictionary::builtin();
	let mut slot = AafObject::new(&dict, "TimelineMobSlot").expect("class exists");

	slot.set_value(&dict, "SlotID", &Value::U64(3)).expect("slot id");
	slot.set_value(&dict, "EditRate", &Value::Rational(Rational::new(25, 1))).expect("edit rate");

	assert_eq!(slot.raw("SlotID"), Some(&[3, 0, 0, 0][..]));
	assert_eq!(slot.value(&dict, "SlotID").expect("decodes"), Some(Value::U64(3)));
	assert_eq!(slot.value(&dict, "Origin").expect("decodes"), None);
	assert_eq!(slot.properties()[0].pid, 0x4801);
}

#[test]
fn reassigning_replaces_the_stored_value() {
	let dict = Dictionary::builtin();
	let mut mob = master_mob(&dict, 1);
	mob.set_value(&dict, "Name", &Value::String("first".into())).expect("name");
	mob.set_value(&dict, "Name", &Value::String("second".into())).expect("name");

	assert_eq!(mob.properties().len(), 2);
	assert_eq!(mob.value(&dict, "Name").expect("decodes"), Some(Value::String("second".into())));
}

#[test]
fn unknown_property_is_rejected() {
	let dict = Dictionary::builtin();
	let mut mob = master_mob(&dict, 1);
	let err = mob.set_value(&dict, "Frobnicate", &Value::U64(1)).expect_err("not declared");
	assert!(matches!(err, AafError::UnknownProperty { ref class, ref property } if class == "MasterMob" && property == "Frobnicate"));
}

#[test]
fn out_of_range_value_is_a_type_mismatch() {
	let dict = Dictionary::builtin();
	let mut tc = AafObject::new(&dict, "Timecode").expect("class exists");
	let err = tc.set_value(&dict, "FPS", &Value::U64(70_000)).expect_err("does not fit u16");
	assert!(matches!(err, AafError::TypeMismatch { .. }));
	assert!(!tc.has("FPS"));
}

#[test]
fn strong_reference_properties_take_objects_not_values() {
	let dict = Dictionary::builtin();
	let mut slot = AafObject::new(&dict, "TimelineMobSlot").expect("class exists");
	let err = slot.set_value(&dict, "Segment", &Value::U64(0)).expect_err("holds an object");
	assert!(matches!(err, AafError::TypeMismatch { .. }));

	let filler = AafObject::new(&dict, "Filler").expect("class exists");
	slot.set_child(&dict, "Segment", filler).expect("filler is a segment");
	assert_eq!(slot.child("Segment").map(AafObject::class_name), Some("Filler"));
	assert!(matches!(slot.properties()[0].data, PropertyData::Child(_)));
}

#[test]
fn child_class_must_match_the_reference_target() {
	let dict = Dictionary::builtin();
	let mut slot = AafObject::new(&dict, "TimelineMobSlot").expect("class exists");
	let locator = AafObject::new(&dict, "NetworkLocator").expect("class exists");
	let err = slot.set_child(&dict, "Segment", locator).expect_err("locator is not a segment");
	assert!(matches!(err, AafError::TypeMismatch { .. }));
}

#[test]
fn collections_keep_insertion_order() {
	let dict = Dictionary::builtin();
	let mut mob = master_mob(&dict, 1);
	for slot_id in [7_u64, 2, 5] {
		let mut slot = AafObject::new(&dict, "TimelineMobSlot").expect("class exists");
		slot.set_value(&dict, "SlotID", &Value::U64(slot_id)).expect("slot id");
		mob.push_child(&dict, "Slots", slot).expect("slot appends");
	}

	let ids: Vec<_> = mob
		.children("Slots")
		.iter()
		.map(|slot| slot.value(&dict, "SlotID").expect("decodes"))
		.collect();
	assert_eq!(ids, vec![Some(Value::U64(7)), Some(Value::U64(2)), Some(Value::U64(5))]);
	assert!(mob.children("Name").is_empty());

	let err = mob.push_child(&dict, "Name", AafObject::new(&dict, "Filler").expect("class")).expect_err("not a collection");
	assert!(matches!(err, AafError::TypeMismatch { .. }));
}

#[test]
fn weak_reference_stores_the_target_key() {
	let dict = Dictionary::builtin();
	let mut clip = AafObject::new(&dict, "SourceClip").expect("class exists");
	let picture: Auid = "01030202-0100-0000-060e-2b3404010101".parse().expect("auid");
	clip.set_value(&dict, "DataDefinition", &Value::Auid(picture)).expect("weak ref");
	assert_eq!(clip.value(&dict, "DataDefinition").expect("decodes"), Some(Value::Auid(picture)));
}

const WEAK_HOLDER: Auid = Auid::from_u128(0x7002_0000_0000_0000_0000_0000_0000_0001);
const WEAK_TYPE: Auid = Auid::from_u128(0x7002_0000_0000_0000_0000_0000_0000_0002);

fn property_of(dict: &Dictionary, class: &str, name: &str) -> Auid {
	let classdef = require_classdef(dict, class).expect("class exists");
	classdef.find_property(dict, name).expect("property exists").auid
}

/// Builtin dictionary plus a `WeakHolder` class whose `Target` property is a
/// data-definition weak reference stored through `target_set`.
fn weak_holder_dictionary(target_set: Vec<Auid>) -> Dictionary {
	let mut dict = Dictionary::builtin();
	let class = require_classdef(&dict, "DataDefinition").expect("class exists").auid;
	dict.insert_typedef(TypeDef::new(WEAK_TYPE, "HolderWeakReference", TypeKind::WeakRef { class, target_set }));
	dict.insert_classdef(ClassDef {
		auid: WEAK_HOLDER,
		name: "WeakHolder".into(),
		parent: None,
		properties: vec![PropertyDef {
			auid: Auid::from_u128(0x7002_0000_0000_0000_0000_0000_0000_0003),
			name: "Target".into(),
			pid: 0xff01,
			typedef: WEAK_TYPE,
			optional: false,
		}],
	});
	dict
}

#[test]
fn weak_reference_with_unresolvable_target_set_is_rejected() {
	let missing = Auid::from_u128(0xdead);
	let dict = weak_holder_dictionary(vec![missing]);
	let mut holder = AafObject::new(&dict, "WeakHolder").expect("class exists");

	let err = holder.set_value(&dict, "Target", &Value::Auid(Auid::from_u128(1))).expect_err("path does not resolve");
	assert!(matches!(err, AafError::UnresolvedReference { key, .. } if key == missing));
	assert!(!holder.has("Target"));
}

#[test]
fn weak_reference_into_the_wrong_collection_is_rejected() {
	let base = Dictionary::builtin();
	let target_set = vec![
		property_of(&base, "Root", "Header"),
		property_of(&base, "Header", "Dictionary"),
		property_of(&base, "Dictionary", "ContainerDefinitions"),
	];
	let dict = weak_holder_dictionary(target_set);
	let mut holder = AafObject::new(&dict, "WeakHolder").expect("class exists");

	let err = holder.set_value(&dict, "Target", &Value::Auid(Auid::from_u128(1))).expect_err("collection holds containers");
	assert!(matches!(err, AafError::TypeMismatch { ref reason, .. } if reason.contains("ContainerDefinition")));
	assert!(!holder.has("Target"));
}

#[test]
fn weak_reference_into_the_matching_collection_is_stored() {
	let base = Dictionary::builtin();
	let target_set = vec![
		property_of(&base, "Root", "Header"),
		property_of(&base, "Header", "Dictionary"),
		property_of(&base, "Dictionary", "DataDefinitions"),
	];
	let dict = weak_holder_dictionary(target_set);
	let mut holder = AafObject::new(&dict, "WeakHolder").expect("class exists");

	holder.set_value(&dict, "Target", &Value::Auid(Auid::from_u128(1))).expect("path resolves");
	assert_eq!(holder.value(&dict, "Target").expect("decodes"), Some(Value::Auid(Auid::from_u128(1))));
}

#[test]
fn content_model_indexes_mobs_by_id() {
	let dict = Dictionary::builtin();
	let mut model = ContentModel::new();

	assert!(model.add_mob(&dict, master_mob(&dict, 1)).expect("adds"));
	assert!(model.add_mob(&dict, master_mob(&dict, 2)).expect("adds"));
	assert!(!model.add_mob(&dict, master_mob(&dict, 1)).expect("duplicate is skipped"));

	assert_eq!(model.len(), 2);
	assert!(model.contains_mob(&mob_id(2)));
	assert!(model.mob(&mob_id(3)).is_none());
}

#[test]
fn content_model_rejects_mobs_without_id_and_non_mobs() {
	let dict = Dictionary::builtin();
	let mut model = ContentModel::new();

	let bare = AafObject::new(&dict, "SourceMob").expect("class exists");
	assert!(matches!(model.add_mob(&dict, bare), Err(AafError::MissingRequiredField { field: "MobID", .. })));

	let filler = AafObject::new(&dict, "Filler").expect("class exists");
	assert!(matches!(model.add_mob(&dict, filler), Err(AafError::UnknownClass { .. })));
	assert!(model.is_empty());
}
