use crate::aaf::{Auid, OperationalPattern, PartitionHeader, PartitionKind};

fn label(version: u8, complexity: u8, package: u8) -> Auid {
	Auid::from_bytes([
		0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, version, 0x0d, 0x01, 0x02, 0x01, complexity, package, 0x09, 0x00,
	])
}

#[test]
fn classifies_generalized_patterns() {
	assert_eq!(OperationalPattern::classify(&label(1, 1, 1)), Some(OperationalPattern::Op1a));
	assert_eq!(OperationalPattern::classify(&label(2, 2, 3)), Some(OperationalPattern::Op2c));
	assert_eq!(OperationalPattern::classify(&label(3, 3, 2)), Some(OperationalPattern::Op3b));
	assert_eq!(OperationalPattern::classify(&label(1, 1, 4)), None);
}

#[test]
fn classifies_atom_and_rejects_foreign_labels() {
	let atom = label(2, 0x10, 0x00);
	assert_eq!(OperationalPattern::classify(&atom), Some(OperationalPattern::OpAtom));
	assert_eq!(OperationalPattern::OpAtom.to_string(), "OPAtom");

	assert_eq!(OperationalPattern::classify(&label(4, 1, 1)), None);
	assert_eq!(OperationalPattern::classify(&label(1, 0x11, 0)), None);
	assert_eq!(OperationalPattern::classify(&Auid::NIL), None);
}

#[test]
fn partition_kind_comes_from_key_byte_13() {
	let mut key = [0x06, 0x0e, 0x2b, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x02, 0x04, 0x00];
	assert_eq!(PartitionKind::from_key(&Auid::from_bytes(key)), Some(PartitionKind::Header));
	key[13] = 0x04;
	assert_eq!(PartitionKind::from_key(&Auid::from_bytes(key)), Some(PartitionKind::Footer));
	key[13] = 0x05;
	assert_eq!(PartitionKind::from_key(&Auid::from_bytes(key)), None);
}

#[test]
fn parses_pack_fields_and_essence_batch() {
	let op = label(2, 0x10, 0);
	let container = Auid::from_u128(0x060e_2b34_0401_0103_0d01_0301_027f_0100);

	let mut value = Vec::new();
	value.extend_from_slice(&1_u16.to_be_bytes());
	value.extend_from_slice(&3_u16.to_be_bytes());
	value.extend_from_slice(&512_u32.to_be_bytes());
	for field in [0_u64, 0, 4096, 1200, 0] {
		value.extend_from_slice(&field.to_be_bytes());
	}
	value.extend_from_slice(&0_u32.to_be_bytes());
	value.extend_from_slice(&0_u64.to_be_bytes());
	value.extend_from_slice(&1_u32.to_be_bytes());
	value.extend_from_slice(op.as_bytes());
	value.extend_from_slice(&1_u32.to_be_bytes());
	value.extend_from_slice(&16_u32.to_be_bytes());
	value.extend_from_slice(container.as_bytes());

	let header = PartitionHeader::parse(PartitionKind::Header, &value).expect("partition");
	assert_eq!(header.minor_version, 3);
	assert_eq!(header.kag_size, 512);
	assert_eq!(header.footer_partition, 4096);
	assert_eq!(header.header_byte_count, 1200);
	assert_eq!(header.body_sid, 1);
	assert_eq!(header.operational_pattern, op);
	assert_eq!(header.essence_containers, vec![container]);

	assert!(PartitionHeader::parse(PartitionKind::Header, &value[..60]).is_err());
}
