use crate::aaf::primer::{MAX_PRIMER_ENTRIES, Primer};
use crate::aaf::Auid;

fn table(count: u32, stride: u32, entries: &[(u16, Auid)]) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend_from_slice(&count.to_be_bytes());
	out.extend_from_slice(&stride.to_be_bytes());
	for (tag, uid) in entries {
		out.extend_from_slice(&tag.to_be_bytes());
		out.extend_from_slice(uid.as_bytes());
	}
	out
}

#[test]
fn parses_tag_table() {
	let uid = Auid::from_u128(0xa024_0060_94eb_75cb_ce2a_ca50_51ab_11d3);
	let primer = Primer::parse(&table(2, 18, &[(0x8001, uid), (0x3c0a, Auid::NIL)]), MAX_PRIMER_ENTRIES);

	assert_eq!(primer.len(), 2);
	assert_eq!(primer.get(0x8001), Some(uid));
	assert_eq!(primer.get(0x9999), None);
	assert_eq!(primer.entries()[0].0, 0x3c0a);
}

#[test]
fn wrong_stride_degrades_to_empty() {
	let primer = Primer::parse(&table(1, 20, &[(0x8001, Auid::NIL)]), MAX_PRIMER_ENTRIES);
	assert!(primer.is_empty());
}

#[test]
fn oversized_or_truncated_tables_degrade_to_empty() {
	assert!(Primer::parse(&table(70_000, 18, &[]), MAX_PRIMER_ENTRIES).is_empty());
	assert!(Primer::parse(&table(3, 18, &[(1, Auid::NIL)]), MAX_PRIMER_ENTRIES).is_empty());
	assert!(Primer::parse(&[0, 0], MAX_PRIMER_ENTRIES).is_empty());
}

#[test]
fn primer_key_ignores_version_byte() {
	let mut key = [0x06, 0x0e, 0x2b, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x05, 0x01, 0x00];
	assert!(Primer::is_primer_key(&Auid::from_bytes(key)));
	key[7] = 0x02;
	assert!(Primer::is_primer_key(&Auid::from_bytes(key)));
	key[13] = 0x02;
	assert!(!Primer::is_primer_key(&Auid::from_bytes(key)));
}
