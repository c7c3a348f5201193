use crate::aaf::AafError;
use crate::aaf::bytes::Cursor;
use crate::aaf::klv::{KlvIter, MAX_BER_LENGTH_BYTES, TagIter, read_ber_length};

fn ber(bytes: &[u8]) -> Result<u64, AafError> {
	read_ber_length(&mut Cursor::new(bytes), MAX_BER_LENGTH_BYTES)
}

#[test]
fn ber_short_and_long_forms() {
	assert_eq!(ber(&[0x05]).expect("short"), 5);
	assert_eq!(ber(&[0x82, 0x01, 0x00]).expect("long"), 256);
	assert_eq!(ber(&[0x83, 0x00, 0x00, 0x10]).expect("padded"), 16);
}

#[test]
fn ber_rejects_indefinite_and_oversized_forms() {
	assert!(matches!(ber(&[0x80]), Err(AafError::MalformedContainer { .. })));
	assert!(matches!(ber(&[0x89, 0, 0, 0, 0, 0, 0, 0, 0, 1]), Err(AafError::MalformedContainer { .. })));
	assert!(matches!(
		read_ber_length(&mut Cursor::new(&[0x84, 0, 0, 0, 1]), 2),
		Err(AafError::MalformedContainer { .. })
	));
	assert!(matches!(ber(&[0x82, 0x01]), Err(AafError::UnexpectedEof { .. })));
}

#[test]
fn klv_iter_advances_by_declared_length() {
	let mut bytes = Vec::new();
	bytes.extend_from_slice(&[0x11; 16]);
	bytes.extend_from_slice(&[0x03, 1, 2, 3]);
	bytes.extend_from_slice(&[0x22; 16]);
	bytes.extend_from_slice(&[0x81, 0x01, 9]);

	let units: Vec<_> = KlvIter::new(&bytes, 0).collect::<Result<_, _>>().expect("units");
	assert_eq!(units.len(), 2);
	assert_eq!(units[0].value, &[1, 2, 3]);
	assert_eq!(units[1].offset, 20);
	assert_eq!(units[1].value, &[9]);
}

#[test]
fn klv_iter_stops_on_overrun() {
	let mut bytes = vec![0x11; 16];
	bytes.extend_from_slice(&[0x10, 1, 2]);

	let mut iter = KlvIter::new(&bytes, 0);
	assert!(matches!(iter.next(), Some(Err(AafError::MalformedContainer { at: 0, .. }))));
	assert!(iter.next().is_none());
}

#[test]
fn tag_iter_skips_empty_items() {
	let body = [0x3c, 0x0a, 0x00, 0x02, 0xaa, 0xbb, 0x44, 0x02, 0x00, 0x00, 0x44, 0x01, 0x00, 0x01, 0x07];
	let tags: Vec<_> = TagIter::new(&body).collect::<Result<_, _>>().expect("tags");
	assert_eq!(tags, vec![(0x3c0a, &[0xaa, 0xbb][..]), (0x4401, &[0x07][..])]);
}

#[test]
fn tag_iter_reports_truncated_payload() {
	let body = [0x3c, 0x0a, 0x00, 0x04, 0xaa];
	let mut iter = TagIter::new(&body);
	assert!(matches!(iter.next(), Some(Err(AafError::UnexpectedEof { .. }))));
	assert!(iter.next().is_none());
}
