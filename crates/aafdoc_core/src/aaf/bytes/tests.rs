use crate::aaf::{AafError, Auid, Cursor, Endianness};

#[test]
fn reads_follow_the_selected_byte_order() {
	let bytes = [0x01, 0x02, 0x01, 0x02, 0x00, 0x00, 0x00, 0x2a];
	let mut cursor = Cursor::new(&bytes);

	assert_eq!(cursor.read_u16(Endianness::Little).expect("u16"), 0x0201);
	assert_eq!(cursor.read_u16_be().expect("u16"), 0x0102);
	assert_eq!(cursor.read_u32_be().expect("u32"), 42);
	assert_eq!(cursor.remaining(), 0);
}

#[test]
fn short_read_reports_position_and_leaves_cursor() {
	let bytes = [0xff; 6];
	let mut cursor = Cursor::new(&bytes);
	cursor.skip(4).expect("skip");

	let err = cursor.read_u32(Endianness::Big).expect_err("only two bytes left");
	assert!(matches!(err, AafError::UnexpectedEof { at: 4, need: 4, rem: 2 }));
	assert_eq!(cursor.pos(), 4);
	assert!(cursor.read_i32(Endianness::Little).is_err());
}

#[test]
fn signed_reads_sign_extend() {
	let bytes = [0xff; 8];
	let mut cursor = Cursor::new(&bytes);
	assert_eq!(cursor.read_i64(Endianness::Big).expect("i64"), -1);
}

#[test]
fn wire_order_auid() {
	let raw: [u8; 16] = [0x06, 0x0e, 0x2b, 0x34, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c];
	let mut cursor = Cursor::new(&raw);
	assert_eq!(cursor.read_auid_be().expect("auid"), Auid::from_bytes(raw));
}
