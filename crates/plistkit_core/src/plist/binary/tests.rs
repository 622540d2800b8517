use crate::plist::binary::{BinaryReadOptions, BinaryTrailer, read_binary, write_binary};
use crate::plist::{Date, Dictionary, Integer, PlistError, Uid, Value};

/// Wrap a hand-built object table with an offset table and trailer.
fn container(objects: &[&[u8]], top: u64, ref_size: u8) -> Vec<u8> {
	let mut out = b"bplist00".to_vec();
	let mut offsets = Vec::new();
	for object in objects {
		offsets.push(out.len() as u8);
		out.extend_from_slice(object);
	}
	let offset_table_offset = out.len() as u64;
	out.extend_from_slice(&offsets);
	let trailer = BinaryTrailer {
		sort_version: 0,
		offset_int_size: 1,
		object_ref_size: ref_size,
		num_objects: objects.len() as u64,
		top_object: top,
		offset_table_offset,
	};
	out.extend_from_slice(&trailer.to_bytes());
	out
}

fn read(bytes: &[u8]) -> crate::plist::Result<Value> {
	read_binary(bytes, &BinaryReadOptions::default())
}

fn assert_malformed(bytes: &[u8]) {
	let err = read(bytes).expect_err("decode should fail");
	assert!(matches!(err, PlistError::MalformedBplist { .. }), "unexpected error: {err}");
}

const SINGLE_STRING: [u8; 45] = [
	0x62, 0x70, 0x6c, 0x69, 0x73, 0x74, 0x30, 0x30, 0x53, 0x36, 0x2e, 0x30, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00,
	0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0c,
];

const SMALL_DICT: [u8; 105] = [
	0x62, 0x70, 0x6c, 0x69, 0x73, 0x74, 0x30, 0x30, 0xd4, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x0a, 0x54, 0x6e, 0x61, 0x6d, 0x65, 0x55,
	0x63, 0x6f, 0x75, 0x6e, 0x74, 0x55, 0x66, 0x6c, 0x61, 0x67, 0x73, 0x55, 0x72, 0x61, 0x74, 0x69, 0x6f, 0x55, 0x70, 0x6c, 0x69, 0x73, 0x74,
	0x10, 0x03, 0xa2, 0x08, 0x09, 0x09, 0x08, 0x23, 0x3f, 0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x11, 0x16, 0x1c, 0x22, 0x28, 0x2e,
	0x30, 0x33, 0x34, 0x35, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0b, 0x00, 0x00, 0x00,
	0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3e,
];

fn small_dict_value() -> Value {
	let mut dict = Dictionary::new();
	dict.insert("name", Value::from("plist"));
	dict.insert("count", Value::from(3_i64));
	dict.insert("flags", Value::Array(vec![Value::Boolean(true), Value::Boolean(false)]));
	dict.insert("ratio", Value::Real(1.5));
	Value::Dictionary(dict)
}

#[test]
fn decodes_single_top_level_string() {
	assert_eq!(read(&SINGLE_STRING).expect("decodes"), Value::from("6.0"));
}

#[test]
fn encodes_single_string_byte_for_byte() {
	assert_eq!(write_binary(&Value::from("6.0")), SINGLE_STRING.to_vec());
}

#[test]
fn encodes_dictionary_byte_for_byte() {
	assert_eq!(write_binary(&small_dict_value()), SMALL_DICT.to_vec());
	assert_eq!(read(&SMALL_DICT).expect("decodes"), small_dict_value());
}

#[test]
fn round_trips_every_variant() {
	let mut nested = Dictionary::new();
	nested.insert("uid", Value::Uid(Uid(300)));
	nested.insert("date", Value::Date(Date(407_205_240.5)));
	nested.insert("blob", Value::Data((0..40).collect()));
	nested.insert("empty", Value::Data(Vec::new()));

	let value = Value::Array(vec![
		Value::Dictionary(nested),
		Value::from(-1_i64),
		Value::from(0_i64),
		Value::from(255_i64),
		Value::from(65_536_i64),
		Value::from(1_i64 << 40),
		Value::from(i64::MIN),
		Value::from(u64::MAX),
		Value::Real(-0.125),
		Value::from("Hello, 世界"),
		Value::from("a string that is longer than fifteen characters"),
		Value::from(""),
		Value::Array(Vec::new()),
		Value::Dictionary(Dictionary::new()),
	]);

	let bytes = write_binary(&value);
	assert_eq!(read(&bytes).expect("round trip decodes"), value);
}

#[test]
fn non_ascii_strings_use_utf16_marker() {
	let bytes = write_binary(&Value::from("é"));
	assert_eq!(bytes[8], 0x61);
	assert_eq!(&bytes[9..11], &[0x00, 0xe9]);
}

#[test]
fn equal_strings_share_one_object() {
	let value = Value::Array(vec![Value::from("a"), Value::from("a"), Value::from("a")]);
	let bytes = write_binary(&value);
	let trailer = BinaryTrailer::parse(&bytes).expect("trailer parses");
	assert_eq!(trailer.num_objects, 2);
	assert_eq!(read(&bytes).expect("decodes"), value);
}

#[test]
fn integers_are_not_deduplicated() {
	let value = Value::Array(vec![Value::from(7_i64), Value::from(7_i64)]);
	let trailer = BinaryTrailer::parse(&write_binary(&value)).expect("trailer parses");
	assert_eq!(trailer.num_objects, 3);
}

#[test]
fn reference_width_grows_with_object_count() {
	let value = Value::Array((0..300_i64).map(Value::from).collect());
	let bytes = write_binary(&value);
	let trailer = BinaryTrailer::parse(&bytes).expect("trailer parses");
	assert_eq!(trailer.num_objects, 301);
	assert_eq!(trailer.object_ref_size, 2);
	assert_eq!(trailer.offset_int_size, 2);
	assert_eq!(read(&bytes).expect("decodes"), value);
}

#[test]
fn decodes_narrow_reals_and_wide_integers() {
	let bytes = container(
		&[
			&[0xa3, 0x01, 0x02, 0x03],
			&[0x22, 0x42, 0x00, 0x00, 0x00],
			&[0x14, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
			&[0x14, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe],
		],
		0,
		1,
	);
	let value = read(&bytes).expect("decodes");
	assert_eq!(
		value,
		Value::Array(vec![Value::Real(32.0), Value::Integer(Integer::from_u64(u64::MAX)), Value::from(-2_i64)])
	);
}

#[test]
fn shared_references_decode_as_copies() {
	let bytes = container(&[&[0xa2, 0x01, 0x01], &[0x51, b'x']], 0, 1);
	assert_eq!(read(&bytes).expect("decodes"), Value::Array(vec![Value::from("x"), Value::from("x")]));
}

/// Objects `0..levels` are each `[next, next]`; the last object is `true`.
fn doubling_chain(levels: u8) -> Vec<u8> {
	let objects: Vec<[u8; 3]> = (0..levels).map(|idx| [0xa2, idx + 1, idx + 1]).collect();
	let mut table: Vec<&[u8]> = objects.iter().map(|object| object.as_slice()).collect();
	table.push(&[0x09]);
	container(&table, 0, 1)
}

#[test]
fn shared_fan_out_is_bounded_by_node_budget() {
	let bytes = doubling_chain(26);
	assert!(bytes.len() < 200);
	assert_malformed(&bytes);
}

#[test]
fn node_budget_counts_every_shared_copy() {
	// Four doublings expand to 2^5 - 1 = 31 values.
	let bytes = doubling_chain(4);
	let tight = BinaryReadOptions {
		max_nodes: 30,
		..BinaryReadOptions::default()
	};
	let err = read_binary(&bytes, &tight).expect_err("over budget");
	assert!(matches!(err, PlistError::MalformedBplist { .. }), "{err}");

	let exact = BinaryReadOptions {
		max_nodes: 31,
		..BinaryReadOptions::default()
	};
	let value = read_binary(&bytes, &exact).expect("fits budget");
	let leaf = Value::Array(vec![Value::Boolean(true), Value::Boolean(true)]);
	let expected = (1..4).fold(leaf, |inner, _| Value::Array(vec![inner.clone(), inner]));
	assert_eq!(value, expected);
}

#[test]
fn self_referencing_array_is_rejected() {
	assert_malformed(&container(&[&[0xa1, 0x00]], 0, 1));
}

#[test]
fn indirect_cycle_is_rejected() {
	assert_malformed(&container(&[&[0xa1, 0x01], &[0xa1, 0x00]], 0, 1));
}

#[test]
fn out_of_range_reference_is_rejected() {
	assert_malformed(&container(&[&[0xa1, 0x05]], 0, 1));
}

#[test]
fn non_string_dictionary_key_is_rejected() {
	assert_malformed(&container(&[&[0xd1, 0x01, 0x02], &[0x10, 0x01], &[0x09]], 0, 1));
}

#[test]
fn truncated_payload_is_rejected() {
	assert_malformed(&container(&[&[0x5f, 0x10, 0x20, b'a', b'b']], 0, 1));
}

#[test]
fn null_and_unknown_markers_are_rejected() {
	assert_malformed(&container(&[&[0x00]], 0, 1));
	assert_malformed(&container(&[&[0x70]], 0, 1));
}

#[test]
fn bad_trailers_are_rejected() {
	let good = container(&[&[0x09]], 0, 1);

	let mut top_out_of_range = good.clone();
	let len = top_out_of_range.len();
	top_out_of_range[len - 9] = 4;
	assert_malformed(&top_out_of_range);

	let mut zero_ref_size = good.clone();
	zero_ref_size[len - 25] = 0;
	assert_malformed(&zero_ref_size);

	assert_malformed(&good[..good.len() - 1]);
	assert_malformed(b"bplist00");
}

#[test]
fn nesting_limit_is_enforced() {
	let value = (0..10).fold(Value::from(true), |inner, _| Value::Array(vec![inner]));
	let bytes = write_binary(&value);
	let err = read_binary(
		&bytes,
		&BinaryReadOptions {
			max_depth: 4,
			..BinaryReadOptions::default()
		},
	)
	.expect_err("too deep");
	assert!(matches!(err, PlistError::MalformedBplist { .. }));
	assert_eq!(read(&bytes).expect("default limit is enough"), value);
}
