use std::collections::BTreeMap;

use crate::plist::{
	DecodeOptions, Decoder, Dictionary, Dynamic, Encoder, Format, Integer, PlistError, Uid, Value, from_bytes, from_reader, to_bytes, to_writer,
};

crate::plist_record! {
	#[derive(Debug, Default, PartialEq)]
	struct Settings {
		name: String,
		retries: u8 as "max-retries",
		verbose: bool,
		ratio: Option<f64>,
	}
}

fn sample_tree() -> Value {
	let mut nested = Dictionary::new();
	nested.insert("flag", Value::Boolean(false));
	nested.insert("blob", Value::Data(vec![0, 1, 2, 255]));
	let mut root = Dictionary::new();
	root.insert("text", Value::from("Hello, 世界"));
	root.insert("neg", Value::from(-9_i64));
	root.insert("huge", Value::Integer(Integer::from_u64(u64::MAX)));
	root.insert("real", Value::Real(-0.25));
	root.insert("uid", Value::Uid(Uid(300)));
	root.insert("nested", Value::Dictionary(nested));
	root.insert("list", Value::Array(vec![Value::from("a"), Value::from("a"), Value::Array(Vec::new())]));
	Value::Dictionary(root)
}

fn archiver_uid_decoder() -> Decoder {
	Decoder::with_options(DecodeOptions {
		archiver_uids: true,
		..DecodeOptions::default()
	})
}

#[test]
fn both_formats_decode_to_the_same_tree() {
	let value = sample_tree();
	let binary = to_bytes(&value, Format::Binary).expect("binary encodes");
	let xml = to_bytes(&value, Format::Xml).expect("xml encodes");

	let decoder = archiver_uid_decoder();
	let (binary_format, from_binary) = decoder.decode_value(&binary).expect("binary decodes");
	let (xml_format, from_xml) = decoder.decode_value(&xml).expect("xml decodes");

	assert_eq!(binary_format, Format::Binary);
	assert_eq!(xml_format, Format::Xml);
	assert_eq!(from_binary, value);
	assert_eq!(from_xml, value);
}

#[test]
fn record_round_trips_through_each_format() {
	let settings = Settings {
		name: "sync".to_owned(),
		retries: 3,
		verbose: true,
		ratio: None,
	};

	for format in [Format::Binary, Format::Xml] {
		let bytes = to_bytes(&settings, format).expect("encodes");
		let back: Settings = from_bytes(&bytes).expect("decodes");
		assert_eq!(back, settings, "format={format}");

		let tree: Value = from_bytes(&bytes).expect("decodes tree");
		let keys: Vec<&str> = tree.as_dictionary().expect("dictionary").keys().collect();
		assert_eq!(keys, vec!["name", "max-retries", "verbose"]);
	}
}

#[test]
fn lax_decoder_coerces_xml_strings() {
	let text = b"<plist version=\"1.0\"><dict>\
		<key>name</key><string>sync</string>\
		<key>max-retries</key><string>4</string>\
		<key>verbose</key><string>1</string>\
		<key>ratio</key><string>0.5</string>\
		</dict></plist>";

	let err = from_bytes::<Settings>(text).expect_err("strict rejects strings");
	assert!(matches!(err, PlistError::TypeMismatch { ref path, .. } if path == "root.max-retries"), "{err}");

	let settings: Settings = Decoder::with_options(DecodeOptions::lax()).decode_bytes(text).expect("lax decodes");
	assert_eq!(
		settings,
		Settings {
			name: "sync".to_owned(),
			retries: 4,
			verbose: true,
			ratio: Some(0.5),
		}
	);
}

#[test]
fn reader_and_writer_entry_points() {
	let mut out = Vec::new();
	to_writer(&mut out, &sample_tree(), Format::Binary).expect("encodes");
	let back: Value = from_reader(out.as_slice()).expect("decodes");
	assert_eq!(back, sample_tree());
}

#[test]
fn decoder_reports_unknown_format() {
	let err = from_bytes::<Value>(b"{ key = value; }").expect_err("unknown format");
	assert!(matches!(err, PlistError::UnknownFormat { ref prefix } if prefix == b"{ key = "), "{err}");
}

#[test]
fn absent_root_is_an_error() {
	let err = to_bytes(&None::<Value>, Format::Xml).expect_err("no root");
	assert!(matches!(err, PlistError::NoRootValue));
}

#[test]
fn unindented_xml_has_no_line_breaks_inside_plist() {
	let mut out = Vec::new();
	Encoder::new(Format::Xml).indent(false).encode(&mut out, &sample_tree()).expect("encodes");
	let text = String::from_utf8(out).expect("utf-8");
	let body_start = text.find("<plist").expect("plist element");
	assert!(!text[body_start..].trim_end().contains('\n'), "{text}");
}

#[test]
fn decoder_depth_limit_applies_to_both_formats() {
	let mut value = Value::Array(Vec::new());
	for _ in 0..10 {
		value = Value::Array(vec![value]);
	}
	let decoder = Decoder::with_options(DecodeOptions {
		max_depth: 5,
		..DecodeOptions::default()
	});

	let binary = to_bytes(&value, Format::Binary).expect("binary encodes");
	assert!(matches!(decoder.decode_value(&binary), Err(PlistError::MalformedBplist { .. })));
	let xml = to_bytes(&value, Format::Xml).expect("xml encodes");
	assert!(matches!(decoder.decode_value(&xml), Err(PlistError::MalformedXml { .. })));
}

#[test]
fn dynamic_decodes_from_either_format() {
	let value = sample_tree();
	let bytes = to_bytes(&value, Format::Xml).expect("encodes");
	let dynamic: Dynamic = archiver_uid_decoder().decode_bytes(&bytes).expect("decodes");

	let expected_nested = BTreeMap::from([("blob".to_owned(), Dynamic::Bytes(vec![0, 1, 2, 255])), ("flag".to_owned(), Dynamic::Bool(false))]);
	assert_eq!(dynamic.get("nested"), Some(&Dynamic::Map(expected_nested)));
	assert_eq!(dynamic.get("uid"), Some(&Dynamic::Uid(300)));
	assert_eq!(dynamic.get("huge"), Some(&Dynamic::Unsigned(u64::MAX)));
}

#[test]
fn xml_uids_read_back_as_dictionaries_by_default() {
	let bytes = to_bytes(&Value::Uid(Uid(3)), Format::Xml).expect("encodes");
	let value: Value = from_bytes(&bytes).expect("decodes");
	let mut expected = Dictionary::new();
	expected.insert("CF$UID", Value::from(3_i64));
	assert_eq!(value, Value::Dictionary(expected));

	let binary = to_bytes(&Value::Uid(Uid(3)), Format::Binary).expect("encodes");
	assert_eq!(from_bytes::<Value>(&binary).expect("decodes"), Value::Uid(Uid(3)));
}

#[test]
fn decoder_node_budget_reaches_binary_reader() {
	// Object 0 is `[1, 1]`, object 1 is `[2, 2]`, object 2 is `true`: seven values.
	let mut bytes = b"bplist00".to_vec();
	bytes.extend_from_slice(&[0xa2, 0x01, 0x01, 0xa2, 0x02, 0x02, 0x09]);
	bytes.extend_from_slice(&[0x08, 0x0b, 0x0e]);
	bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 1, 1]);
	bytes.extend_from_slice(&3_u64.to_be_bytes());
	bytes.extend_from_slice(&0_u64.to_be_bytes());
	bytes.extend_from_slice(&15_u64.to_be_bytes());

	let pair = Value::Array(vec![Value::Boolean(true), Value::Boolean(true)]);
	let expected = Value::Array(vec![pair.clone(), pair]);
	assert_eq!(from_bytes::<Value>(&bytes).expect("default budget"), expected);

	let tight = Decoder::with_options(DecodeOptions {
		max_nodes: 6,
		..DecodeOptions::default()
	});
	assert!(matches!(tight.decode_value(&bytes), Err(PlistError::MalformedBplist { .. })));
}
