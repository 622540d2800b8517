#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use plistkit::plist::{BinaryTrailer, Data, Decoder, Dynamic, Format, Value, from_bytes, to_bytes};
use plistkit_testkit::fixture_bytes;

plistkit::plist_record! {
	#[derive(Debug, Default, PartialEq)]
	struct Everything {
		intarray: Vec<u64>,
		floats: Vec<f64>,
		booleans: Vec<bool>,
		strings: Vec<String>,
		data: Data,
		date: Option<chrono::DateTime<Utc>>,
	}
}

fn expected() -> Everything {
	Everything {
		intarray: vec![1, 8, 16, 32, 64, 2, 9, 17, 33, 65],
		floats: vec![32.0, 64.0],
		booleans: vec![true, false],
		strings: vec!["Hello, ASCII".to_owned(), "Hello, 世界".to_owned()],
		data: Data(vec![1, 2, 3, 4]),
		date: Utc.with_ymd_and_hms(2013, 11, 27, 0, 34, 0).single(),
	}
}

#[test]
fn binary_fixture_trailer_parses() {
	let bytes = fixture_bytes("everything.bplist");
	let trailer = BinaryTrailer::parse(&bytes).expect("trailer parses");
	assert_eq!(trailer.num_objects, 29);
	assert_eq!(trailer.top_object, 0);
	assert_eq!(trailer.offset_int_size, 1);
	assert_eq!(trailer.object_ref_size, 1);
}

#[test]
fn binary_fixture_decodes_into_record() {
	let everything: Everything = from_bytes(&fixture_bytes("everything.bplist")).expect("decodes");
	assert_eq!(everything, expected());
}

#[test]
fn xml_fixture_matches_binary_fixture() {
	let decoder = Decoder::new();
	let (binary_format, binary) = decoder.decode_value(&fixture_bytes("everything.bplist")).expect("binary decodes");
	let (xml_format, xml) = decoder.decode_value(&fixture_bytes("everything.plist")).expect("xml decodes");

	assert_eq!(binary_format, Format::Binary);
	assert_eq!(xml_format, Format::Xml);
	assert_eq!(binary, xml);
}

#[test]
fn binary_fixture_decodes_into_dynamic() {
	let dynamic: Dynamic = from_bytes(&fixture_bytes("everything.bplist")).expect("decodes");
	let map = dynamic.as_map().expect("root map");

	assert_eq!(map.len(), 6);
	assert_eq!(map["floats"], Dynamic::Seq(vec![Dynamic::Real(32.0), Dynamic::Real(64.0)]));
	assert_eq!(map["data"], Dynamic::Bytes(vec![1, 2, 3, 4]));
	assert!(matches!(map["date"], Dynamic::Time(_)));
}

#[test]
fn reencoding_preserves_the_tree() {
	let original: Value = from_bytes(&fixture_bytes("everything.bplist")).expect("decodes");
	for format in [Format::Binary, Format::Xml] {
		let bytes = to_bytes(&original, format).expect("encodes");
		let back: Value = from_bytes(&bytes).expect("decodes again");
		assert_eq!(back, original, "format={format}");
	}
}

#[test]
fn record_reencodes_to_equivalent_tree() {
	let bytes = to_bytes(&expected(), Format::Binary).expect("encodes");
	let reread: Everything = from_bytes(&bytes).expect("decodes");
	assert_eq!(reread, expected());
}
