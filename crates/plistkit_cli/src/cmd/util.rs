use std::path::Path;

use plistkit::plist::{Result, Value, format_date, format_real};
use serde_json::{Map, Value as JsonValue};

/// Read a whole input file.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
	let bytes = std::fs::read(path)?;
	tracing::debug!(path = %path.display(), len = bytes.len(), "read input");
	Ok(bytes)
}

/// Print a serializable payload as pretty JSON on stdout.
pub fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to serialize json: {err}"),
	}
}

/// Map a value tree onto JSON.
///
/// Dictionaries keep the last entry of a repeated key. Non-finite reals and
/// out-of-range dates become strings; data becomes an array of byte values.
pub fn value_to_json_value(value: &Value) -> JsonValue {
	match value {
		Value::Dictionary(dict) => {
			let mut out = Map::new();
			for (key, item) in dict.iter() {
				out.insert(key.to_owned(), value_to_json_value(item));
			}
			JsonValue::Object(out)
		}
		Value::Array(items) => JsonValue::Array(items.iter().map(value_to_json_value).collect()),
		Value::String(text) => serde_json::json!(text),
		Value::Integer(int) => match int.as_i64() {
			Some(signed) => serde_json::json!(signed),
			None => serde_json::json!(int.as_u64()),
		},
		Value::Real(real) if real.is_finite() => serde_json::json!(real),
		Value::Real(real) => serde_json::json!(format_real(*real)),
		Value::Boolean(flag) => serde_json::json!(flag),
		Value::Date(date) => match format_date(*date) {
			Some(text) => serde_json::json!(text),
			None => serde_json::json!(date.seconds().to_string()),
		},
		Value::Data(bytes) => JsonValue::Array(bytes.iter().map(|byte| serde_json::json!(byte)).collect()),
		Value::Uid(uid) => serde_json::json!({ "CF$UID": uid.get() }),
	}
}
