use std::fmt::Write as _;
use std::path::PathBuf;

use plistkit::plist::{DecodeOptions, Decoder, Result, Value, format_date, format_real};

use crate::cmd::util::{emit_json, read_input, value_to_json_value};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	/// Decode unknown XML elements as strings.
	#[arg(long)]
	pub lax: bool,
}

/// Decode a property list and print its value tree.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json, lax } = args;

	let bytes = read_input(&path)?;
	let options = if lax { DecodeOptions::lax() } else { DecodeOptions::default() };
	let (format, value) = Decoder::with_options(options).decode_value(&bytes)?;

	if json {
		let payload = DumpJson {
			path: path.display().to_string(),
			format: format.as_str(),
			value: value_to_json_value(&value),
		};
		emit_json(&payload);
		return Ok(());
	}

	let mut out = String::new();
	render_value(&mut out, &value, 0);
	print!("{out}");
	Ok(())
}

#[derive(serde::Serialize)]
struct DumpJson {
	path: String,
	format: &'static str,
	value: serde_json::Value,
}

/// Render `value` as indented text, two spaces per level.
pub(crate) fn render_value(out: &mut String, value: &Value, depth: usize) {
	match value {
		Value::Dictionary(dict) => {
			let _ = writeln!(out, "dictionary ({})", dict.len());
			for (key, item) in dict.iter() {
				let _ = write!(out, "{:indent$}{key:?} = ", "", indent = (depth + 1) * 2);
				render_value(out, item, depth + 1);
			}
		}
		Value::Array(items) => {
			let _ = writeln!(out, "array ({})", items.len());
			for (idx, item) in items.iter().enumerate() {
				let _ = write!(out, "{:indent$}[{idx}] = ", "", indent = (depth + 1) * 2);
				render_value(out, item, depth + 1);
			}
		}
		Value::String(text) => {
			let _ = writeln!(out, "string {text:?}");
		}
		Value::Integer(int) => {
			let _ = writeln!(out, "integer {int}");
		}
		Value::Real(real) => {
			let _ = writeln!(out, "real {}", format_real(*real));
		}
		Value::Boolean(flag) => {
			let _ = writeln!(out, "boolean {flag}");
		}
		Value::Date(date) => match format_date(*date) {
			Some(text) => {
				let _ = writeln!(out, "date {text}");
			}
			None => {
				let _ = writeln!(out, "date {}s", date.seconds());
			}
		},
		Value::Data(bytes) => {
			let _ = writeln!(out, "data ({} bytes) {}", bytes.len(), hex_preview(bytes));
		}
		Value::Uid(uid) => {
			let _ = writeln!(out, "uid {}", uid.get());
		}
	}
}

fn hex_preview(bytes: &[u8]) -> String {
	const LIMIT: usize = 16;
	let mut out = String::new();
	for byte in bytes.iter().take(LIMIT) {
		let _ = write!(out, "{byte:02x}");
	}
	if bytes.len() > LIMIT {
		out.push_str("..");
	}
	out
}
