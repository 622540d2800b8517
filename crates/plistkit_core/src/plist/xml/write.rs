use std::borrow::Cow;
use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::plist::scalar::{format_date, format_real};
use crate::plist::xml::UID_KEY;
use crate::plist::{PlistError, Result, Value};

const DOCTYPE: &str = r#"plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd""#;

/// Encode a value tree as a plist 1.0 XML document.
///
/// With `indent` set, nested elements are placed on their own lines and indented
/// with one tab per level. Characters XML 1.0 cannot carry in strings and keys
/// are written as U+FFFD.
pub fn write_xml<W: Write>(out: W, value: &Value, indent: bool) -> Result<()> {
	let mut writer = if indent { Writer::new_with_indent(out, b'\t', 1) } else { Writer::new(out) };

	emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
	emit(&mut writer, Event::DocType(BytesText::from_escaped(DOCTYPE)))?;
	let mut root = BytesStart::new("plist");
	root.push_attribute(("version", "1.0"));
	emit(&mut writer, Event::Start(root))?;
	write_value(&mut writer, value, &mut String::from("root"))?;
	emit(&mut writer, Event::End(BytesEnd::new("plist")))?;
	writer.get_mut().write_all(b"\n")?;
	Ok(())
}

/// `path` names the value being written, for errors.
fn write_value<W: Write>(writer: &mut Writer<W>, value: &Value, path: &mut String) -> Result<()> {
	match value {
		Value::Dictionary(dict) => {
			if dict.is_empty() {
				return emit(writer, Event::Empty(BytesStart::new("dict")));
			}
			emit(writer, Event::Start(BytesStart::new("dict")))?;
			for (key, item) in dict.iter() {
				text_element(writer, "key", key)?;
				let len = path.len();
				path.push('.');
				path.push_str(key);
				write_value(writer, item, path)?;
				path.truncate(len);
			}
			emit(writer, Event::End(BytesEnd::new("dict")))
		}
		Value::Array(items) => {
			if items.is_empty() {
				return emit(writer, Event::Empty(BytesStart::new("array")));
			}
			emit(writer, Event::Start(BytesStart::new("array")))?;
			for (idx, item) in items.iter().enumerate() {
				let len = path.len();
				path.push_str(&format!("[{idx}]"));
				write_value(writer, item, path)?;
				path.truncate(len);
			}
			emit(writer, Event::End(BytesEnd::new("array")))
		}
		Value::String(text) => text_element(writer, "string", text),
		Value::Integer(int) => text_element(writer, "integer", &int.to_string()),
		Value::Real(real) => text_element(writer, "real", &format_real(*real)),
		Value::Boolean(flag) => emit(writer, Event::Empty(BytesStart::new(if *flag { "true" } else { "false" }))),
		Value::Date(date) => {
			let text = format_date(*date).ok_or_else(|| PlistError::Overflow {
				path: path.clone(),
				value: format!("{} seconds from 2001", date.seconds()),
				target: "xml date",
			})?;
			text_element(writer, "date", &text)
		}
		Value::Data(bytes) => text_element(writer, "data", &STANDARD.encode(bytes)),
		Value::Uid(uid) => {
			emit(writer, Event::Start(BytesStart::new("dict")))?;
			text_element(writer, "key", UID_KEY)?;
			text_element(writer, "integer", &uid.get().to_string())?;
			emit(writer, Event::End(BytesEnd::new("dict")))
		}
	}
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
	emit(writer, Event::Start(BytesStart::new(name)))?;
	// Always emit a text event, even when empty, so the close tag stays on the same line.
	emit(writer, Event::Text(BytesText::new(&xml_chars(text))))?;
	emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
	writer
		.write_event(event)
		.map_err(|err| PlistError::Io(std::io::Error::other(err)))
}

/// Replace characters outside the XML 1.0 `Char` production with U+FFFD.
fn xml_chars(text: &str) -> Cow<'_, str> {
	if text.chars().all(is_xml_char) {
		return Cow::Borrowed(text);
	}
	Cow::Owned(text.chars().map(|ch| if is_xml_char(ch) { ch } else { char::REPLACEMENT_CHARACTER }).collect())
}

fn is_xml_char(ch: char) -> bool {
	matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
