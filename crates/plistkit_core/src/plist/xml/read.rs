use base64::Engine;
use base64::alphabet::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, trace};

use crate::plist::scalar::{parse_date, parse_integer, parse_real};
use crate::plist::xml::UID_KEY;
use crate::plist::{Dictionary, PlistError, Result, Uid, Value};

const DATA_ENGINE: GeneralPurpose = GeneralPurpose::new(&STANDARD, GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent));

/// Behavior switches for XML decoding.
#[derive(Debug, Clone)]
pub struct XmlReadOptions {
	/// Decode unknown elements as strings holding their text instead of failing.
	pub lax: bool,
	/// Read a dictionary whose only entry is `CF$UID` with an integer value as a
	/// UID, the keyed-archiver spelling the writer uses.
	pub archiver_uids: bool,
	/// Maximum nesting depth of arrays and dictionaries.
	pub max_depth: u32,
}

impl Default for XmlReadOptions {
	fn default() -> Self {
		Self {
			lax: false,
			archiver_uids: false,
			max_depth: 512,
		}
	}
}

/// Decode a complete XML property list into a value tree.
///
/// The root may be a `<plist version="1.0">` wrapper holding one value or a bare
/// value element.
pub fn read_xml(bytes: &[u8], opt: &XmlReadOptions) -> Result<Value> {
	let mut parser = Parser {
		tokens: Tokens::new(bytes),
		opt,
	};

	let value = match parser.next_significant()? {
		Token::Open { name, empty, version } if name == "plist" => {
			if let Some(version) = version.filter(|version| version != "1.0") {
				return Err(PlistError::xml(format!("unsupported plist version {version:?}")));
			}
			if empty {
				return Err(PlistError::xml("<plist> element holds no value"));
			}
			let value = match parser.next_significant()? {
				Token::Open { name, empty, .. } => parser.read_value(&name, empty, 0)?,
				_ => return Err(PlistError::xml("<plist> element holds no value")),
			};
			match parser.next_significant()? {
				Token::Close(name) if name == "plist" => value,
				_ => return Err(PlistError::xml("<plist> element holds more than one value")),
			}
		}
		Token::Open { name, empty, .. } => parser.read_value(&name, empty, 0)?,
		Token::Close(name) => return Err(PlistError::xml(format!("unexpected </{name}> before root element"))),
		Token::Text(_) | Token::Eof => return Err(PlistError::xml("document has no root element")),
	};

	match parser.next_significant()? {
		Token::Eof => {
			debug!(kind = value.kind(), "decoded xml plist");
			Ok(value)
		}
		_ => Err(PlistError::xml("unexpected content after root element")),
	}
}

enum Token {
	Open { name: String, empty: bool, version: Option<String> },
	Close(String),
	Text(String),
	Eof,
}

struct Tokens<'a> {
	reader: Reader<&'a [u8]>,
}

impl<'a> Tokens<'a> {
	fn new(bytes: &'a [u8]) -> Self {
		let mut reader = Reader::from_reader(bytes);
		reader.config_mut().trim_text(false);
		Self { reader }
	}

	fn next(&mut self) -> Result<Token> {
		loop {
			let event = self
				.reader
				.read_event()
				.map_err(|err| PlistError::xml(format!("at byte {}: {err}", self.reader.buffer_position())))?;
			return match event {
				Event::Start(tag) => open_token(&tag, false),
				Event::Empty(tag) => open_token(&tag, true),
				Event::End(tag) => Ok(Token::Close(element_name(tag.name().as_ref())?)),
				Event::Text(text) => {
					let text = text.unescape().map_err(|err| PlistError::xml(format!("bad character data: {err}")))?;
					Ok(Token::Text(text.into_owned()))
				}
				Event::CData(data) => {
					let text = String::from_utf8(data.into_inner().into_owned()).map_err(|_| PlistError::xml("CDATA section is not valid UTF-8"))?;
					Ok(Token::Text(text))
				}
				Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => continue,
				Event::Eof => Ok(Token::Eof),
			};
		}
	}
}

fn open_token(tag: &BytesStart<'_>, empty: bool) -> Result<Token> {
	let name = element_name(tag.name().as_ref())?;
	let version = match tag.try_get_attribute("version") {
		Ok(Some(attr)) => Some(
			attr.unescape_value()
				.map_err(|err| PlistError::xml(format!("bad version attribute: {err}")))?
				.into_owned(),
		),
		Ok(None) => None,
		Err(err) => return Err(PlistError::xml(format!("bad attributes on <{name}>: {err}"))),
	};
	Ok(Token::Open { name, empty, version })
}

fn element_name(raw: &[u8]) -> Result<String> {
	std::str::from_utf8(raw)
		.map(str::to_owned)
		.map_err(|_| PlistError::xml("element name is not valid UTF-8"))
}

struct Parser<'a, 'o> {
	tokens: Tokens<'a>,
	opt: &'o XmlReadOptions,
}

impl Parser<'_, '_> {
	/// Next token that is not inter-element whitespace.
	fn next_significant(&mut self) -> Result<Token> {
		loop {
			match self.tokens.next()? {
				Token::Text(text) if text.trim().is_empty() => continue,
				Token::Text(text) => return Err(PlistError::xml(format!("unexpected text {:?} between elements", truncate(&text)))),
				token => return Ok(token),
			}
		}
	}

	fn read_value(&mut self, name: &str, empty: bool, depth: u32) -> Result<Value> {
		if depth >= self.opt.max_depth {
			return Err(PlistError::xml(format!("nesting exceeds max depth {}", self.opt.max_depth)));
		}
		trace!(element = name, depth, "reading xml element");

		match name {
			"dict" => self.read_dict(empty, depth),
			"array" => self.read_array(empty, depth),
			"string" => Ok(Value::String(self.read_text(name, empty)?)),
			"integer" => {
				let text = self.read_text(name, empty)?;
				parse_integer(&text)
					.map(Value::Integer)
					.ok_or_else(|| PlistError::xml(format!("invalid integer {:?}", truncate(&text))))
			}
			"real" => {
				let text = self.read_text(name, empty)?;
				parse_real(&text)
					.map(Value::Real)
					.ok_or_else(|| PlistError::xml(format!("invalid real {:?}", truncate(&text))))
			}
			"true" | "false" => {
				let text = self.read_text(name, empty)?;
				if !text.trim().is_empty() {
					return Err(PlistError::xml(format!("<{name}> must be empty")));
				}
				Ok(Value::Boolean(name == "true"))
			}
			"date" => {
				let text = self.read_text(name, empty)?;
				parse_date(&text)
					.map(Value::Date)
					.ok_or_else(|| PlistError::xml(format!("invalid date {:?}", truncate(&text))))
			}
			"data" => {
				let text = self.read_text(name, empty)?;
				let compact: String = text.chars().filter(|ch| !ch.is_ascii_whitespace()).collect();
				DATA_ENGINE
					.decode(compact)
					.map(Value::Data)
					.map_err(|err| PlistError::xml(format!("invalid base64 data: {err}")))
			}
			"key" => Err(PlistError::xml("<key> outside of <dict>")),
			"plist" => Err(PlistError::xml("nested <plist> element")),
			other if self.opt.lax => {
				debug!(element = other, "decoding unknown element as string");
				Ok(Value::String(self.read_text(other, empty)?))
			}
			other => Err(PlistError::xml(format!("unknown element <{other}>"))),
		}
	}

	fn read_dict(&mut self, empty: bool, depth: u32) -> Result<Value> {
		let mut dict = Dictionary::new();
		if empty {
			return Ok(Value::Dictionary(dict));
		}

		loop {
			let key = match self.next_significant()? {
				Token::Close(name) if name == "dict" => break,
				Token::Open { name, empty, .. } if name == "key" => self.read_text("key", empty)?,
				Token::Open { name, .. } => return Err(PlistError::xml(format!("<{name}> in <dict> without a preceding <key>"))),
				Token::Close(name) => return Err(PlistError::xml(format!("unexpected </{name}> in <dict>"))),
				Token::Text(_) | Token::Eof => return Err(PlistError::xml("unterminated <dict>")),
			};
			let value = match self.next_significant()? {
				Token::Open { name, .. } if name == "key" => return Err(PlistError::xml(format!("key {key:?} has no value"))),
				Token::Open { name, empty, .. } => self.read_value(&name, empty, depth + 1)?,
				_ => return Err(PlistError::xml(format!("key {key:?} has no value"))),
			};
			dict.insert(key, value);
		}

		if self.opt.archiver_uids {
			return Ok(uid_from_dict(dict));
		}
		Ok(Value::Dictionary(dict))
	}

	fn read_array(&mut self, empty: bool, depth: u32) -> Result<Value> {
		let mut items = Vec::new();
		if empty {
			return Ok(Value::Array(items));
		}

		loop {
			match self.next_significant()? {
				Token::Close(name) if name == "array" => return Ok(Value::Array(items)),
				Token::Open { name, empty, .. } => items.push(self.read_value(&name, empty, depth + 1)?),
				Token::Close(name) => return Err(PlistError::xml(format!("unexpected </{name}> in <array>"))),
				Token::Text(_) | Token::Eof => return Err(PlistError::xml("unterminated <array>")),
			}
		}
	}

	/// Collect character data up to the matching close tag.
	fn read_text(&mut self, name: &str, empty: bool) -> Result<String> {
		let mut out = String::new();
		if empty {
			return Ok(out);
		}

		loop {
			match self.tokens.next()? {
				Token::Text(text) => out.push_str(&text),
				Token::Close(close) if close == name => return Ok(out),
				Token::Close(close) => return Err(PlistError::xml(format!("</{close}> does not close <{name}>"))),
				Token::Open { name: child, .. } => return Err(PlistError::xml(format!("<{child}> is not allowed inside <{name}>"))),
				Token::Eof => return Err(PlistError::xml(format!("unterminated <{name}>"))),
			}
		}
	}
}

/// Fold the keyed-archiver `{CF$UID: n}` spelling back into a UID.
fn uid_from_dict(dict: Dictionary) -> Value {
	if dict.len() == 1 {
		if let Some(Value::Integer(int)) = dict.get(UID_KEY) {
			if let Some(uid) = int.as_u64() {
				return Value::Uid(Uid(uid));
			}
		}
	}
	Value::Dictionary(dict)
}

fn truncate(text: &str) -> String {
	text.chars().take(32).collect()
}
