use std::io::{Read, Write};

use tracing::debug;

use crate::plist::{
	BinaryReadOptions, DecodeContext, Format, FromPlist, PlistError, Result, ToPlist, Value, XmlReadOptions, read_binary, read_xml, sniff,
	write_binary, write_xml,
};

/// Runtime behavior switches for decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Coerce string values into integer, real, and boolean targets; decode
	/// unknown XML elements as strings.
	pub lax: bool,
	/// Fail with `KeyBinding` when a dictionary key has no record field.
	pub deny_unknown_keys: bool,
	/// Maximum nesting depth accepted by either codec.
	pub max_depth: u32,
	/// Budget of values a binary document may expand to through shared references.
	pub max_nodes: usize,
	/// Read XML `{CF$UID: n}` dictionaries back as UIDs.
	pub archiver_uids: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			lax: false,
			deny_unknown_keys: false,
			max_depth: 512,
			max_nodes: 1 << 20,
			archiver_uids: false,
		}
	}
}

impl DecodeOptions {
	/// Lax coercion preset.
	pub fn lax() -> Self {
		Self {
			lax: true,
			..Self::default()
		}
	}

	/// Strict preset that also rejects keys with no record field.
	pub fn strict_keys() -> Self {
		Self {
			deny_unknown_keys: true,
			..Self::default()
		}
	}
}

/// Format-sniffing decoder.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
	options: DecodeOptions,
}

impl Decoder {
	/// Decoder with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Decoder with explicit options.
	pub fn with_options(options: DecodeOptions) -> Self {
		Self { options }
	}

	/// Options in effect.
	pub fn options(&self) -> &DecodeOptions {
		&self.options
	}

	/// Read `reader` to the end and decode it into `T`.
	pub fn decode<T: FromPlist, R: Read>(&self, mut reader: R) -> Result<T> {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes)?;
		self.decode_bytes(&bytes)
	}

	/// Decode a complete document into `T`.
	pub fn decode_bytes<T: FromPlist>(&self, bytes: &[u8]) -> Result<T> {
		let (_, value) = self.decode_value(bytes)?;
		let mut cx = DecodeContext::new(&self.options);
		T::from_plist(&value, &mut cx)
	}

	/// Decode a complete document into a value tree, reporting the detected format.
	pub fn decode_value(&self, bytes: &[u8]) -> Result<(Format, Value)> {
		let format = sniff(bytes)?;
		debug!(%format, len = bytes.len(), "decoding plist");
		let value = match format {
			Format::Binary => read_binary(
				bytes,
				&BinaryReadOptions {
					max_depth: self.options.max_depth,
					max_nodes: self.options.max_nodes,
				},
			)?,
			Format::Xml => read_xml(
				bytes,
				&XmlReadOptions {
					lax: self.options.lax,
					archiver_uids: self.options.archiver_uids,
					max_depth: self.options.max_depth,
				},
			)?,
		};
		Ok((format, value))
	}
}

/// Encoder targeting one wire format.
#[derive(Debug, Clone)]
pub struct Encoder {
	format: Format,
	indent: bool,
}

impl Encoder {
	/// Encoder for `format`; XML output is indented.
	pub fn new(format: Format) -> Self {
		Self { format, indent: true }
	}

	/// Toggle XML indentation. Binary output ignores it.
	pub fn indent(mut self, indent: bool) -> Self {
		self.indent = indent;
		self
	}

	/// Target format.
	pub fn format(&self) -> Format {
		self.format
	}

	/// Project `value` and write it to `writer`.
	pub fn encode<T: ToPlist + ?Sized, W: Write>(&self, writer: W, value: &T) -> Result<()> {
		let value = value.to_plist().ok_or(PlistError::NoRootValue)?;
		self.encode_value(writer, &value)
	}

	/// Write an existing value tree to `writer`.
	pub fn encode_value<W: Write>(&self, mut writer: W, value: &Value) -> Result<()> {
		match self.format {
			Format::Binary => writer.write_all(&write_binary(value))?,
			Format::Xml => write_xml(&mut writer, value, self.indent)?,
		}
		writer.flush()?;
		Ok(())
	}
}

/// Decode a complete document with default options.
pub fn from_bytes<T: FromPlist>(bytes: &[u8]) -> Result<T> {
	Decoder::new().decode_bytes(bytes)
}

/// Read a complete document from `reader` and decode it with default options.
pub fn from_reader<T: FromPlist, R: Read>(reader: R) -> Result<T> {
	Decoder::new().decode(reader)
}

/// Encode `value` into a new buffer.
pub fn to_bytes<T: ToPlist + ?Sized>(value: &T, format: Format) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	Encoder::new(format).encode(&mut out, value)?;
	Ok(out)
}

/// Encode `value` into `writer`.
pub fn to_writer<T: ToPlist + ?Sized, W: Write>(writer: W, value: &T, format: Format) -> Result<()> {
	Encoder::new(format).encode(writer, value)
}

#[cfg(test)]
mod tests;
