use std::str::FromStr;

use crate::plist::{PlistError, Result};

/// Magic prefix of binary property lists.
pub const BPLIST_MAGIC: &[u8; 8] = b"bplist00";
const BPLIST_FAMILY: &[u8; 6] = b"bplist";
const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";
const XML_LOOKAHEAD: usize = 1024;

/// Wire representation of a property list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
	/// `bplist00` container.
	Binary,
	/// Plist 1.0 XML document.
	Xml,
}

impl Format {
	/// Render format as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Binary => "binary",
			Self::Xml => "xml",
		}
	}
}

impl std::fmt::Display for Format {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Format {
	type Err = String;

	fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
		match value.to_ascii_lowercase().as_str() {
			"binary" | "bplist" | "bin" => Ok(Self::Binary),
			"xml" => Ok(Self::Xml),
			other => Err(format!("unknown plist format {other:?} (expected binary or xml)")),
		}
	}
}

/// Detect the wire format from the leading bytes of a document.
pub fn sniff(bytes: &[u8]) -> Result<Format> {
	if bytes.starts_with(BPLIST_MAGIC) {
		return Ok(Format::Binary);
	}
	if bytes.starts_with(BPLIST_FAMILY) {
		return Err(unknown(bytes));
	}

	let body = bytes.strip_prefix(UTF8_BOM.as_slice()).unwrap_or(bytes);
	let first = body.iter().take(XML_LOOKAHEAD).find(|byte| !byte.is_ascii_whitespace());
	match first {
		Some(b'<') => Ok(Format::Xml),
		_ => Err(unknown(bytes)),
	}
}

fn unknown(bytes: &[u8]) -> PlistError {
	PlistError::UnknownFormat {
		prefix: bytes.iter().take(8).copied().collect(),
	}
}
