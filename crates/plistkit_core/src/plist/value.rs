use chrono::{DateTime, Utc};

/// Seconds between the Unix epoch and the property-list epoch (2001-01-01T00:00:00Z).
pub const PLIST_EPOCH_UNIX_SECONDS: i64 = 978_307_200;

/// One node of a decoded property-list tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// String-keyed entries in document order.
	Dictionary(Dictionary),
	/// Ordered elements.
	Array(Vec<Value>),
	/// UTF-8 text.
	String(String),
	/// Integer up to 64 bits, signed or unsigned.
	Integer(Integer),
	/// Floating-point number.
	Real(f64),
	/// Boolean flag.
	Boolean(bool),
	/// Absolute time.
	Date(Date),
	/// Raw bytes.
	Data(Vec<u8>),
	/// Keyed-archiver object reference.
	Uid(Uid),
}

impl Value {
	/// Stable lowercase label for the variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Dictionary(_) => "dictionary",
			Self::Array(_) => "array",
			Self::String(_) => "string",
			Self::Integer(_) => "integer",
			Self::Real(_) => "real",
			Self::Boolean(_) => "boolean",
			Self::Date(_) => "date",
			Self::Data(_) => "data",
			Self::Uid(_) => "uid",
		}
	}

	/// Borrow the dictionary payload, if any.
	pub fn as_dictionary(&self) -> Option<&Dictionary> {
		match self {
			Self::Dictionary(dict) => Some(dict),
			_ => None,
		}
	}

	/// Borrow the array payload, if any.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Borrow the string payload, if any.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(text) => Some(text),
			_ => None,
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Integer(Integer::from_i64(value))
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Self::Integer(Integer::from_u64(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Real(value)
	}
}

impl From<Dictionary> for Value {
	fn from(value: Dictionary) -> Self {
		Self::Dictionary(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Self::Array(value)
	}
}

/// Ordered dictionary entries; keys are strings, duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
	entries: Vec<(String, Value)>,
}

impl Dictionary {
	/// Create an empty dictionary.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an empty dictionary with room for `capacity` entries.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: Vec::with_capacity(capacity),
		}
	}

	/// Append an entry, keeping any earlier entry with the same key.
	pub fn insert(&mut self, key: impl Into<String>, value: Value) {
		self.entries.push((key.into(), value));
	}

	/// Look up a key; the last entry wins when a key repeats.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.iter().rev().find(|(candidate, _)| candidate == key).map(|(_, value)| value)
	}

	/// Number of stored entries, duplicates included.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the dictionary has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate entries in stored order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Iterate keys in stored order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(key, _)| key.as_str())
	}

	/// Iterate values in stored order.
	pub fn values(&self) -> impl Iterator<Item = &Value> {
		self.entries.iter().map(|(_, value)| value)
	}
}

impl<K: Into<String>> FromIterator<(K, Value)> for Dictionary {
	fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().map(|(key, value)| (key.into(), value)).collect(),
		}
	}
}

impl IntoIterator for Dictionary {
	type Item = (String, Value);
	type IntoIter = std::vec::IntoIter<(String, Value)>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

/// 64-bit integer payload with a signedness flag.
///
/// Values that fit `i64` are always stored signed, so equal numbers compare
/// equal regardless of how they were built. Only values above `i64::MAX` are
/// stored unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
	bits: u64,
	signed: bool,
}

impl Integer {
	/// Build from a signed value.
	pub fn from_i64(value: i64) -> Self {
		Self {
			bits: value as u64,
			signed: true,
		}
	}

	/// Build from an unsigned value.
	pub fn from_u64(value: u64) -> Self {
		Self {
			bits: value,
			signed: i64::try_from(value).is_ok(),
		}
	}

	/// Whether the payload is interpreted as two's-complement `i64`.
	pub fn is_signed(self) -> bool {
		self.signed
	}

	/// Value as `i64` when representable.
	pub fn as_i64(self) -> Option<i64> {
		if self.signed { Some(self.bits as i64) } else { None }
	}

	/// Value as `u64` when representable.
	pub fn as_u64(self) -> Option<u64> {
		if self.signed { u64::try_from(self.bits as i64).ok() } else { Some(self.bits) }
	}

	/// Lossless widening.
	pub fn as_i128(self) -> i128 {
		if self.signed { i128::from(self.bits as i64) } else { i128::from(self.bits) }
	}
}

impl std::fmt::Display for Integer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_i128())
	}
}

/// Absolute time as seconds since 2001-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Date(pub f64);

impl Date {
	/// Seconds relative to the property-list epoch.
	pub fn seconds(self) -> f64 {
		self.0
	}

	/// Convert to a UTC timestamp; `None` when outside chrono's range.
	pub fn to_datetime(self) -> Option<DateTime<Utc>> {
		if !self.0.is_finite() {
			return None;
		}
		let whole = self.0.floor();
		let secs = (whole as i64).checked_add(PLIST_EPOCH_UNIX_SECONDS)?;
		let nanos = ((self.0 - whole) * 1e9).round().min(999_999_999.0) as u32;
		DateTime::from_timestamp(secs, nanos)
	}

	/// Convert from a UTC timestamp.
	pub fn from_datetime(value: DateTime<Utc>) -> Self {
		let secs = value.timestamp() - PLIST_EPOCH_UNIX_SECONDS;
		Self(secs as f64 + f64::from(value.timestamp_subsec_nanos()) / 1e9)
	}
}

/// Keyed-archiver object reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Uid(pub u64);

impl Uid {
	/// Raw reference index.
	pub fn get(self) -> u64 {
		self.0
	}
}

/// Opaque byte blob bound to `<data>` / binary data objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Data(pub Vec<u8>);

impl From<Vec<u8>> for Data {
	fn from(value: Vec<u8>) -> Self {
		Self(value)
	}
}

impl AsRef<[u8]> for Data {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}
