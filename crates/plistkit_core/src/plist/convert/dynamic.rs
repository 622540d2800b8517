use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::plist::{Date, DecodeContext, Dictionary, FromPlist, Integer, Result, Shape, ToPlist, Uid, Value};

/// Host-side mirror of [`Value`] for callers that do not know the layout ahead of time.
///
/// Decoding into `Dynamic` never fails on kind: every value converts. Maps are
/// keyed in sorted order, so a repeated dictionary key keeps its last value.
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic {
	/// Dictionary.
	Map(BTreeMap<String, Dynamic>),
	/// Array.
	Seq(Vec<Dynamic>),
	/// Text.
	String(String),
	/// Integer that fits `i64`.
	Signed(i64),
	/// Integer above `i64::MAX`.
	Unsigned(u64),
	/// Real.
	Real(f64),
	/// Boolean.
	Bool(bool),
	/// Data blob.
	Bytes(Vec<u8>),
	/// Date.
	Time(DateTime<Utc>),
	/// Keyed-archiver reference.
	Uid(u64),
}

impl Dynamic {
	/// Stable lowercase label of the variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Map(_) => "map",
			Self::Seq(_) => "seq",
			Self::String(_) => "string",
			Self::Signed(_) => "signed",
			Self::Unsigned(_) => "unsigned",
			Self::Real(_) => "real",
			Self::Bool(_) => "bool",
			Self::Bytes(_) => "bytes",
			Self::Time(_) => "time",
			Self::Uid(_) => "uid",
		}
	}

	/// Borrow the map payload, if any.
	pub fn as_map(&self) -> Option<&BTreeMap<String, Dynamic>> {
		match self {
			Self::Map(map) => Some(map),
			_ => None,
		}
	}

	/// Look up `key` when this is a map.
	pub fn get(&self, key: &str) -> Option<&Dynamic> {
		self.as_map()?.get(key)
	}
}

impl FromPlist for Dynamic {
	fn shape() -> Shape {
		Shape::Dynamic
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		Ok(match value {
			Value::Dictionary(dict) => {
				let mut map = BTreeMap::new();
				for (key, item) in dict.iter() {
					let item = cx.at_key(key, |cx| Self::from_plist(item, cx))?;
					map.insert(key.to_owned(), item);
				}
				Self::Map(map)
			}
			Value::Array(items) => {
				let mut seq = Vec::with_capacity(items.len());
				for (idx, item) in items.iter().enumerate() {
					seq.push(cx.at_index(idx, |cx| Self::from_plist(item, cx))?);
				}
				Self::Seq(seq)
			}
			Value::String(text) => Self::String(text.clone()),
			Value::Integer(int) => match int.as_i64() {
				Some(signed) => Self::Signed(signed),
				None => Self::Unsigned(int.as_u64().unwrap_or(u64::MAX)),
			},
			Value::Real(real) => Self::Real(*real),
			Value::Boolean(flag) => Self::Bool(*flag),
			Value::Date(date) => Self::Time(date.to_datetime().ok_or_else(|| cx.overflow(date.seconds(), "DateTime<Utc>"))?),
			Value::Data(bytes) => Self::Bytes(bytes.clone()),
			Value::Uid(uid) => Self::Uid(uid.get()),
		})
	}
}

impl ToPlist for Dynamic {
	fn to_plist(&self) -> Option<Value> {
		Some(match self {
			Self::Map(map) => Value::Dictionary(
				map.iter()
					.filter_map(|(key, item)| item.to_plist().map(|value| (key.as_str(), value)))
					.collect::<Dictionary>(),
			),
			Self::Seq(items) => Value::Array(items.iter().filter_map(ToPlist::to_plist).collect()),
			Self::String(text) => Value::String(text.clone()),
			Self::Signed(int) => Value::Integer(Integer::from_i64(*int)),
			Self::Unsigned(int) => Value::Integer(Integer::from_u64(*int)),
			Self::Real(real) => Value::Real(*real),
			Self::Bool(flag) => Value::Boolean(*flag),
			Self::Bytes(bytes) => Value::Data(bytes.clone()),
			Self::Time(time) => Value::Date(Date::from_datetime(*time)),
			Self::Uid(uid) => Value::Uid(Uid(*uid)),
		})
	}
}
