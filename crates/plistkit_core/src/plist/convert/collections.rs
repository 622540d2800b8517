use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::plist::{DecodeContext, Dictionary, FromPlist, Result, Shape, ToPlist, Value};

impl<T: FromPlist> FromPlist for Option<T> {
	fn shape() -> Shape {
		Shape::Optional(Box::new(T::shape()))
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		T::from_plist(value, cx).map(Some)
	}
}

impl<T: ToPlist> ToPlist for Option<T> {
	fn to_plist(&self) -> Option<Value> {
		self.as_ref().and_then(ToPlist::to_plist)
	}
}

impl<T: FromPlist> FromPlist for Box<T> {
	fn shape() -> Shape {
		T::shape()
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		T::from_plist(value, cx).map(Box::new)
	}
}

impl<T: ToPlist + ?Sized> ToPlist for Box<T> {
	fn to_plist(&self) -> Option<Value> {
		(**self).to_plist()
	}
}

impl<T: ToPlist + ?Sized> ToPlist for &T {
	fn to_plist(&self) -> Option<Value> {
		(**self).to_plist()
	}
}

impl<T: FromPlist> FromPlist for Vec<T> {
	fn shape() -> Shape {
		Shape::Sequence(Box::new(T::shape()))
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		let Value::Array(items) = value else {
			return Err(cx.mismatch(&Self::shape(), value));
		};

		let mut out = Vec::with_capacity(items.len());
		for (idx, item) in items.iter().enumerate() {
			out.push(cx.at_index(idx, |cx| T::from_plist(item, cx))?);
		}
		Ok(out)
	}
}

impl<T: ToPlist> ToPlist for Vec<T> {
	fn to_plist(&self) -> Option<Value> {
		self.as_slice().to_plist()
	}
}

impl<T: ToPlist> ToPlist for [T] {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::Array(self.iter().filter_map(ToPlist::to_plist).collect()))
	}
}

/// Convert every dictionary entry, in stored order, into `insert`.
fn read_entries<V: FromPlist>(
	value: &Value,
	cx: &mut DecodeContext<'_>,
	shape: impl FnOnce() -> Shape,
	mut insert: impl FnMut(String, V),
) -> Result<()> {
	let Value::Dictionary(dict) = value else {
		return Err(cx.mismatch(&shape(), value));
	};

	for (key, item) in dict.iter() {
		let converted = cx.at_key(key, |cx| V::from_plist(item, cx))?;
		insert(key.to_owned(), converted);
	}
	Ok(())
}

impl<V: FromPlist, S: BuildHasher + Default> FromPlist for HashMap<String, V, S> {
	fn shape() -> Shape {
		Shape::Mapping(Box::new(V::shape()))
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		let mut out = HashMap::with_hasher(S::default());
		read_entries(value, cx, Self::shape, |key, item| {
			out.insert(key, item);
		})?;
		Ok(out)
	}
}

impl<V: ToPlist, S: BuildHasher> ToPlist for HashMap<String, V, S> {
	// Keys are sorted so output does not depend on hasher state.
	fn to_plist(&self) -> Option<Value> {
		let mut entries: Vec<(&String, &V)> = self.iter().collect();
		entries.sort_by(|lhs, rhs| lhs.0.cmp(rhs.0));
		Some(Value::Dictionary(
			entries
				.into_iter()
				.filter_map(|(key, item)| item.to_plist().map(|value| (key.as_str(), value)))
				.collect::<Dictionary>(),
		))
	}
}

impl<V: FromPlist> FromPlist for BTreeMap<String, V> {
	fn shape() -> Shape {
		Shape::Mapping(Box::new(V::shape()))
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		let mut out = BTreeMap::new();
		read_entries(value, cx, Self::shape, |key, item| {
			out.insert(key, item);
		})?;
		Ok(out)
	}
}

impl<V: ToPlist> ToPlist for BTreeMap<String, V> {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::Dictionary(
			self.iter()
				.filter_map(|(key, item)| item.to_plist().map(|value| (key.as_str(), value)))
				.collect::<Dictionary>(),
		))
	}
}
