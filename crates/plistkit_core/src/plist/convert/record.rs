use tracing::trace;

use crate::plist::{DecodeContext, Dictionary, FromPlist, RecordShape, Result, Shape, Value};

/// Field lookup over a dictionary being bound to a record.
///
/// Used by code generated from [`plist_record!`](crate::plist_record).
#[derive(Debug)]
pub struct RecordReader<'v> {
	dict: &'v Dictionary,
}

impl<'v> RecordReader<'v> {
	/// Check that `value` is a dictionary and, when unknown keys are denied,
	/// that every key binds to a field of `shape`.
	pub fn open(value: &'v Value, shape: &'static RecordShape, cx: &mut DecodeContext<'_>) -> Result<Self> {
		let Value::Dictionary(dict) = value else {
			return Err(cx.mismatch(&Shape::Record(shape), value));
		};

		for key in dict.keys() {
			if shape.field_for_key(key).is_none() {
				if cx.options().deny_unknown_keys {
					return Err(cx.unknown_key(key));
				}
				trace!(record = shape.name, key, "ignoring unknown key");
			}
		}
		Ok(Self { dict })
	}

	/// Convert the entry bound to `key`; a missing key yields `T::default()`.
	pub fn field<T: FromPlist + Default>(&self, key: &str, cx: &mut DecodeContext<'_>) -> Result<T> {
		match self.dict.get(key) {
			Some(item) => cx.at_key(key, |cx| T::from_plist(item, cx)),
			None => Ok(T::default()),
		}
	}
}

/// Declare a struct together with its plist field table and conversions.
///
/// Each field binds to the dictionary key of the same name, or to the string
/// literal given after `as`. The macro emits the struct, a `SHAPE` constant,
/// and [`FromPlist`](crate::plist::FromPlist) / [`ToPlist`](crate::plist::ToPlist)
/// impls. Decoding fills missing keys with `Default::default()`; encoding
/// writes fields in declaration order and skips fields that project to nothing.
///
/// ```
/// plistkit::plist_record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct BundleInfo {
///         pub version: String as "CFBundleInfoDictionaryVersion",
///         pub size: u64,
///     }
/// }
///
/// let info: BundleInfo = plistkit::plist::from_bytes(
///     b"<dict><key>size</key><integer>4096</integer></dict>",
/// ).unwrap();
/// assert_eq!(info.size, 4096);
/// assert!(info.version.is_empty());
/// ```
#[macro_export]
macro_rules! plist_record {
	(@key $field:ident $key:literal) => {
		$key
	};
	(@key $field:ident) => {
		stringify!($field)
	};
	(
		$(#[$attr:meta])*
		$vis:vis struct $name:ident {
			$(
				$(#[$fattr:meta])*
				$fvis:vis $field:ident : $ty:ty $(as $key:literal)?
			),* $(,)?
		}
	) => {
		$(#[$attr])*
		$vis struct $name {
			$(
				$(#[$fattr])*
				$fvis $field: $ty,
			)*
		}

		impl $name {
			/// Field table binding dictionary keys to fields.
			pub const SHAPE: $crate::plist::RecordShape = $crate::plist::RecordShape {
				name: stringify!($name),
				fields: &[
					$(
						$crate::plist::FieldShape {
							name: stringify!($field),
							key: $crate::plist_record!(@key $field $($key)?),
							shape: <$ty as $crate::plist::FromPlist>::shape,
						},
					)*
				],
			};
		}

		impl $crate::plist::FromPlist for $name {
			fn shape() -> $crate::plist::Shape {
				$crate::plist::Shape::Record(&Self::SHAPE)
			}

			fn from_plist(
				value: &$crate::plist::Value,
				cx: &mut $crate::plist::DecodeContext<'_>,
			) -> $crate::plist::Result<Self> {
				let record = $crate::plist::RecordReader::open(value, &Self::SHAPE, cx)?;
				Ok(Self {
					$(
						$field: record.field($crate::plist_record!(@key $field $($key)?), cx)?,
					)*
				})
			}
		}

		impl $crate::plist::ToPlist for $name {
			fn to_plist(&self) -> Option<$crate::plist::Value> {
				let mut dict = $crate::plist::Dictionary::new();
				$(
					if let Some(item) = $crate::plist::ToPlist::to_plist(&self.$field) {
						dict.insert($crate::plist_record!(@key $field $($key)?), item);
					}
				)*
				Some($crate::plist::Value::Dictionary(dict))
			}
		}
	};
}
