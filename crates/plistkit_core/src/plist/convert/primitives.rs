use chrono::{DateTime, Utc};

use crate::plist::scalar::{parse_bool, parse_integer, parse_real};
use crate::plist::{Data, Date, DecodeContext, FromPlist, Integer, Result, Shape, ToPlist, Uid, Value};

/// Integer payload of `value`, parsing string text in lax mode.
fn integer_source(value: &Value, cx: &DecodeContext<'_>, shape: &Shape) -> Result<Integer> {
	match value {
		Value::Integer(int) => Ok(*int),
		Value::String(text) if cx.is_lax() => parse_integer(text).ok_or_else(|| cx.mismatch(shape, value)),
		_ => Err(cx.mismatch(shape, value)),
	}
}

fn real_source(value: &Value, cx: &DecodeContext<'_>, shape: &Shape) -> Result<f64> {
	match value {
		Value::Real(real) => Ok(*real),
		Value::String(text) if cx.is_lax() => parse_real(text).ok_or_else(|| cx.mismatch(shape, value)),
		_ => Err(cx.mismatch(shape, value)),
	}
}

macro_rules! signed_integers {
	($($ty:ty),* $(,)?) => {$(
		impl FromPlist for $ty {
			fn shape() -> Shape {
				Shape::Integer { bits: <$ty>::BITS as u8, signed: true }
			}

			fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
				let int = integer_source(value, cx, &Self::shape())?;
				<$ty>::try_from(int.as_i128()).map_err(|_| cx.overflow(int, stringify!($ty)))
			}
		}

		impl ToPlist for $ty {
			fn to_plist(&self) -> Option<Value> {
				Some(Value::Integer(Integer::from_i64(*self as i64)))
			}
		}
	)*};
}

macro_rules! unsigned_integers {
	($($ty:ty),* $(,)?) => {$(
		impl FromPlist for $ty {
			fn shape() -> Shape {
				Shape::Integer { bits: <$ty>::BITS as u8, signed: false }
			}

			fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
				let int = integer_source(value, cx, &Self::shape())?;
				<$ty>::try_from(int.as_i128()).map_err(|_| cx.overflow(int, stringify!($ty)))
			}
		}

		impl ToPlist for $ty {
			fn to_plist(&self) -> Option<Value> {
				Some(Value::Integer(Integer::from_u64(*self as u64)))
			}
		}
	)*};
}

signed_integers!(i8, i16, i32, i64, isize);
unsigned_integers!(u8, u16, u32, u64, usize);

impl FromPlist for f64 {
	fn shape() -> Shape {
		Shape::Real { bits: 64 }
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		real_source(value, cx, &Self::shape())
	}
}

impl ToPlist for f64 {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::Real(*self))
	}
}

impl FromPlist for f32 {
	fn shape() -> Shape {
		Shape::Real { bits: 32 }
	}

	// Narrowing is unchecked; out-of-range reals become infinities.
	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		real_source(value, cx, &Self::shape()).map(|real| real as f32)
	}
}

impl ToPlist for f32 {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::Real(f64::from(*self)))
	}
}

impl FromPlist for bool {
	fn shape() -> Shape {
		Shape::Bool
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		match value {
			Value::Boolean(flag) => Ok(*flag),
			Value::String(text) if cx.is_lax() => parse_bool(text).ok_or_else(|| cx.mismatch(&Self::shape(), value)),
			_ => Err(cx.mismatch(&Self::shape(), value)),
		}
	}
}

impl ToPlist for bool {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::Boolean(*self))
	}
}

impl FromPlist for String {
	fn shape() -> Shape {
		Shape::String
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		match value {
			Value::String(text) => Ok(text.clone()),
			_ => Err(cx.mismatch(&Self::shape(), value)),
		}
	}
}

impl ToPlist for String {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::String(self.clone()))
	}
}

impl ToPlist for str {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::String(self.to_owned()))
	}
}

impl FromPlist for Data {
	fn shape() -> Shape {
		Shape::Data
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		match value {
			Value::Data(bytes) => Ok(Data(bytes.clone())),
			_ => Err(cx.mismatch(&Self::shape(), value)),
		}
	}
}

impl ToPlist for Data {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::Data(self.0.clone()))
	}
}

impl FromPlist for Date {
	fn shape() -> Shape {
		Shape::Date
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		match value {
			Value::Date(date) => Ok(*date),
			_ => Err(cx.mismatch(&Self::shape(), value)),
		}
	}
}

impl ToPlist for Date {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::Date(*self))
	}
}

impl FromPlist for DateTime<Utc> {
	fn shape() -> Shape {
		Shape::Date
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		match value {
			Value::Date(date) => date.to_datetime().ok_or_else(|| cx.overflow(date.seconds(), "DateTime<Utc>")),
			_ => Err(cx.mismatch(&Self::shape(), value)),
		}
	}
}

impl ToPlist for DateTime<Utc> {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::Date(Date::from_datetime(*self)))
	}
}

impl FromPlist for Uid {
	fn shape() -> Shape {
		Shape::Uid
	}

	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self> {
		match value {
			Value::Uid(uid) => Ok(*uid),
			_ => Err(cx.mismatch(&Self::shape(), value)),
		}
	}
}

impl ToPlist for Uid {
	fn to_plist(&self) -> Option<Value> {
		Some(Value::Uid(*self))
	}
}

impl FromPlist for Value {
	fn shape() -> Shape {
		Shape::Dynamic
	}

	fn from_plist(value: &Value, _cx: &mut DecodeContext<'_>) -> Result<Self> {
		Ok(value.clone())
	}
}

impl ToPlist for Value {
	fn to_plist(&self) -> Option<Value> {
		Some(self.clone())
	}
}
