//! Type-directed conversion between value trees and host types.
//!
//! Decoding walks a [`Value`] against the target's [`Shape`]: kinds must match
//! exactly, integers are range-checked, and in lax mode string sources may be
//! parsed into integers, reals, and booleans. Encoding projects a host value
//! back into a tree, where `None` means "absent" and is left out of the
//! enclosing container.

mod collections;
mod context;
mod dynamic;
mod primitives;
mod record;
mod shape;

pub use context::DecodeContext;
pub use dynamic::Dynamic;
pub use record::RecordReader;
pub use shape::{FieldShape, RecordShape, Shape};

use crate::plist::{Result, Value};

/// Host type that can be built from a value tree.
pub trait FromPlist: Sized {
	/// Shape used for mismatch labels and record field tables.
	fn shape() -> Shape;

	/// Convert `value`, reporting failures at the location tracked by `cx`.
	fn from_plist(value: &Value, cx: &mut DecodeContext<'_>) -> Result<Self>;
}

/// Host type that can be projected into a value tree.
pub trait ToPlist {
	/// Project into a value; `None` marks the value as absent.
	fn to_plist(&self) -> Option<Value>;
}
