use std::fmt::Display;

use crate::plist::{DecodeOptions, PlistError, Result, Shape, Value};

#[derive(Debug, Clone)]
enum Segment {
	Key(String),
	Index(usize),
}

/// Conversion state threaded through [`FromPlist`](crate::plist::FromPlist) calls.
///
/// Tracks the decode options and the location of the value being converted,
/// rendered in errors as `root.items[2].name`.
#[derive(Debug)]
pub struct DecodeContext<'o> {
	options: &'o DecodeOptions,
	path: Vec<Segment>,
}

impl<'o> DecodeContext<'o> {
	/// Start at the root of a tree.
	pub fn new(options: &'o DecodeOptions) -> Self {
		Self { options, path: Vec::new() }
	}

	/// Options in effect for this conversion.
	pub fn options(&self) -> &DecodeOptions {
		self.options
	}

	/// Whether string sources may be coerced into scalar targets.
	pub fn is_lax(&self) -> bool {
		self.options.lax
	}

	/// Render the current location.
	pub fn path(&self) -> String {
		let mut out = String::from("root");
		for segment in &self.path {
			match segment {
				Segment::Key(key) => {
					out.push('.');
					out.push_str(key);
				}
				Segment::Index(idx) => {
					out.push('[');
					out.push_str(&idx.to_string());
					out.push(']');
				}
			}
		}
		out
	}

	/// Run `f` with the path extended by a dictionary key.
	pub fn at_key<T>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
		self.path.push(Segment::Key(key.to_owned()));
		let out = f(self);
		self.path.pop();
		out
	}

	/// Run `f` with the path extended by an array index.
	pub fn at_index<T>(&mut self, idx: usize, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
		self.path.push(Segment::Index(idx));
		let out = f(self);
		self.path.pop();
		out
	}

	/// Error for a value whose kind does not fit `expected`.
	pub fn mismatch(&self, expected: &Shape, actual: &Value) -> PlistError {
		PlistError::TypeMismatch {
			path: self.path(),
			expected: expected.label(),
			actual: actual.kind(),
		}
	}

	/// Error for a number that does not fit `target`.
	pub fn overflow(&self, value: impl Display, target: &'static str) -> PlistError {
		PlistError::Overflow {
			path: self.path(),
			value: value.to_string(),
			target,
		}
	}

	/// Error for a dictionary key with no matching record field.
	pub fn unknown_key(&self, key: &str) -> PlistError {
		PlistError::KeyBinding {
			path: self.path(),
			key: key.to_owned(),
		}
	}
}
