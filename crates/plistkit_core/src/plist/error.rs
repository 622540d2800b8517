use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, PlistError>;

/// Errors produced while sniffing, decoding, converting, and encoding property lists.
#[derive(Debug, Error)]
pub enum PlistError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Stream prefix matched neither the binary magic nor an XML document.
	#[error("unrecognized property list format (prefix={prefix:?})")]
	UnknownFormat {
		/// First up-to-8 bytes of the stream.
		prefix: Vec<u8>,
	},
	/// Structural violation in a `bplist00` container.
	#[error("malformed bplist: {reason}")]
	MalformedBplist {
		/// Human-readable description of the violation.
		reason: String,
	},
	/// Structural or lexical violation in an XML property list.
	#[error("malformed xml plist: {reason}")]
	MalformedXml {
		/// Human-readable description of the violation.
		reason: String,
	},
	/// Value kind does not match the target shape and no coercion applies.
	#[error("type mismatch at {path}: expected {expected}, got {actual}")]
	TypeMismatch {
		/// Location of the offending value inside the tree.
		path: String,
		/// Label of the shape being populated.
		expected: String,
		/// Kind label of the value found.
		actual: &'static str,
	},
	/// Numeric value or date does not fit the target type or wire form.
	#[error("value {value} at {path} overflows {target}")]
	Overflow {
		/// Location of the offending value inside the tree.
		path: String,
		/// Rendered source value.
		value: String,
		/// Label of the target type.
		target: &'static str,
	},
	/// Dictionary key has no matching record field while unknown keys are denied.
	#[error("unknown key {key:?} at {path}")]
	KeyBinding {
		/// Location of the dictionary inside the tree.
		path: String,
		/// Offending key.
		key: String,
	},
	/// Encoded value projected to nothing (for example a top-level `None`).
	#[error("no root value to encode")]
	NoRootValue,
}

impl PlistError {
	pub(crate) fn bplist(reason: impl Into<String>) -> Self {
		Self::MalformedBplist { reason: reason.into() }
	}

	pub(crate) fn xml(reason: impl Into<String>) -> Self {
		Self::MalformedXml { reason: reason.into() }
	}
}
