/// Static description of the host type a value is converted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
	/// `bool`.
	Bool,
	/// Fixed-width integer.
	Integer {
		/// Width in bits.
		bits: u8,
		/// Whether negative values are representable.
		signed: bool,
	},
	/// Floating-point number.
	Real {
		/// Width in bits (32 or 64).
		bits: u8,
	},
	/// Owned text.
	String,
	/// Byte blob.
	Data,
	/// Absolute time.
	Date,
	/// Keyed-archiver object reference.
	Uid,
	/// Homogeneous ordered sequence.
	Sequence(Box<Shape>),
	/// String-keyed map with homogeneous values.
	Mapping(Box<Shape>),
	/// Struct declared with `plist_record!`.
	Record(&'static RecordShape),
	/// Value that may be absent.
	Optional(Box<Shape>),
	/// Accepts any value unchanged.
	Dynamic,
}

impl Shape {
	/// Human-readable label used in type-mismatch errors.
	pub fn label(&self) -> String {
		match self {
			Self::Bool => "boolean".to_owned(),
			Self::Integer { bits, signed: true } => format!("i{bits}"),
			Self::Integer { bits, signed: false } => format!("u{bits}"),
			Self::Real { bits } => format!("f{bits}"),
			Self::String => "string".to_owned(),
			Self::Data => "data".to_owned(),
			Self::Date => "date".to_owned(),
			Self::Uid => "uid".to_owned(),
			Self::Sequence(item) => format!("array of {}", item.label()),
			Self::Mapping(item) => format!("dictionary of {}", item.label()),
			Self::Record(record) => format!("dictionary for {}", record.name),
			Self::Optional(item) => format!("optional {}", item.label()),
			Self::Dynamic => "any value".to_owned(),
		}
	}
}

/// Compile-time field table of a record type.
#[derive(Debug)]
pub struct RecordShape {
	/// Rust type name.
	pub name: &'static str,
	/// Fields in declaration order.
	pub fields: &'static [FieldShape],
}

impl RecordShape {
	/// Field bound to dictionary key `key`, if any.
	pub fn field_for_key(&self, key: &str) -> Option<&FieldShape> {
		self.fields.iter().find(|field| field.key == key)
	}
}

// Field shapes hold fn pointers, so equality goes by names and keys.
impl PartialEq for RecordShape {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
			&& self.fields.len() == other.fields.len()
			&& self
				.fields
				.iter()
				.zip(other.fields)
				.all(|(lhs, rhs)| lhs.name == rhs.name && lhs.key == rhs.key)
	}
}

impl Eq for RecordShape {}

/// One record field and the dictionary key it binds to.
#[derive(Debug)]
pub struct FieldShape {
	/// Rust field name.
	pub name: &'static str,
	/// Dictionary key: the alias when one is declared, else the field name.
	pub key: &'static str,
	/// Shape of the field type.
	pub shape: fn() -> Shape,
}
