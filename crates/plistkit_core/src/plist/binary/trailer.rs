use crate::plist::bytes::Cursor;
use crate::plist::sniff::BPLIST_MAGIC;
use crate::plist::{PlistError, Result};

/// Fixed-size footer of a `bplist00` container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryTrailer {
	/// Sort version byte (always zero when written).
	pub sort_version: u8,
	/// Width in bytes of each offset-table entry.
	pub offset_int_size: u8,
	/// Width in bytes of each object reference.
	pub object_ref_size: u8,
	/// Number of objects in the object table.
	pub num_objects: u64,
	/// Index of the root object.
	pub top_object: u64,
	/// Byte offset of the offset table.
	pub offset_table_offset: u64,
}

impl BinaryTrailer {
	/// Exact trailer size in bytes.
	pub const SIZE: usize = 32;

	/// Parse and validate the trailer at the end of `bytes`.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		if bytes.len() < BPLIST_MAGIC.len() + Self::SIZE {
			return Err(PlistError::bplist(format!("{} bytes is too short for a trailer", bytes.len())));
		}

		let mut cursor = Cursor::at(bytes, bytes.len() - Self::SIZE)?;
		let _unused = cursor.read_exact(5)?;
		let trailer = Self {
			sort_version: cursor.read_u8()?,
			offset_int_size: cursor.read_u8()?,
			object_ref_size: cursor.read_u8()?,
			num_objects: cursor.read_u64_be()?,
			top_object: cursor.read_u64_be()?,
			offset_table_offset: cursor.read_u64_be()?,
		};
		trailer.validate(bytes.len())?;
		Ok(trailer)
	}

	/// Serialize the trailer to its 32-byte wire form.
	pub fn to_bytes(&self) -> [u8; Self::SIZE] {
		let mut out = [0_u8; Self::SIZE];
		out[5] = self.sort_version;
		out[6] = self.offset_int_size;
		out[7] = self.object_ref_size;
		out[8..16].copy_from_slice(&self.num_objects.to_be_bytes());
		out[16..24].copy_from_slice(&self.top_object.to_be_bytes());
		out[24..32].copy_from_slice(&self.offset_table_offset.to_be_bytes());
		out
	}

	fn validate(&self, len: usize) -> Result<()> {
		if !(1..=8).contains(&self.offset_int_size) {
			return Err(PlistError::bplist(format!("invalid offset int size {}", self.offset_int_size)));
		}
		if !(1..=8).contains(&self.object_ref_size) {
			return Err(PlistError::bplist(format!("invalid object ref size {}", self.object_ref_size)));
		}
		if self.num_objects == 0 {
			return Err(PlistError::bplist("object table is empty"));
		}
		if self.top_object >= self.num_objects {
			return Err(PlistError::bplist(format!(
				"top object {} out of range for {} objects",
				self.top_object, self.num_objects
			)));
		}

		let table_end = self
			.num_objects
			.checked_mul(u64::from(self.offset_int_size))
			.and_then(|size| size.checked_add(self.offset_table_offset));
		let limit = (len - Self::SIZE) as u64;
		match table_end {
			Some(end) if self.offset_table_offset >= BPLIST_MAGIC.len() as u64 && end <= limit => Ok(()),
			_ => Err(PlistError::bplist(format!(
				"offset table at {} with {} entries does not fit before the trailer",
				self.offset_table_offset, self.num_objects
			))),
		}
	}
}
