use crate::plist::{PlistError, Result};

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at `pos`, failing when `pos` is past the end.
	pub fn at(bytes: &'a [u8], pos: usize) -> Result<Self> {
		if pos > bytes.len() {
			return Err(PlistError::bplist(format!("offset {pos} past end of {} bytes", bytes.len())));
		}
		Ok(Self { bytes, pos })
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(PlistError::bplist(format!(
				"unexpected eof at offset {}, need {n} bytes, remaining {}",
				self.pos,
				self.remaining()
			)));
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a big-endian unsigned integer of `width` bytes (1..=8).
	pub fn read_uint_be(&mut self, width: usize) -> Result<u64> {
		if !(1..=8).contains(&width) {
			return Err(PlistError::bplist(format!("unsupported integer width {width}")));
		}
		let raw = self.read_exact(width)?;
		Ok(raw.iter().fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte)))
	}

	/// Read a big-endian `u64`.
	pub fn read_u64_be(&mut self) -> Result<u64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(u64::from_be_bytes(buf))
	}

	/// Read a big-endian `i128`.
	pub fn read_i128_be(&mut self) -> Result<i128> {
		let raw = self.read_exact(16)?;
		let mut buf = [0_u8; 16];
		buf.copy_from_slice(raw);
		Ok(i128::from_be_bytes(buf))
	}

	/// Read a big-endian IEEE754 `f32`.
	pub fn read_f32_be(&mut self) -> Result<f32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(f32::from_be_bytes(buf))
	}

	/// Read a big-endian IEEE754 `f64`.
	pub fn read_f64_be(&mut self) -> Result<f64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(f64::from_be_bytes(buf))
	}
}
