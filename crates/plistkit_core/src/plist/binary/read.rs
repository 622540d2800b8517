use tracing::{debug, trace};

use crate::plist::binary::BinaryTrailer;
use crate::plist::bytes::Cursor;
use crate::plist::sniff::BPLIST_MAGIC;
use crate::plist::{Date, Dictionary, Integer, PlistError, Result, Uid, Value};

/// Runtime limits for binary decoding.
#[derive(Debug, Clone)]
pub struct BinaryReadOptions {
	/// Maximum nesting depth of arrays and dictionaries.
	pub max_depth: u32,
	/// Budget of values built while decoding, counting every copy of a shared
	/// object. Raised to the object count for documents with more objects.
	pub max_nodes: usize,
}

impl Default for BinaryReadOptions {
	fn default() -> Self {
		Self {
			max_depth: 512,
			max_nodes: 1 << 20,
		}
	}
}

/// Decode a complete `bplist00` document into a value tree.
pub fn read_binary(bytes: &[u8], opt: &BinaryReadOptions) -> Result<Value> {
	if !bytes.starts_with(BPLIST_MAGIC) {
		return Err(PlistError::bplist("missing bplist00 magic"));
	}

	let trailer = BinaryTrailer::parse(bytes)?;
	debug!(
		num_objects = trailer.num_objects,
		top_object = trailer.top_object,
		offset_int_size = trailer.offset_int_size,
		object_ref_size = trailer.object_ref_size,
		"parsed bplist trailer"
	);

	let offsets = read_offset_table(bytes, &trailer)?;
	let count = offsets.len();
	let mut reader = ObjectReader {
		bytes,
		ref_size: usize::from(trailer.object_ref_size),
		offsets,
		resolved: vec![None; count],
		visiting: vec![false; count],
		max_depth: opt.max_depth,
		budget: NodeBudget {
			produced: 0,
			limit: opt.max_nodes.max(count),
		},
	};
	reader.resolve(trailer.top_object, 0)
}

fn read_offset_table(bytes: &[u8], trailer: &BinaryTrailer) -> Result<Vec<usize>> {
	let table_offset = usize::try_from(trailer.offset_table_offset).map_err(|_| PlistError::bplist("offset table offset overflows usize"))?;
	let count = usize::try_from(trailer.num_objects).map_err(|_| PlistError::bplist("object count overflows usize"))?;
	let width = usize::from(trailer.offset_int_size);

	let mut cursor = Cursor::at(bytes, table_offset)?;
	let mut offsets = Vec::with_capacity(count);
	for idx in 0..count {
		let offset = cursor.read_uint_be(width)?;
		if offset < BPLIST_MAGIC.len() as u64 || offset >= trailer.offset_table_offset {
			return Err(PlistError::bplist(format!("object {idx} offset {offset} outside object table")));
		}
		offsets.push(offset as usize);
	}
	Ok(offsets)
}

struct ObjectReader<'a> {
	bytes: &'a [u8],
	ref_size: usize,
	offsets: Vec<usize>,
	/// Decoded objects and the number of values each one expands to.
	resolved: Vec<Option<(Value, usize)>>,
	visiting: Vec<bool>,
	max_depth: u32,
	budget: NodeBudget,
}

/// Running count of values built, including every copy of a shared object.
struct NodeBudget {
	produced: usize,
	limit: usize,
}

impl NodeBudget {
	fn charge(&mut self, count: usize) -> Result<()> {
		self.produced = self
			.produced
			.checked_add(count)
			.filter(|total| *total <= self.limit)
			.ok_or_else(|| PlistError::bplist(format!("shared references expand past {} values", self.limit)))?;
		Ok(())
	}
}

impl ObjectReader<'_> {
	fn resolve(&mut self, index: u64, depth: u32) -> Result<Value> {
		let idx = usize::try_from(index)
			.ok()
			.filter(|idx| *idx < self.offsets.len())
			.ok_or_else(|| PlistError::bplist(format!("object reference {index} out of range for {} objects", self.offsets.len())))?;

		if let Some((value, size)) = &self.resolved[idx] {
			self.budget.charge(*size)?;
			return Ok(value.clone());
		}
		if self.visiting[idx] {
			return Err(PlistError::bplist(format!("reference cycle through object {idx}")));
		}
		if depth >= self.max_depth {
			return Err(PlistError::bplist(format!("nesting exceeds max depth {}", self.max_depth)));
		}

		let before = self.budget.produced;
		self.budget.charge(1)?;
		self.visiting[idx] = true;
		let value = self.read_object(idx, depth);
		self.visiting[idx] = false;

		let value = value?;
		self.resolved[idx] = Some((value.clone(), self.budget.produced - before));
		Ok(value)
	}

	fn read_object(&mut self, idx: usize, depth: u32) -> Result<Value> {
		let offset = self.offsets[idx];
		let mut cursor = Cursor::at(self.bytes, offset)?;
		let marker = cursor.read_u8()?;
		let info = marker & 0x0F;
		trace!(idx, offset, marker, "reading bplist object");

		match marker >> 4 {
			0x0 => match info {
				0x8 => Ok(Value::Boolean(false)),
				0x9 => Ok(Value::Boolean(true)),
				0x0 => Err(PlistError::bplist(format!("null object {idx} has no value representation"))),
				0xF => Err(PlistError::bplist(format!("fill object {idx} has no value representation"))),
				_ => Err(unknown_marker(marker, offset)),
			},
			0x1 => read_integer(&mut cursor, info).map(Value::Integer),
			0x2 => match info {
				0x2 => Ok(Value::Real(f64::from(cursor.read_f32_be()?))),
				0x3 => Ok(Value::Real(cursor.read_f64_be()?)),
				_ => Err(PlistError::bplist(format!("real object {idx} has unsupported width {}", 1_u32 << info))),
			},
			0x3 if info == 0x3 => Ok(Value::Date(Date(cursor.read_f64_be()?))),
			0x4 => {
				let len = read_count(&mut cursor, info)?;
				Ok(Value::Data(cursor.read_exact(len)?.to_vec()))
			}
			0x5 => {
				let len = read_count(&mut cursor, info)?;
				let raw = cursor.read_exact(len)?;
				let text = std::str::from_utf8(raw).map_err(|_| PlistError::bplist(format!("ascii string object {idx} is not valid text")))?;
				Ok(Value::String(text.to_owned()))
			}
			0x6 => {
				let units = read_count(&mut cursor, info)?;
				let size = units.checked_mul(2).ok_or_else(|| PlistError::bplist("utf-16 string length overflows"))?;
				let raw = cursor.read_exact(size)?;
				let code_units: Vec<u16> = raw.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])).collect();
				let text = String::from_utf16(&code_units).map_err(|_| PlistError::bplist(format!("utf-16 string object {idx} is not valid text")))?;
				Ok(Value::String(text))
			}
			0x8 => {
				let width = usize::from(info) + 1;
				if width > 8 {
					return Err(PlistError::bplist(format!("uid object {idx} has unsupported width {width}")));
				}
				Ok(Value::Uid(Uid(cursor.read_uint_be(width)?)))
			}
			0xA | 0xB | 0xC => {
				let refs = self.read_refs(&mut cursor, info)?;
				let mut items = Vec::with_capacity(refs.len());
				for child in refs {
					items.push(self.resolve(child, depth + 1)?);
				}
				Ok(Value::Array(items))
			}
			0xD => {
				let count = read_count(&mut cursor, info)?;
				let keys = self.read_ref_list(&mut cursor, count)?;
				let values = self.read_ref_list(&mut cursor, count)?;
				let mut dict = Dictionary::with_capacity(count);
				for (key_ref, value_ref) in keys.into_iter().zip(values) {
					let key = match self.resolve(key_ref, depth + 1)? {
						Value::String(key) => key,
						other => {
							return Err(PlistError::bplist(format!(
								"dictionary object {idx} has a {} key; keys must be strings",
								other.kind()
							)));
						}
					};
					let value = self.resolve(value_ref, depth + 1)?;
					dict.insert(key, value);
				}
				Ok(Value::Dictionary(dict))
			}
			_ => Err(unknown_marker(marker, offset)),
		}
	}

	fn read_refs(&self, cursor: &mut Cursor<'_>, info: u8) -> Result<Vec<u64>> {
		let count = read_count(cursor, info)?;
		self.read_ref_list(cursor, count)
	}

	fn read_ref_list(&self, cursor: &mut Cursor<'_>, count: usize) -> Result<Vec<u64>> {
		let size = count
			.checked_mul(self.ref_size)
			.ok_or_else(|| PlistError::bplist(format!("reference list of {count} entries overflows")))?;
		let raw = cursor.read_exact(size)?;
		Ok(raw
			.chunks_exact(self.ref_size)
			.map(|chunk| chunk.iter().fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte)))
			.collect())
	}
}

fn read_integer(cursor: &mut Cursor<'_>, info: u8) -> Result<Integer> {
	match info {
		0..=2 => Ok(Integer::from_u64(cursor.read_uint_be(1_usize << info)?)),
		3 => Ok(Integer::from_i64(cursor.read_u64_be()? as i64)),
		4 => {
			let wide = cursor.read_i128_be()?;
			if let Ok(value) = u64::try_from(wide) {
				Ok(Integer::from_u64(value))
			} else if let Ok(value) = i64::try_from(wide) {
				Ok(Integer::from_i64(value))
			} else {
				Err(PlistError::bplist(format!("128-bit integer {wide} does not fit 64 bits")))
			}
		}
		_ => Err(PlistError::bplist(format!("integer width {} unsupported", 1_u64 << info))),
	}
}

fn read_count(cursor: &mut Cursor<'_>, info: u8) -> Result<usize> {
	if info != 0x0F {
		return Ok(usize::from(info));
	}

	let marker = cursor.read_u8()?;
	if marker >> 4 != 0x1 {
		return Err(PlistError::bplist(format!("length marker 0x{marker:02x} is not an integer")));
	}
	let count = read_integer(cursor, marker & 0x0F)?;
	count
		.as_u64()
		.and_then(|count| usize::try_from(count).ok())
		.ok_or_else(|| PlistError::bplist(format!("invalid object length {count}")))
}

fn unknown_marker(marker: u8, offset: usize) -> PlistError {
	PlistError::bplist(format!("unknown object marker 0x{marker:02x} at offset {offset}"))
}
