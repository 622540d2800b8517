use std::collections::HashMap;

use tracing::debug;

use crate::plist::binary::BinaryTrailer;
use crate::plist::sniff::BPLIST_MAGIC;
use crate::plist::{Date, Integer, Uid, Value};

/// Encode a value tree as a complete `bplist00` document.
///
/// Objects are laid out in pre-order (a container precedes its keys, then its
/// values), so the root is always object 0. Equal strings and equal data blobs
/// share one object; every other value gets its own slot.
pub fn write_binary(value: &Value) -> Vec<u8> {
	let mut table = ObjectTable::default();
	let top = table.flatten(value);

	let num_objects = table.slots.len() as u64;
	let ref_size = min_width(num_objects);

	let mut out = Vec::with_capacity(64);
	out.extend_from_slice(BPLIST_MAGIC);
	let mut offsets = Vec::with_capacity(table.slots.len());
	for slot in &table.slots {
		offsets.push(out.len() as u64);
		write_slot(&mut out, slot, ref_size);
	}

	let offset_table_offset = out.len() as u64;
	let offset_int_size = min_width(offset_table_offset);
	for offset in offsets {
		write_uint_be(&mut out, offset, offset_int_size);
	}

	let trailer = BinaryTrailer {
		sort_version: 0,
		offset_int_size: offset_int_size as u8,
		object_ref_size: ref_size as u8,
		num_objects,
		top_object: top,
		offset_table_offset,
	};
	out.extend_from_slice(&trailer.to_bytes());
	debug!(num_objects, ref_size, offset_int_size, bytes = out.len(), "encoded bplist");
	out
}

enum Slot<'a> {
	Boolean(bool),
	Integer(Integer),
	Real(f64),
	Date(Date),
	Uid(Uid),
	String(&'a str),
	Data(&'a [u8]),
	Array(Vec<u64>),
	Dictionary { keys: Vec<u64>, values: Vec<u64> },
}

#[derive(Default)]
struct ObjectTable<'a> {
	slots: Vec<Slot<'a>>,
	strings: HashMap<&'a str, u64>,
	blobs: HashMap<&'a [u8], u64>,
}

impl<'a> ObjectTable<'a> {
	fn flatten(&mut self, value: &'a Value) -> u64 {
		match value {
			Value::Boolean(flag) => self.push(Slot::Boolean(*flag)),
			Value::Integer(int) => self.push(Slot::Integer(*int)),
			Value::Real(real) => self.push(Slot::Real(*real)),
			Value::Date(date) => self.push(Slot::Date(*date)),
			Value::Uid(uid) => self.push(Slot::Uid(*uid)),
			Value::String(text) => self.intern_string(text),
			Value::Data(bytes) => {
				if let Some(idx) = self.blobs.get(bytes.as_slice()) {
					return *idx;
				}
				let idx = self.push(Slot::Data(bytes.as_slice()));
				self.blobs.insert(bytes.as_slice(), idx);
				idx
			}
			Value::Array(items) => {
				let idx = self.push(Slot::Array(Vec::new()));
				let refs = items.iter().map(|item| self.flatten(item)).collect();
				self.slots[idx as usize] = Slot::Array(refs);
				idx
			}
			Value::Dictionary(dict) => {
				let idx = self.push(Slot::Dictionary {
					keys: Vec::new(),
					values: Vec::new(),
				});
				let keys = dict.keys().map(|key| self.intern_string(key)).collect();
				let values = dict.values().map(|item| self.flatten(item)).collect();
				self.slots[idx as usize] = Slot::Dictionary { keys, values };
				idx
			}
		}
	}

	fn intern_string(&mut self, text: &'a str) -> u64 {
		if let Some(idx) = self.strings.get(text) {
			return *idx;
		}
		let idx = self.push(Slot::String(text));
		self.strings.insert(text, idx);
		idx
	}

	fn push(&mut self, slot: Slot<'a>) -> u64 {
		self.slots.push(slot);
		(self.slots.len() - 1) as u64
	}
}

fn write_slot(out: &mut Vec<u8>, slot: &Slot<'_>, ref_size: usize) {
	match slot {
		Slot::Boolean(false) => out.push(0x08),
		Slot::Boolean(true) => out.push(0x09),
		Slot::Integer(int) => write_integer(out, *int),
		Slot::Real(real) => {
			out.push(0x23);
			out.extend_from_slice(&real.to_be_bytes());
		}
		Slot::Date(date) => {
			out.push(0x33);
			out.extend_from_slice(&date.seconds().to_be_bytes());
		}
		Slot::Uid(uid) => {
			let width = min_width(uid.get());
			out.push(0x80 | (width as u8 - 1));
			write_uint_be(out, uid.get(), width);
		}
		Slot::String(text) if text.is_ascii() => {
			write_marker(out, 0x5, text.len());
			out.extend_from_slice(text.as_bytes());
		}
		Slot::String(text) => {
			let units: Vec<u16> = text.encode_utf16().collect();
			write_marker(out, 0x6, units.len());
			for unit in units {
				out.extend_from_slice(&unit.to_be_bytes());
			}
		}
		Slot::Data(bytes) => {
			write_marker(out, 0x4, bytes.len());
			out.extend_from_slice(bytes);
		}
		Slot::Array(refs) => {
			write_marker(out, 0xA, refs.len());
			for child in refs {
				write_uint_be(out, *child, ref_size);
			}
		}
		Slot::Dictionary { keys, values } => {
			write_marker(out, 0xD, keys.len());
			for child in keys.iter().chain(values) {
				write_uint_be(out, *child, ref_size);
			}
		}
	}
}

fn write_marker(out: &mut Vec<u8>, kind: u8, count: usize) {
	if count < 0x0F {
		out.push((kind << 4) | count as u8);
	} else {
		out.push((kind << 4) | 0x0F);
		write_integer(out, Integer::from_u64(count as u64));
	}
}

fn write_integer(out: &mut Vec<u8>, int: Integer) {
	match int.as_i64() {
		Some(value) if value < 0 => {
			out.push(0x13);
			out.extend_from_slice(&value.to_be_bytes());
		}
		Some(value) => {
			let value = value as u64;
			let width = min_width(value);
			out.push(0x10 | width.trailing_zeros() as u8);
			write_uint_be(out, value, width);
		}
		None => {
			out.push(0x14);
			out.extend_from_slice(&int.as_i128().to_be_bytes());
		}
	}
}

fn write_uint_be(out: &mut Vec<u8>, value: u64, width: usize) {
	out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
}

/// Smallest of 1, 2, 4, or 8 bytes able to hold `value`.
fn min_width(value: u64) -> usize {
	if value <= 0xFF {
		1
	} else if value <= 0xFFFF {
		2
	} else if value <= 0xFFFF_FFFF {
		4
	} else {
		8
	}
}
