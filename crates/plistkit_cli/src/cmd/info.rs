use std::path::PathBuf;

use plistkit::plist::{BinaryTrailer, Decoder, Format, Result, sniff};

use crate::cmd::util::{emit_json, read_input};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print the detected format, root kind, and (for binary input) the trailer.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let bytes = read_input(&path)?;
	let format = sniff(&bytes)?;
	let trailer = match format {
		Format::Binary => Some(BinaryTrailer::parse(&bytes)?),
		Format::Xml => None,
	};
	let (_, value) = Decoder::new().decode_value(&bytes)?;

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			format: format.as_str(),
			size: bytes.len(),
			root_kind: value.kind(),
			trailer: trailer.map(TrailerJson::from),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("format: {format}");
	println!("size: {}", bytes.len());
	println!("root_kind: {}", value.kind());
	if let Some(trailer) = trailer {
		println!("sort_version: {}", trailer.sort_version);
		println!("offset_int_size: {}", trailer.offset_int_size);
		println!("object_ref_size: {}", trailer.object_ref_size);
		println!("num_objects: {}", trailer.num_objects);
		println!("top_object: {}", trailer.top_object);
		println!("offset_table_offset: {}", trailer.offset_table_offset);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct TrailerJson {
	sort_version: u8,
	offset_int_size: u8,
	object_ref_size: u8,
	num_objects: u64,
	top_object: u64,
	offset_table_offset: u64,
}

impl From<BinaryTrailer> for TrailerJson {
	fn from(trailer: BinaryTrailer) -> Self {
		Self {
			sort_version: trailer.sort_version,
			offset_int_size: trailer.offset_int_size,
			object_ref_size: trailer.object_ref_size,
			num_objects: trailer.num_objects,
			top_object: trailer.top_object,
			offset_table_offset: trailer.offset_table_offset,
		}
	}
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	format: &'static str,
	size: usize,
	root_kind: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	trailer: Option<TrailerJson>,
}
