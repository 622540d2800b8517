use std::path::PathBuf;

use plistkit::plist::{DecodeOptions, Decoder, Encoder, Format, Result};

use crate::cmd::util::read_input;

#[derive(clap::Args)]
pub struct Args {
	pub input: PathBuf,
	pub output: PathBuf,
	/// Output format: `xml` or `binary`.
	#[arg(long)]
	pub format: Format,
	/// Write XML without indentation.
	#[arg(long)]
	pub compact: bool,
	/// Decode unknown XML elements as strings.
	#[arg(long)]
	pub lax: bool,
}

/// Decode `input` in whatever format it is and write it to `output` in `format`.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		output,
		format,
		compact,
		lax,
	} = args;

	let bytes = read_input(&input)?;
	let options = if lax { DecodeOptions::lax() } else { DecodeOptions::default() };
	let (source, value) = Decoder::with_options(options).decode_value(&bytes)?;

	let mut encoded = Vec::new();
	Encoder::new(format).indent(!compact).encode_value(&mut encoded, &value)?;
	std::fs::write(&output, &encoded)?;

	println!("{} ({source}) -> {} ({format}, {} bytes)", input.display(), output.display(), encoded.len());
	Ok(())
}
