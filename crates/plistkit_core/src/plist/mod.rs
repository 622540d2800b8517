mod binary;
mod bytes;
mod codec;
mod convert;
mod error;
mod scalar;
mod sniff;
mod value;
mod xml;

/// `bplist00` codec entry points and trailer type.
pub use binary::{BinaryReadOptions, BinaryTrailer, read_binary, write_binary};
/// Top-level decode and encode API.
pub use codec::{DecodeOptions, Decoder, Encoder, from_bytes, from_reader, to_bytes, to_writer};
/// Typed conversion traits, shapes, and the dynamic target.
pub use convert::{DecodeContext, Dynamic, FieldShape, FromPlist, RecordReader, RecordShape, Shape, ToPlist};
/// Error and result aliases.
pub use error::{PlistError, Result};
/// Scalar text grammar shared by the XML codec and lax coercion.
pub use scalar::{format_date, format_real, parse_bool, parse_date, parse_integer, parse_real};
/// Wire format detection.
pub use sniff::{BPLIST_MAGIC, Format, sniff};
/// Value tree types.
pub use value::{Data, Date, Dictionary, Integer, PLIST_EPOCH_UNIX_SECONDS, Uid, Value};
/// XML codec entry points.
pub use xml::{XmlReadOptions, read_xml, write_xml};
