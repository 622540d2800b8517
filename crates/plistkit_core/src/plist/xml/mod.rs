//! Plist 1.0 XML codec built on `quick-xml` events.

mod read;
mod write;

pub use read::{XmlReadOptions, read_xml};
pub use write::write_xml;

/// Dictionary key Apple's keyed archiver uses to spell a UID in XML.
pub(crate) const UID_KEY: &str = "CF$UID";
