//! `bplist00` container codec.
//!
//! The container is read end-first: the 32-byte trailer locates the offset
//! table, the offset table locates each object, and objects refer to each
//! other by index. Reference resolution is index-based with an explicit
//! visiting set, so malformed tables with cycles fail instead of recursing
//! forever.

mod read;
mod trailer;
mod write;

pub use read::{BinaryReadOptions, read_binary};
pub use trailer::BinaryTrailer;
pub use write::write_binary;

#[cfg(test)]
mod tests;
