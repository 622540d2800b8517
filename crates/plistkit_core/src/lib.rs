//! Public library API for reading and writing Apple property lists.

/// Value model, binary and XML codecs, format sniffing, and typed conversion.
pub mod plist;
