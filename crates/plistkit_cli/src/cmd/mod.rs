/// Format conversion command.
pub mod convert;
/// Value tree printing command.
pub mod dump;
/// Container information command.
pub mod info;

mod util;
