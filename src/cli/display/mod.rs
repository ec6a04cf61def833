//! Display module for formatted CLI output

pub mod diagnostics;
pub mod table;

pub use diagnostics::error_line;
pub use table::{TableRenderer, VersionInfo};
