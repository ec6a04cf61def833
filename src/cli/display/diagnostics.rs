//! Error output

use colored::Colorize;

/// Prefix of every diagnostic the plugin prints itself, as opposed to the
/// output of the wrapped tool.
pub const ERROR_PREFIX: &str = "*** ERROR:";

/// Format an error message for stderr
pub fn error_line(message: &str) -> String {
    format!("{} {}", ERROR_PREFIX.red().bold(), message)
}
