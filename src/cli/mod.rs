pub mod args;
pub mod cluster;
pub mod commands;
pub mod context;
pub mod display;
pub mod helm;
pub mod login;
pub mod version;

pub use commands::{CliArgs, Commands};
pub use context::CommandContext;
