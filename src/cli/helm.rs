//! `neon helm`: runs the Helm binary the product ships with

use std::ffi::OsString;

use clap::Args;

use super::context::CommandContext;
use crate::domain::Tool;
use crate::infrastructure::LaunchMode;

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct HelmCommand {
    /// Arguments passed to Helm as-is
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<OsString>,
}

impl HelmCommand {
    /// Builds the command straight from raw arguments, without any flag
    /// parsing, so `--help`, `--` and friends reach Helm untouched.
    pub fn from_raw<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        Self {
            args: args.into_iter().collect(),
        }
    }

    pub async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<i32> {
        Ok(ctx
            .run(Tool::Helm, self.args.clone(), LaunchMode::Replace)
            .await?)
    }
}
