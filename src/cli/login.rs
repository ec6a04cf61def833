//! `neon login` and `neon logout`

use clap::{Args, Subcommand};

use super::args::NeonCliArgs;
use super::context::CommandContext;
use crate::infrastructure::LaunchMode;
use crate::shared::Result;

#[derive(Args, Debug, Clone, Default)]
#[command(args_conflicts_with_subcommands = true)]
pub struct LoginCommand {
    #[command(subcommand)]
    pub command: Option<LoginSubcommand>,

    /// Context to log into; prompts for SSO login when omitted
    #[arg(value_name = "CONTEXTNAME")]
    pub context_name: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LoginSubcommand {
    /// Removes the current NEONKUBE context or a context by name
    Delete(LoginDeleteCommand),

    /// Exports the current context or a context by name to STDOUT or a file
    Export(LoginExportCommand),

    /// Imports a NEONKUBE cluster context
    Import(LoginImportCommand),

    /// Lists the NEONKUBE contexts
    #[command(alias = "ls")]
    List(LoginListCommand),
}

impl LoginCommand {
    /// Bare `login` may run an interactive browser SSO flow, so neon-cli takes
    /// over the process; the subcommands are supervised.
    pub fn launch_mode(&self) -> LaunchMode {
        match self.command {
            None => LaunchMode::Replace,
            Some(_) => LaunchMode::Supervised,
        }
    }

    pub fn neon_cli_args(&self) -> Result<Vec<String>> {
        let args = match &self.command {
            None => login(None).positional(self.context_name.as_deref()),
            Some(LoginSubcommand::Delete(cmd)) => login(Some("delete"))
                .positional(cmd.context_name.as_deref())
                .switch("force", cmd.force),
            Some(LoginSubcommand::Export(cmd)) => login(Some("export"))
                .positional(cmd.path.as_deref())
                .value("context", cmd.context.as_deref()),
            Some(LoginSubcommand::Import(cmd)) => login(Some("import"))
                .required(cmd.path.as_deref(), "PATH")?
                .switch("force", cmd.force)
                .switch("no-login", cmd.no_login),
            Some(LoginSubcommand::List(cmd)) => {
                login(Some("list")).value("output", cmd.output.as_deref())
            }
        };

        Ok(args.into_vec())
    }

    pub async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<i32> {
        let args = self.neon_cli_args()?;
        Ok(ctx.run_neon_cli(args, self.launch_mode()).await?)
    }
}

fn login(subcommand: Option<&str>) -> NeonCliArgs {
    match subcommand {
        Some(subcommand) => NeonCliArgs::command(&["login", subcommand]),
        None => NeonCliArgs::command(&["login"]),
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct LoginDeleteCommand {
    /// Context to remove; defaults to the current context
    #[arg(value_name = "CONTEXTNAME")]
    pub context_name: Option<String>,

    /// Don't prompt for permission and also ignore missing contexts
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LoginExportCommand {
    /// File to write the context to; defaults to STDOUT
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Identifies the context to export by name
    #[arg(long)]
    pub context: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LoginImportCommand {
    /// Path to the exported context file
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Don't prompt for permission to replace an existing context
    #[arg(long)]
    pub force: bool,

    /// Don't login to the new context
    #[arg(long)]
    pub no_login: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LoginListCommand {
    /// Output format (json|yaml)
    #[arg(long, short = 'o', value_name = "FORMAT")]
    pub output: Option<String>,
}

/// Logs out of the current NEONKUBE context
pub async fn logout(ctx: &CommandContext) -> anyhow::Result<i32> {
    let args = NeonCliArgs::command(&["logout"]).into_vec();
    Ok(ctx.run_neon_cli(args, LaunchMode::Supervised).await?)
}
