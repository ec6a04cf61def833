// CLI command definitions

use std::ffi::OsString;

use clap::Parser;

use super::cluster::ClusterCommand;
use super::context::CommandContext;
use super::helm::HelmCommand;
use super::login::{self, LoginCommand};
use super::version::VersionCommand;

#[derive(Parser, Debug)]
#[command(
    name = "neon",
    version,
    about = "Manage NEONKUBE clusters from kubectl",
    long_about = "kubectl plugin for NEONKUBE. Cluster and login commands are \
                  forwarded to neon-cli; helm runs the Helm release NEONKUBE ships with."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Deploy and manage NEONKUBE clusters
    Cluster {
        #[command(subcommand)]
        command: ClusterCommand,
    },

    /// Log into a NEONKUBE cluster or manage cluster contexts
    Login(LoginCommand),

    /// Logs out of the current NEONKUBE context
    Logout,

    /// Run the Helm release NEONKUBE ships with
    #[command(disable_help_flag = true)]
    Helm(HelmCommand),

    /// Print the plugin and bundled tool versions
    Version(VersionCommand),
}

impl CliArgs {
    /// Parses the process arguments.
    ///
    /// `helm` is intercepted before clap sees anything so that every argument
    /// after it, including `--help` and `--`, goes to Helm unmodified.
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        if args.get(1).is_some_and(|arg| arg == "helm") {
            return Self {
                command: Commands::Helm(HelmCommand::from_raw(args.into_iter().skip(2))),
            };
        }

        Self::parse_from(args)
    }
}

impl Commands {
    pub async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<i32> {
        match self {
            Commands::Cluster { command } => command.execute(ctx).await,
            Commands::Login(cmd) => cmd.execute(ctx).await,
            Commands::Logout => login::logout(ctx).await,
            Commands::Helm(cmd) => cmd.execute(ctx).await,
            Commands::Version(cmd) => cmd.execute().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helm_args(argv: &[&str]) -> Vec<OsString> {
        match CliArgs::parse_args(argv.iter().copied()).command {
            Commands::Helm(cmd) => cmd.args,
            other => panic!("expected helm, got {:?}", other),
        }
    }

    #[test]
    fn test_helm_arguments_are_forwarded_verbatim() {
        let argv = [
            "neon",
            "helm",
            "--namespace",
            "neon-system",
            "upgrade",
            "--install",
            "--",
            "-v",
            "--help",
            "",
        ];
        assert_eq!(helm_args(&argv), argv[2..].to_vec());
    }

    #[test]
    fn test_helm_without_arguments() {
        assert!(helm_args(&["neon", "helm"]).is_empty());
    }

    #[test]
    fn test_clap_helm_path_accepts_hyphen_values() {
        let cli = CliArgs::try_parse_from(["neon", "helm", "--namespace", "x", "list", "-a"]).unwrap();
        match cli.command {
            Commands::Helm(cmd) => assert_eq!(cmd.args, vec!["--namespace", "x", "list", "-a"]),
            other => panic!("expected helm, got {:?}", other),
        }
    }

    #[test]
    fn test_other_commands_go_through_clap() {
        let cli = CliArgs::parse_args(["neon", "logout"]);
        assert!(matches!(cli.command, Commands::Logout));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
