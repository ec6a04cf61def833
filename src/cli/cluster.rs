//! `neon cluster` commands
//!
//! Every subcommand is forwarded to `neon-cli cluster ...` and run
//! supervised; the plugin's exit code is whatever neon-cli exits with.

use clap::{Args, Subcommand};
use tracing::debug;

use super::args::NeonCliArgs;
use super::context::CommandContext;
use crate::domain::LockStatus;
use crate::infrastructure::constants::DEFAULT_CLUSTER_DEPLOY_PARALLEL;
use crate::infrastructure::LaunchMode;
use crate::shared::Result;

#[derive(Subcommand, Debug, Clone)]
pub enum ClusterCommand {
    /// Performs some checks against the current NEONKUBE cluster
    Check(CheckCommand),

    /// Opens a NEONKUBE dashboard in a browser
    Dashboard(DashboardCommand),

    /// Permanently deletes the current NEONKUBE cluster or a specific cluster
    #[command(alias = "rm")]
    Delete(DeleteCommand),

    /// Deploys a NEONKUBE cluster, based on a cluster definition
    Deploy(DeployCommand),

    /// Prints health information for the current cluster
    Health,

    /// Prints information about the current cluster
    Info,

    /// Determines whether the current NEONKUBE cluster is locked
    ///
    /// Exits with 0 when the cluster is locked, 2 when it's unlocked and 1
    /// when the lock status can't be determined.
    #[command(name = "islocked")]
    IsLocked,

    /// Locks the current NEONKUBE cluster
    Lock,

    /// Pauses the current NEONKUBE cluster
    Pause,

    /// MAINTAINERS ONLY: Provisions infrastructure required to host a NEONKUBE cluster
    Prepare(PrepareCommand),

    /// Prints or sets information about the cluster purpose
    Purpose(PurposeCommand),

    /// Resets the current NEONKUBE cluster to its factory new condition
    Reset(ResetCommand),

    /// MAINTAINERS ONLY: Sets up a NEONKUBE cluster on prepared infrastructure
    Setup(SetupCommand),

    /// Starts the current stopped or paused NEONKUBE cluster
    Start,

    /// Stops the current NEONKUBE cluster
    Stop(StopCommand),

    /// Unlocks the current NEONKUBE cluster
    Unlock,

    /// Validates a NEONKUBE cluster definition YAML file
    Validate(ValidateCommand),
}

impl ClusterCommand {
    /// Arguments passed to neon-cli for this command
    pub fn neon_cli_args(&self) -> Result<Vec<String>> {
        let args = match self {
            Self::Check(cmd) => cmd.neon_cli_args(),
            Self::Dashboard(cmd) => cmd.neon_cli_args(),
            Self::Delete(cmd) => cmd.neon_cli_args(),
            Self::Deploy(cmd) => cmd.neon_cli_args()?,
            Self::Health => cluster("health"),
            Self::Info => cluster("info"),
            Self::IsLocked => cluster("islocked"),
            Self::Lock => cluster("lock"),
            Self::Pause => cluster("pause"),
            Self::Prepare(cmd) => cmd.neon_cli_args()?,
            Self::Purpose(cmd) => cmd.neon_cli_args(),
            Self::Reset(cmd) => cmd.neon_cli_args(),
            Self::Setup(cmd) => cmd.neon_cli_args()?,
            Self::Start => cluster("start"),
            Self::Stop(cmd) => cmd.neon_cli_args(),
            Self::Unlock => cluster("unlock"),
            Self::Validate(cmd) => cmd.neon_cli_args()?,
        };

        Ok(args.into_vec())
    }

    pub async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<i32> {
        let args = self.neon_cli_args()?;
        let exit_code = ctx.run_neon_cli(args, LaunchMode::Supervised).await?;

        if let Self::IsLocked = self {
            match LockStatus::from_exit_code(exit_code) {
                Some(status) => debug!(%status, "Cluster lock status"),
                None => debug!(exit_code, "Unexpected lock status exit code"),
            }
        }

        Ok(exit_code)
    }
}

fn cluster(command: &str) -> NeonCliArgs {
    NeonCliArgs::command(&["cluster", command])
}

#[derive(Args, Debug, Clone, Default)]
pub struct CheckCommand {
    /// Performs all checks (implied when no other options are present)
    #[arg(long)]
    pub all: bool,

    /// Verifies that all running container images are included in the cluster manifest
    #[arg(long)]
    pub container_images: bool,

    /// Verifies that all running pods have a non-zero PriorityClass
    #[arg(long)]
    pub priority_class: bool,

    /// Verifies that all pod containers specify resource requests and limits
    #[arg(long)]
    pub resources: bool,

    /// Includes additional information for some of the checks even when there are no errors
    #[arg(long)]
    pub details: bool,
}

impl CheckCommand {
    fn neon_cli_args(&self) -> NeonCliArgs {
        cluster("check")
            .switch("all", self.all)
            .switch("container-images", self.container_images)
            .switch("priority-class", self.priority_class)
            .switch("resources", self.resources)
            .switch("details", self.details)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DashboardCommand {
    /// Dashboard to open; lists the available dashboards when omitted
    #[arg(value_name = "DASHBOARD")]
    pub dashboard: Option<String>,
}

impl DashboardCommand {
    fn neon_cli_args(&self) -> NeonCliArgs {
        cluster("dashboard").positional(self.dashboard.as_deref())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeleteCommand {
    /// Cluster to delete; defaults to the current cluster
    #[arg(value_name = "CLUSTERNAME")]
    pub cluster_name: Option<String>,

    /// Don't prompt for permission or require the cluster be unlocked before removal
    #[arg(long)]
    pub force: bool,
}

impl DeleteCommand {
    fn neon_cli_args(&self) -> NeonCliArgs {
        cluster("delete")
            .positional(self.cluster_name.as_deref())
            .switch("force", self.force)
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeployCommand {
    /// Path to the cluster definition YAML file
    #[arg(value_name = "CLUSTERDEF")]
    pub cluster_def: Option<String>,

    /// Performs development related checks against the cluster after it's been deployed
    #[arg(long)]
    pub check: bool,

    /// Don't prompt for permission to remove existing contexts that reference the target cluster
    #[arg(long)]
    pub force: bool,

    /// Maximum number of node related operations to perform in parallel
    #[arg(long, default_value_t = DEFAULT_CLUSTER_DEPLOY_PARALLEL)]
    pub max_parallel: u32,

    /// Disables telemetry uploads for failed cluster deployments
    #[arg(long)]
    pub no_telemetry: bool,

    /// APT package cache servers (HOST:PORT), separated by commas
    #[arg(long, value_name = "SERVERS")]
    pub package_cache: Option<String>,

    /// Only print the currently executing step rather than detailed setup status
    #[arg(long)]
    pub quiet: bool,

    /// MAINTAINER ONLY: Upload Helm charts from your workstation rather than using the node image charts
    #[arg(long)]
    pub upload_charts: bool,

    /// MAINTAINER ONLY: Deploy using a preview node image
    #[arg(long)]
    pub use_preview: bool,

    /// MAINTAINER ONLY: Deploy from an internal build, optionally from a GitHub source branch
    #[arg(long, value_name = "BRANCH", num_args = 0..=1, require_equals = true)]
    pub use_staged: Option<Option<String>>,
}

impl DeployCommand {
    fn neon_cli_args(&self) -> Result<NeonCliArgs> {
        Ok(cluster("deploy")
            .required(self.cluster_def.as_deref(), "CLUSTERDEF")?
            .switch("check", self.check)
            .switch("force", self.force)
            .max_parallel(self.max_parallel)
            .switch("no-telemetry", self.no_telemetry)
            .value("package-cache", self.package_cache.as_deref())
            .switch("quiet", self.quiet)
            .switch("upload-charts", self.upload_charts)
            .switch("use-preview", self.use_preview)
            .optional_value("use-staged", self.use_staged.as_ref().map(Option::as_deref)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct PrepareCommand {
    /// Path to the cluster definition YAML file
    #[arg(value_name = "CLUSTERDEF")]
    pub cluster_def: Option<String>,

    /// Base image name to use when preparing the nodes
    #[arg(long, value_name = "NAME")]
    pub base_image_name: Option<String>,

    /// Prepares the cluster in debug mode (slower, no node image required)
    #[arg(long)]
    pub debug: bool,

    /// Disables parallel node preparation
    #[arg(long)]
    pub disable_pending: bool,

    /// Uses insecure connections while preparing the cluster
    #[arg(long)]
    pub insecure: bool,

    /// Maximum number of node related operations to perform in parallel
    #[arg(long, default_value_t = DEFAULT_CLUSTER_DEPLOY_PARALLEL)]
    pub max_parallel: u32,

    /// Path to a local node image file
    #[arg(long, value_name = "PATH")]
    pub node_image_path: Option<String>,

    /// URI of the node image to download
    #[arg(long, value_name = "URI")]
    pub node_image_uri: Option<String>,

    /// Disables telemetry uploads for failed cluster preparation
    #[arg(long)]
    pub no_telemetry: bool,

    /// APT package cache servers (HOST:PORT), separated by commas
    #[arg(long, value_name = "SERVERS")]
    pub package_cache: Option<String>,

    /// Only print the currently executing step rather than detailed setup status
    #[arg(long)]
    pub quiet: bool,

    /// Doesn't redact sensitive information in logs
    #[arg(long)]
    pub unredacted: bool,

    /// Prepare from an internal build, optionally from a GitHub source branch
    #[arg(long, value_name = "BRANCH", num_args = 0..=1, require_equals = true)]
    pub use_staged: Option<Option<String>>,
}

impl PrepareCommand {
    fn neon_cli_args(&self) -> Result<NeonCliArgs> {
        Ok(cluster("prepare")
            .required(self.cluster_def.as_deref(), "CLUSTERDEF")?
            .value("base-image-name", self.base_image_name.as_deref())
            .switch("debug", self.debug)
            .switch("disable-pending", self.disable_pending)
            .switch("insecure", self.insecure)
            .max_parallel(self.max_parallel)
            .value("node-image-path", self.node_image_path.as_deref())
            .value("node-image-uri", self.node_image_uri.as_deref())
            .switch("no-telemetry", self.no_telemetry)
            .value("package-cache", self.package_cache.as_deref())
            .switch("quiet", self.quiet)
            .switch("unredacted", self.unredacted)
            .optional_value("use-staged", self.use_staged.as_ref().map(Option::as_deref)))
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct PurposeCommand {
    /// New cluster purpose; prints the current purpose when omitted
    #[arg(value_name = "NEWPURPOSE")]
    pub purpose: Option<String>,
}

impl PurposeCommand {
    fn neon_cli_args(&self) -> NeonCliArgs {
        cluster("purpose").positional(self.purpose.as_deref())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ResetCommand {
    /// Resets authentication (Dex, Glauth)
    #[arg(long)]
    pub auth: bool,

    /// Resets container registries and removes non-system container images
    #[arg(long)]
    pub crio: bool,

    /// Don't prompt for permission or require the cluster be unlocked before reset
    #[arg(long)]
    pub force: bool,

    /// Resets Harbor components
    #[arg(long)]
    pub harbor: bool,

    /// Comma separated non-system namespaces to retain, or "*" to retain them all
    #[arg(long, value_name = "NAMESPACES")]
    pub keep_namespaces: Option<String>,

    /// Resets Minio
    #[arg(long)]
    pub minio: bool,

    /// Clears monitoring data as well as non-system dashboards and alerts
    #[arg(long)]
    pub monitoring: bool,
}

impl ResetCommand {
    fn neon_cli_args(&self) -> NeonCliArgs {
        cluster("reset")
            .switch("auth", self.auth)
            .switch("crio", self.crio)
            .switch("force", self.force)
            .switch("harbor", self.harbor)
            .value("keep-namespaces", self.keep_namespaces.as_deref())
            .switch("minio", self.minio)
            .switch("monitoring", self.monitoring)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SetupCommand {
    /// Context of the prepared cluster (root@CLUSTER-NAME)
    #[arg(value_name = "CONTEXTNAME")]
    pub context_name: Option<String>,

    /// Performs development related checks against the cluster after it's been set up
    #[arg(long)]
    pub check: bool,

    /// Sets up the cluster in debug mode
    #[arg(long)]
    pub debug: bool,

    /// Disables parallel node setup
    #[arg(long)]
    pub disable_pending: bool,

    /// Don't prompt for permission to remove existing contexts that reference the cluster
    #[arg(long)]
    pub force: bool,

    /// Maximum number of node related operations to perform in parallel
    #[arg(long, default_value_t = DEFAULT_CLUSTER_DEPLOY_PARALLEL)]
    pub max_parallel: u32,

    /// Disables telemetry uploads for failed cluster setup
    #[arg(long)]
    pub no_telemetry: bool,

    /// Only print the currently executing step rather than detailed setup status
    #[arg(long)]
    pub quiet: bool,

    /// Doesn't redact sensitive information in logs
    #[arg(long)]
    pub unredacted: bool,

    /// Upload Helm charts from your workstation rather than using the node image charts
    #[arg(long)]
    pub upload_charts: bool,

    /// Set up from an internal build, optionally from a GitHub source branch
    #[arg(long, value_name = "BRANCH", num_args = 0..=1, require_equals = true)]
    pub use_staged: Option<Option<String>>,
}

impl SetupCommand {
    fn neon_cli_args(&self) -> Result<NeonCliArgs> {
        Ok(cluster("setup")
            .required(self.context_name.as_deref(), "CONTEXTNAME")?
            .switch("check", self.check)
            .switch("debug", self.debug)
            .switch("disable-pending", self.disable_pending)
            .switch("force", self.force)
            .max_parallel(self.max_parallel)
            .switch("no-telemetry", self.no_telemetry)
            .switch("quiet", self.quiet)
            .switch("unredacted", self.unredacted)
            .switch("upload-charts", self.upload_charts)
            .optional_value("use-staged", self.use_staged.as_ref().map(Option::as_deref)))
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct StopCommand {
    /// Don't prompt for permission or require the cluster be unlocked before stopping
    #[arg(long)]
    pub force: bool,

    /// Turns the nodes off immediately without a graceful shutdown (may lose data)
    #[arg(long)]
    pub turnoff: bool,
}

impl StopCommand {
    fn neon_cli_args(&self) -> NeonCliArgs {
        cluster("stop")
            .switch("force", self.force)
            .switch("turnoff", self.turnoff)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ValidateCommand {
    /// Path to the cluster definition YAML file
    #[arg(value_name = "CLUSTERDEF")]
    pub cluster_def: Option<String>,
}

impl ValidateCommand {
    fn neon_cli_args(&self) -> Result<NeonCliArgs> {
        cluster("validate").required(self.cluster_def.as_deref(), "CLUSTERDEF")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CliArgs, Commands};
    use crate::shared::NeonError;
    use clap::Parser;

    fn cluster_args(argv: &[&str]) -> Result<Vec<String>> {
        let cli = CliArgs::try_parse_from(argv).expect("arguments should parse");
        match cli.command {
            Commands::Cluster { command } => command.neon_cli_args(),
            other => panic!("expected a cluster command, got {:?}", other),
        }
    }

    #[test]
    fn test_deploy_argument_order() {
        let args = cluster_args(&[
            "neon",
            "cluster",
            "deploy",
            "--use-staged=master",
            "--force",
            "my-cluster.yaml",
            "--max-parallel",
            "10",
        ])
        .unwrap();

        assert_eq!(
            args,
            vec![
                "cluster",
                "deploy",
                "my-cluster.yaml",
                "--force",
                "--max-parallel=10",
                "--use-staged=master",
            ]
        );
    }

    #[test]
    fn test_deploy_defaults_emit_no_flags() {
        let args = cluster_args(&["neon", "cluster", "deploy", "my-cluster.yaml"]).unwrap();
        assert_eq!(args, vec!["cluster", "deploy", "my-cluster.yaml"]);
    }

    #[test]
    fn test_use_staged_without_branch() {
        let args =
            cluster_args(&["neon", "cluster", "deploy", "my-cluster.yaml", "--use-staged"]).unwrap();
        assert_eq!(
            args,
            vec!["cluster", "deploy", "my-cluster.yaml", "--use-staged"]
        );
    }

    #[test]
    fn test_use_staged_with_empty_value_is_omitted() {
        for command in ["deploy", "prepare"] {
            let args =
                cluster_args(&["neon", "cluster", command, "my-cluster.yaml", "--use-staged="])
                    .unwrap();
            assert_eq!(args, vec!["cluster", command, "my-cluster.yaml"]);
        }

        let args = cluster_args(&["neon", "cluster", "setup", "root@my-cluster", "--use-staged="])
            .unwrap();
        assert_eq!(args, vec!["cluster", "setup", "root@my-cluster"]);
    }

    #[test]
    fn test_prepare_package_cache_uses_equals() {
        let args = cluster_args(&[
            "neon",
            "cluster",
            "prepare",
            "--package-cache",
            "10.0.0.1:3142",
            "my-cluster.yaml",
        ])
        .unwrap();

        assert_eq!(
            args,
            vec![
                "cluster",
                "prepare",
                "my-cluster.yaml",
                "--package-cache=10.0.0.1:3142",
            ]
        );
    }

    #[test]
    fn test_missing_cluster_definition() {
        for command in ["deploy", "prepare", "validate"] {
            let err = cluster_args(&["neon", "cluster", command]).unwrap_err();
            assert!(matches!(err, NeonError::MissingArgument("CLUSTERDEF")));
        }

        let err = cluster_args(&["neon", "cluster", "setup"]).unwrap_err();
        assert!(matches!(err, NeonError::MissingArgument("CONTEXTNAME")));
    }

    #[test]
    fn test_delete_alias_and_optional_positional() {
        assert_eq!(
            cluster_args(&["neon", "cluster", "rm", "--force"]).unwrap(),
            vec!["cluster", "delete", "--force"]
        );
        assert_eq!(
            cluster_args(&["neon", "cluster", "delete", "my-cluster"]).unwrap(),
            vec!["cluster", "delete", "my-cluster"]
        );
    }

    #[test]
    fn test_reset_flag_order() {
        let args = cluster_args(&[
            "neon",
            "cluster",
            "reset",
            "--monitoring",
            "--keep-namespaces=*",
            "--auth",
        ])
        .unwrap();

        assert_eq!(
            args,
            vec!["cluster", "reset", "--auth", "--keep-namespaces=*", "--monitoring"]
        );
    }

    #[test]
    fn test_commands_without_arguments() {
        for command in ["health", "info", "islocked", "lock", "pause", "start", "unlock"] {
            assert_eq!(
                cluster_args(&["neon", "cluster", command]).unwrap(),
                vec!["cluster", command]
            );
        }
    }
}
