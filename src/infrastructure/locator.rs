// Copyright 2023 NEONFORGE LLC.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Executable locator
//!
//! Resolves the on-disk path of the tools the plugin delegates to. Two
//! layouts are recognized:
//!
//! - neon-cli/neon-desktop is installed: `NEON_INSTALL_FOLDER` references the
//!   folder holding the application binaries. neon-cli lives at its root and
//!   third-party tools like Helm in its `tools` subfolder. This layout always
//!   wins when configured.
//! - a maintainer is running from source: each source root is searched for
//!   neon-cli build output and the most recently built binary is used. Helm
//!   is then discovered by asking that neon-cli (`neon-cli toolpath helm`),
//!   which downloads Helm when it's missing and prints its path.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::SystemTime;

use tokio::process::Command;
use tracing::debug;

use crate::domain::{Candidate, ExecutableSource, LocatorConfig, ResolvedExecutable, Tool};
use crate::infrastructure::constants::{
    BUILD_CONFIGURATIONS, BUILD_OUTPUT_FOLDER, INSTALL_TOOLS_FOLDER, NEON_CLI_PROJECT_FOLDER,
    NEON_CLI_RUNTIME_ID, NEON_CLI_TARGET_FRAMEWORK, TOOLPATH_COMMAND,
};
use crate::shared::{NeonError, Result};

#[derive(Debug, Clone)]
pub struct ExecutableLocator {
    config: LocatorConfig,
}

impl ExecutableLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    pub async fn locate(&self, tool: Tool) -> Result<ResolvedExecutable> {
        let resolved = match tool {
            Tool::NeonCli => self.locate_neon_cli()?,
            Tool::Helm => self.locate_helm().await?,
        };

        debug!(
            tool = %resolved.tool,
            path = %resolved.path.display(),
            source = ?resolved.source,
            "Resolved executable"
        );
        Ok(resolved)
    }

    fn locate_neon_cli(&self) -> Result<ResolvedExecutable> {
        let tool = Tool::NeonCli;

        if let Some(install_folder) = &self.config.install_folder {
            return Ok(ResolvedExecutable::new(
                tool,
                install_folder.join(tool.file_name()),
                ExecutableSource::InstallFolder,
            ));
        }

        most_recent(self.source_root_candidates())
            .map(|c| ResolvedExecutable::new(tool, c.path, ExecutableSource::SourceRoot))
            .ok_or_else(|| NeonError::cannot_locate(tool))
    }

    async fn locate_helm(&self) -> Result<ResolvedExecutable> {
        let tool = Tool::Helm;

        if let Some(install_folder) = &self.config.install_folder {
            let in_tools = install_folder
                .join(INSTALL_TOOLS_FOLDER)
                .join(tool.file_name());
            let in_root = install_folder.join(tool.file_name());

            let path = if is_file(&in_tools) {
                in_tools
            } else if is_file(&in_root) {
                in_root
            } else {
                in_tools
            };
            return Ok(ResolvedExecutable::new(
                tool,
                path,
                ExecutableSource::InstallFolder,
            ));
        }

        let neon_cli = self.locate_neon_cli()?;
        let path = query_tool_path(&neon_cli.path, tool).await?;
        Ok(ResolvedExecutable::new(tool, path, ExecutableSource::ToolPath))
    }

    /// neon-cli paths under every source root, in search order, keeping only
    /// the ones that exist.
    pub fn source_root_candidates(&self) -> Vec<Candidate> {
        self.config
            .source_roots
            .iter()
            .flat_map(|root| neon_cli_layouts(root))
            .filter_map(probe)
            .collect()
    }
}

/// Build layouts searched under a source root:
///
/// 1. `{root}/Build/neon-cli/neon-cli`
/// 2. `{root}/Tools/neon-cli/bin/Debug/{framework}/{rid}/neon-cli`
/// 3. `{root}/Tools/neon-cli/bin/Release/{framework}/{rid}/neon-cli`
///
/// NOTE: The framework and runtime id segments follow the .NET SDK neon-cli
/// is built with and need updating along with it.
pub fn neon_cli_layouts(root: &Path) -> Vec<PathBuf> {
    let file_name = Tool::NeonCli.file_name();
    let mut paths = vec![root
        .join(BUILD_OUTPUT_FOLDER)
        .join(Tool::NeonCli.name())
        .join(&file_name)];

    for configuration in BUILD_CONFIGURATIONS {
        let mut path = root.to_path_buf();
        path.extend(NEON_CLI_PROJECT_FOLDER);
        path.push(configuration);
        path.push(NEON_CLI_TARGET_FRAMEWORK);
        path.push(NEON_CLI_RUNTIME_ID);
        path.push(&file_name);
        paths.push(path);
    }

    paths
}

/// Returns a candidate when a regular file exists at `path`.
pub fn probe(path: PathBuf) -> Option<Candidate> {
    let metadata = std::fs::metadata(&path).ok()?;
    if metadata.is_dir() {
        return None;
    }

    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    debug!(path = %path.display(), "Found candidate executable");
    Some(Candidate { path, modified })
}

/// Picks the most recently modified candidate. Ties go to the candidate
/// listed first.
pub fn most_recent(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(best) if best.modified >= candidate.modified => Some(best),
        _ => Some(candidate),
    })
}

fn is_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.is_dir())
        .unwrap_or(false)
}

/// Runs `neon-cli toolpath <tool>` and returns its trimmed standard output.
///
/// neon-cli may download the tool first, so this can take a while.
async fn query_tool_path(neon_cli: &Path, tool: Tool) -> Result<PathBuf> {
    debug!(
        neon_cli = %neon_cli.display(),
        "Querying neon-cli for the {} path", tool
    );

    let output = Command::new(neon_cli)
        .arg(TOOLPATH_COMMAND)
        .arg(tool.name())
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .await
        .map_err(|e| NeonError::tool_path(tool, neon_cli, format!("failed to launch: {}", e)))?;

    if !output.status.success() {
        return Err(NeonError::tool_path(
            tool,
            neon_cli,
            format!("neon-cli {}", output.status),
        ));
    }

    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if path.is_empty() {
        return Err(NeonError::cannot_locate(tool));
    }

    Ok(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, modified: SystemTime) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let file = File::create(path).unwrap();
        file.set_modified(modified).unwrap();
    }

    fn ago(secs: u64) -> SystemTime {
        SystemTime::now() - Duration::from_secs(secs)
    }

    fn layouts(root: &Path) -> (PathBuf, PathBuf, PathBuf) {
        let paths = neon_cli_layouts(root);
        (paths[0].clone(), paths[1].clone(), paths[2].clone())
    }

    #[test]
    fn test_layouts_order() {
        let root = Path::new("/src/neoncloud");
        let (build, debug, release) = layouts(root);

        assert!(build.starts_with(root.join("Build").join("neon-cli")));
        assert!(debug.to_string_lossy().contains("Debug"));
        assert!(release.to_string_lossy().contains("Release"));
        assert!(debug.ends_with(Path::new(NEON_CLI_RUNTIME_ID).join(Tool::NeonCli.file_name())));
    }

    #[tokio::test]
    async fn test_install_folder_wins_over_newer_source_build() {
        let install = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        touch(&install.path().join(Tool::NeonCli.file_name()), ago(3600));
        let (build, _, _) = layouts(root.path());
        touch(&build, SystemTime::now());

        let locator = ExecutableLocator::new(LocatorConfig::new(
            Some(install.path().to_path_buf()),
            vec![root.path().to_path_buf()],
        ));
        let resolved = locator.locate(Tool::NeonCli).await.unwrap();

        assert_eq!(resolved.path, install.path().join(Tool::NeonCli.file_name()));
        assert_eq!(resolved.source, ExecutableSource::InstallFolder);
    }

    #[tokio::test]
    async fn test_install_folder_is_authoritative_even_when_missing() {
        let install = TempDir::new().unwrap();
        let locator = ExecutableLocator::new(LocatorConfig::new(
            Some(install.path().to_path_buf()),
            Vec::new(),
        ));

        let resolved = locator.locate(Tool::NeonCli).await.unwrap();
        assert_eq!(resolved.path, install.path().join(Tool::NeonCli.file_name()));
    }

    #[tokio::test]
    async fn test_most_recent_candidate_wins() {
        let root = TempDir::new().unwrap();
        let (build, debug, release) = layouts(root.path());
        touch(&build, ago(7200));
        touch(&debug, ago(60));
        touch(&release, ago(3600));

        let locator =
            ExecutableLocator::new(LocatorConfig::new(None, vec![root.path().to_path_buf()]));
        let resolved = locator.locate(Tool::NeonCli).await.unwrap();

        assert_eq!(resolved.path, debug);
        assert_eq!(resolved.source, ExecutableSource::SourceRoot);
    }

    #[tokio::test]
    async fn test_most_recent_across_source_roots() {
        let neoncloud = TempDir::new().unwrap();
        let neonkube = TempDir::new().unwrap();
        let (old, _, _) = layouts(neoncloud.path());
        let (_, _, newest) = layouts(neonkube.path());
        touch(&old, ago(600));
        touch(&newest, ago(5));

        let locator = ExecutableLocator::new(LocatorConfig::new(
            None,
            vec![neoncloud.path().to_path_buf(), neonkube.path().to_path_buf()],
        ));

        assert_eq!(locator.locate(Tool::NeonCli).await.unwrap().path, newest);
    }

    #[test]
    fn test_directories_are_not_candidates() {
        let root = TempDir::new().unwrap();
        let (build, debug, _) = layouts(root.path());
        fs::create_dir_all(&build).unwrap();
        touch(&debug, ago(3600));

        let locator =
            ExecutableLocator::new(LocatorConfig::new(None, vec![root.path().to_path_buf()]));
        let candidates = locator.source_root_candidates();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, debug);
    }

    #[tokio::test]
    async fn test_no_candidates_fails() {
        let root = TempDir::new().unwrap();
        let locator =
            ExecutableLocator::new(LocatorConfig::new(None, vec![root.path().to_path_buf()]));

        let err = locator.locate(Tool::NeonCli).await.unwrap_err();
        assert!(matches!(err, NeonError::CannotLocate { tool: Tool::NeonCli }));

        let err = ExecutableLocator::new(LocatorConfig::default())
            .locate(Tool::Helm)
            .await
            .unwrap_err();
        assert!(matches!(err, NeonError::CannotLocate { tool: Tool::NeonCli }));
    }

    #[test]
    fn test_most_recent_tie_keeps_first() {
        let modified = ago(10);
        let first = Candidate {
            path: PathBuf::from("first"),
            modified,
        };
        let second = Candidate {
            path: PathBuf::from("second"),
            modified,
        };

        assert_eq!(most_recent(vec![first.clone(), second]), Some(first));
        assert_eq!(most_recent(Vec::new()), None);
    }

    #[tokio::test]
    async fn test_helm_prefers_install_tools_folder() {
        let install = TempDir::new().unwrap();
        let in_tools = install.path().join("tools").join(Tool::Helm.file_name());
        let in_root = install.path().join(Tool::Helm.file_name());
        touch(&in_root, SystemTime::now());

        let locator = ExecutableLocator::new(LocatorConfig::new(
            Some(install.path().to_path_buf()),
            Vec::new(),
        ));
        assert_eq!(locator.locate(Tool::Helm).await.unwrap().path, in_root);

        touch(&in_tools, ago(3600));
        assert_eq!(locator.locate(Tool::Helm).await.unwrap().path, in_tools);
    }

    #[cfg(unix)]
    fn fake_neon_cli(root: &Path, script: &str) {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let (build, _, _) = layouts(root);
        fs::create_dir_all(build.parent().unwrap()).unwrap();
        {
            let mut file = File::create(&build).unwrap();
            writeln!(file, "#!/bin/sh\n{}", script).unwrap();
            file.sync_all().unwrap();
        }
        fs::set_permissions(&build, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_helm_delegates_to_neon_cli_toolpath() {
        let root = TempDir::new().unwrap();
        fake_neon_cli(
            root.path(),
            r#"[ "$1" = toolpath ] && [ "$2" = helm ] || exit 9
echo "   /opt/tools/helm  ""#,
        );

        let locator =
            ExecutableLocator::new(LocatorConfig::new(None, vec![root.path().to_path_buf()]));
        let resolved = locator.locate(Tool::Helm).await.unwrap();

        assert_eq!(resolved.path, PathBuf::from("/opt/tools/helm"));
        assert_eq!(resolved.source, ExecutableSource::ToolPath);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_helm_toolpath_failure_is_fatal() {
        let root = TempDir::new().unwrap();
        fake_neon_cli(root.path(), "exit 3");

        let locator =
            ExecutableLocator::new(LocatorConfig::new(None, vec![root.path().to_path_buf()]));
        let err = locator.locate(Tool::Helm).await.unwrap_err();

        assert!(matches!(err, NeonError::ToolPath { tool: Tool::Helm, .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_helm_empty_toolpath_cannot_locate() {
        let root = TempDir::new().unwrap();
        fake_neon_cli(root.path(), "echo '   '");

        let locator =
            ExecutableLocator::new(LocatorConfig::new(None, vec![root.path().to_path_buf()]));
        let err = locator.locate(Tool::Helm).await.unwrap_err();

        assert!(matches!(err, NeonError::CannotLocate { tool: Tool::Helm }));
    }
}
