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

/// Environment variables
pub const ENV_INSTALL_FOLDER: &str = "NEON_INSTALL_FOLDER";
pub const ENV_SOURCE_ROOTS: &[&str] = &["NC_ROOT", "NK_ROOT"];
pub const ENV_LOG_FILTER: &str = "NEON_LOG";

/// Default log filter when NEON_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Tool binaries
pub const NEON_CLI_BINARY: &str = "neon-cli";
pub const HELM_BINARY: &str = "helm";

/// Subfolder of the install folder holding third-party tools
pub const INSTALL_TOOLS_FOLDER: &str = "tools";

/// neon-cli build output layout under a source root
pub const BUILD_OUTPUT_FOLDER: &str = "Build";
pub const NEON_CLI_PROJECT_FOLDER: &[&str] = &["Tools", "neon-cli", "bin"];
pub const BUILD_CONFIGURATIONS: &[&str] = &["Debug", "Release"];

/// .NET target framework and runtime identifier of the neon-cli build
#[cfg(windows)]
pub const NEON_CLI_TARGET_FRAMEWORK: &str = "net7.0-windows10.0.17763.0";
#[cfg(not(windows))]
pub const NEON_CLI_TARGET_FRAMEWORK: &str = "net7.0";

#[cfg(windows)]
pub const NEON_CLI_RUNTIME_ID: &str = "win10-x64";
#[cfg(all(target_os = "macos", target_arch = "aarch64"))]
pub const NEON_CLI_RUNTIME_ID: &str = "osx-arm64";
#[cfg(all(target_os = "macos", not(target_arch = "aarch64")))]
pub const NEON_CLI_RUNTIME_ID: &str = "osx-x64";
#[cfg(all(not(windows), not(target_os = "macos"), target_arch = "aarch64"))]
pub const NEON_CLI_RUNTIME_ID: &str = "linux-arm64";
#[cfg(all(not(windows), not(target_os = "macos"), not(target_arch = "aarch64")))]
pub const NEON_CLI_RUNTIME_ID: &str = "linux-x64";

/// neon-cli command used to discover tool binaries
pub const TOOLPATH_COMMAND: &str = "toolpath";

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_COMMAND_ERROR: i32 = 1;
pub const EXIT_LAUNCH_FAILURE: i32 = -1;

/// Offset added to the signal number of a killed child
pub const EXIT_SIGNAL_OFFSET: i32 = 128;

/// Cluster command defaults
pub const DEFAULT_CLUSTER_DEPLOY_PARALLEL: u32 = 6;

/// Versions this release of the plugin is built against
pub const NEON_CLI_VERSION: &str = "0.10.0-beta.4";
pub const HELM_VERSION: &str = "3.12.0";
