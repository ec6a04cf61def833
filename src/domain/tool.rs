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

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::infrastructure::constants::{HELM_BINARY, NEON_CLI_BINARY};

/// External tools the plugin delegates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    NeonCli,
    Helm,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::NeonCli => NEON_CLI_BINARY,
            Tool::Helm => HELM_BINARY,
        }
    }

    /// Platform file name, e.g. `neon-cli.exe` on Windows
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name(), std::env::consts::EXE_SUFFIX)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a resolved executable was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableSource {
    InstallFolder,
    SourceRoot,
    /// Reported by `neon-cli toolpath`
    ToolPath,
}

/// A file that may hold a tool binary, with its modification time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutable {
    pub tool: Tool,
    pub path: PathBuf,
    pub source: ExecutableSource,
}

impl ResolvedExecutable {
    pub fn new(tool: Tool, path: impl Into<PathBuf>, source: ExecutableSource) -> Self {
        Self {
            tool,
            path: path.into(),
            source,
        }
    }
}
