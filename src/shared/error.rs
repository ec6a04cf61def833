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

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Tool;
use crate::infrastructure::constants::{EXIT_COMMAND_ERROR, EXIT_LAUNCH_FAILURE};

pub type Result<T> = std::result::Result<T, NeonError>;

#[derive(Error, Debug)]
pub enum NeonError {
    #[error("cannot locate the [{tool}] binary")]
    CannotLocate { tool: Tool },

    #[error("[{neon_cli}] could not resolve the path for [{tool}]: {reason}")]
    ToolPath {
        tool: Tool,
        neon_cli: PathBuf,
        reason: String,
    },

    #[error("cannot launch the [{tool}] binary: {}", path.display())]
    Launch {
        tool: Tool,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to determine how the child process terminated: {0}")]
    Wait(#[source] std::io::Error),

    #[error("{0} argument is required")]
    MissingArgument(&'static str),
}

impl NeonError {
    pub fn cannot_locate(tool: Tool) -> Self {
        Self::CannotLocate { tool }
    }

    pub fn launch(tool: Tool, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Launch {
            tool,
            path: path.into(),
            source,
        }
    }

    pub fn tool_path(tool: Tool, neon_cli: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ToolPath {
            tool,
            neon_cli: neon_cli.into(),
            reason: reason.into(),
        }
    }

    /// Exit code the wrapper terminates with when this error ends the run.
    ///
    /// Returns `None` for failures where no exit code can be inferred and the
    /// process has to abort instead.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CannotLocate { .. } | Self::ToolPath { .. } | Self::Launch { .. } => {
                Some(EXIT_LAUNCH_FAILURE)
            }
            Self::MissingArgument(_) => Some(EXIT_COMMAND_ERROR),
            Self::Wait(_) => None,
        }
    }
}
