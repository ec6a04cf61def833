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

use crate::infrastructure::constants::{ENV_INSTALL_FOLDER, ENV_SOURCE_ROOTS};

/// Inputs of the executable locator.
///
/// Populated once from the environment at start-up:
///
/// - `NEON_INSTALL_FOLDER`: folder of an installed neon-cli/neon-desktop.
///   When present it is authoritative.
/// - `NC_ROOT`, `NK_ROOT`: source checkouts searched for neon-cli build
///   output while developing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorConfig {
    pub install_folder: Option<PathBuf>,
    pub source_roots: Vec<PathBuf>,
}

impl LocatorConfig {
    pub fn new(install_folder: Option<PathBuf>, source_roots: Vec<PathBuf>) -> Self {
        Self {
            install_folder,
            source_roots,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name).map(PathBuf::from))
    }

    /// Builds the config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let non_empty = |name: &str| lookup(name).filter(|p| !p.as_os_str().is_empty());

        Self {
            install_folder: non_empty(ENV_INSTALL_FOLDER),
            source_roots: ENV_SOURCE_ROOTS
                .iter()
                .filter_map(|name| non_empty(name))
                .collect(),
        }
    }
}
