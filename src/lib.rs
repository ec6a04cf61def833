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

//! NEONKUBE kubectl plugin
//!
//! Locates the `neon-cli` and Helm executables that ship with NEONKUBE and
//! runs them on behalf of the user, relaying standard streams, termination
//! signals and exit codes.

// Core modules
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export commonly used types
pub use domain::{ExecutableSource, LocatorConfig, LockStatus, ResolvedExecutable, Tool};
pub use infrastructure::{ExecutableLocator, Invocation, LaunchMode, Launcher, ProcessLauncher};
pub use shared::{NeonError, Result};
