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

//! Process launcher
//!
//! Runs a resolved executable so that, from the user's point of view, it
//! behaves as if it had been started directly: same standard streams, same
//! environment, same exit code.
//!
//! Two modes are supported:
//!
//! - [`LaunchMode::Replace`] swaps the current process image for the target
//!   (`exec`). Windows can't do that, so there it runs supervised instead.
//! - [`LaunchMode::Supervised`] spawns the target as a child in its own
//!   process group (a job object on Windows). SIGINT/SIGTERM kill the whole
//!   group; otherwise the child's exit code is relayed.

pub mod signal;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::ProcessGroup;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::ProcessGroup;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::{ResolvedExecutable, Tool};
use crate::infrastructure::constants::EXIT_LAUNCH_FAILURE;
use crate::shared::{NeonError, Result};
use signal::CancellationSignals;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Replace,
    Supervised,
}

/// A fully assembled request to run a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: Tool,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub mode: LaunchMode,
}

impl Invocation {
    pub fn new(executable: ResolvedExecutable, args: Vec<OsString>, mode: LaunchMode) -> Self {
        Self {
            tool: executable.tool,
            program: executable.path,
            args,
            mode,
        }
    }
}

#[async_trait]
pub trait Launcher: Send + Sync {
    /// Runs the invocation and returns the exit code the plugin must
    /// terminate with.
    async fn launch(&self, invocation: Invocation) -> Result<i32>;
}

/// Launches real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, invocation: Invocation) -> Result<i32> {
        debug!(
            program = %invocation.program.display(),
            args = ?invocation.args,
            mode = ?invocation.mode,
            "Launching {}", invocation.tool
        );

        match invocation.mode {
            LaunchMode::Replace => replace(&invocation).await,
            LaunchMode::Supervised => supervise(&invocation).await,
        }
    }
}

#[cfg(unix)]
async fn replace(invocation: &Invocation) -> Result<i32> {
    let source = unix::exec(&invocation.program, &invocation.args);
    Err(NeonError::launch(
        invocation.tool,
        &invocation.program,
        source,
    ))
}

#[cfg(windows)]
async fn replace(invocation: &Invocation) -> Result<i32> {
    supervise(invocation).await
}

/// Runs the invocation as a child process and waits for it.
///
/// The wait races a listener task that kills the child's process group on
/// SIGINT/SIGTERM. Either way the child ends up terminated and its status is
/// relayed; there is no grace period at this layer.
pub async fn supervise(invocation: &Invocation) -> Result<i32> {
    let signals = match CancellationSignals::register() {
        Ok(signals) => Some(signals),
        Err(err) => {
            warn!(%err, "Unable to listen for termination signals");
            None
        }
    };

    let mut command = tokio::process::Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let (mut child, group) = ProcessGroup::spawn(&mut command)
        .map_err(|source| NeonError::launch(invocation.tool, &invocation.program, source))?;
    let group = Arc::new(group);
    debug!(group = group.id(), "Started {}", invocation.tool);

    let listener = signals.map(|mut signals| {
        let group = Arc::clone(&group);
        tokio::spawn(async move {
            let signal = signals.recv().await;
            warn!(%signal, "Received signal, killing the child process group");
            if let Err(err) = group.kill_all() {
                error!(%err, "Failed to kill the child process group");
            }
        })
    });

    let status = child.wait().await;

    if let Some(listener) = listener {
        listener.abort();
        let _ = listener.await;
    }
    if let Ok(group) = Arc::try_unwrap(group) {
        group.dispose();
    }

    let status = status.map_err(NeonError::Wait)?;
    debug!(%status, "{} exited", invocation.tool);
    Ok(relay_exit_code(status))
}

/// Exit code the plugin terminates with for a child that ended with `status`.
///
/// Normal exits relay the child's code verbatim. A child killed by a signal
/// has no code; it's reported as `128 + signal` the way shells do.
pub fn relay_exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use crate::infrastructure::constants::EXIT_SIGNAL_OFFSET;
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return EXIT_SIGNAL_OFFSET + signal;
        }
    }

    EXIT_LAUNCH_FAILURE
}
