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

use std::ffi::OsString;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::Path;

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::debug;

/// A child process made leader of its own process group, so that it and
/// everything it spawns can be killed as a unit.
#[derive(Debug)]
pub struct ProcessGroup {
    pgid: Pid,
}

impl ProcessGroup {
    pub fn spawn(command: &mut Command) -> io::Result<(Child, Self)> {
        command.process_group(0);
        let child = command.spawn()?;

        let pid = child
            .id()
            .ok_or_else(|| io::Error::other("child exited before its pid was recorded"))?;
        let pid = i32::try_from(pid).map_err(io::Error::other)?;

        Ok((
            child,
            Self {
                pgid: Pid::from_raw(pid),
            },
        ))
    }

    pub fn id(&self) -> u32 {
        self.pgid.as_raw() as u32
    }

    /// Sends SIGKILL to every process in the group. A group that is already
    /// gone is not an error.
    pub fn kill_all(&self) -> io::Result<()> {
        debug!(pgid = self.pgid.as_raw(), "Sending SIGKILL to process group");
        match killpg(self.pgid, Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(errno) => Err(io::Error::from_raw_os_error(errno as i32)),
        }
    }

    /// Nothing to release on Unix: the group disappears with its last member.
    pub fn dispose(self) {}
}

/// Replaces the current process image with `program`. Only returns on failure.
pub fn exec(program: &Path, args: &[OsString]) -> io::Error {
    std::process::Command::new(program).args(args).exec()
}
