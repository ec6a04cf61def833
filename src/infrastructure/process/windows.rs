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

use std::ffi::c_void;
use std::io;

use tokio::process::{Child, Command};
use tracing::debug;
use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
use windows_sys::Win32::System::JobObjects::{
    AssignProcessToJobObject, CreateJobObjectW, JobObjectExtendedLimitInformation,
    SetInformationJobObject, TerminateJobObject, JOBOBJECT_EXTENDED_LIMIT_INFORMATION,
    JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE,
};

/// Exit code reported for processes terminated through the job object.
const KILLED_EXIT_CODE: u32 = 1;

/// A job object holding the child and everything it spawns. The job is
/// created with kill-on-close, so closing the last handle terminates the
/// whole tree as well.
#[derive(Debug)]
pub struct ProcessGroup {
    job: HANDLE,
}

// The job handle is only closed on drop and the Win32 job calls are thread safe.
unsafe impl Send for ProcessGroup {}
unsafe impl Sync for ProcessGroup {}

impl ProcessGroup {
    pub fn spawn(command: &mut Command) -> io::Result<(Child, Self)> {
        let group = Self::create()?;
        let mut child = command.spawn()?;

        let handle = match child.raw_handle() {
            Some(handle) => handle as HANDLE,
            None => return Err(io::Error::other("child exited before joining its job")),
        };

        if unsafe { AssignProcessToJobObject(group.job, handle) } == 0 {
            let err = io::Error::last_os_error();
            let _ = child.start_kill();
            return Err(err);
        }

        Ok((child, group))
    }

    fn create() -> io::Result<Self> {
        let job = unsafe { CreateJobObjectW(std::ptr::null(), std::ptr::null()) };
        if job.is_null() {
            return Err(io::Error::last_os_error());
        }
        let group = Self { job };

        let mut info: JOBOBJECT_EXTENDED_LIMIT_INFORMATION = unsafe { std::mem::zeroed() };
        info.BasicLimitInformation.LimitFlags = JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE;

        let ok = unsafe {
            SetInformationJobObject(
                group.job,
                JobObjectExtendedLimitInformation,
                &info as *const JOBOBJECT_EXTENDED_LIMIT_INFORMATION as *const c_void,
                std::mem::size_of::<JOBOBJECT_EXTENDED_LIMIT_INFORMATION>() as u32,
            )
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(group)
    }

    pub fn id(&self) -> u32 {
        self.job as usize as u32
    }

    /// Terminates every process assigned to the job.
    pub fn kill_all(&self) -> io::Result<()> {
        debug!("Terminating job object");
        if unsafe { TerminateJobObject(self.job, KILLED_EXIT_CODE) } == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub fn dispose(self) {}
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        unsafe {
            CloseHandle(self.job);
        }
    }
}
