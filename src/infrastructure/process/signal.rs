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

//! Signals that cancel a supervised child.
//!
//! Handlers are registered up front so a signal delivered between spawning
//! the child and starting the listener task is not lost.

// Unix-specific signal handling
#[cfg(unix)]
mod platform {
    use std::io;

    use tokio::signal::unix::{signal, Signal, SignalKind};

    pub struct CancellationSignals {
        interrupt: Signal,
        terminate: Signal,
    }

    impl CancellationSignals {
        pub fn register() -> io::Result<Self> {
            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }

        /// Waits for SIGINT or SIGTERM and returns its name.
        pub async fn recv(&mut self) -> &'static str {
            tokio::select! {
                _ = self.interrupt.recv() => "SIGINT",
                _ = self.terminate.recv() => "SIGTERM",
            }
        }
    }
}

// Windows-specific signal handling
#[cfg(windows)]
mod platform {
    use std::io;

    use tokio::signal::windows::{ctrl_c, CtrlC};

    pub struct CancellationSignals {
        ctrl_c: CtrlC,
    }

    impl CancellationSignals {
        pub fn register() -> io::Result<Self> {
            Ok(Self { ctrl_c: ctrl_c()? })
        }

        /// Waits for Ctrl-C, the closest Windows has to SIGINT.
        pub async fn recv(&mut self) -> &'static str {
            self.ctrl_c.recv().await;
            "CTRL_C"
        }
    }
}

pub use platform::CancellationSignals;
