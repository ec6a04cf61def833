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

/// Lock state reported by `neon-cli cluster islocked` through its exit code:
/// 0=locked, 1=fetch error, 2=unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Locked,
    FetchFailed,
    Unlocked,
}

impl LockStatus {
    pub const LOCKED_EXIT_CODE: i32 = 0;
    pub const FETCH_FAILED_EXIT_CODE: i32 = 1;
    pub const UNLOCKED_EXIT_CODE: i32 = 2;

    pub fn from_exit_code(code: i32) -> Option<Self> {
        match code {
            Self::LOCKED_EXIT_CODE => Some(Self::Locked),
            Self::FETCH_FAILED_EXIT_CODE => Some(Self::FetchFailed),
            Self::UNLOCKED_EXIT_CODE => Some(Self::Unlocked),
            _ => None,
        }
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::FetchFailed => write!(f, "unknown (lock status request failed)"),
            Self::Unlocked => write!(f, "unlocked"),
        }
    }
}
