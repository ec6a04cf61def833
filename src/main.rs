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

use neon_kubectl::cli::display::error_line;
use neon_kubectl::cli::{CliArgs, CommandContext};
use neon_kubectl::infrastructure::constants::EXIT_COMMAND_ERROR;
use neon_kubectl::infrastructure::logging;
use neon_kubectl::NeonError;

#[tokio::main]
async fn main() {
    logging::init();

    let args = CliArgs::parse_args(std::env::args_os());
    let context = CommandContext::from_env();

    match args.command.execute(&context).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("{}", error_line(&format!("{:#}", err)));

            match err.downcast_ref::<NeonError>().map(NeonError::exit_code) {
                Some(Some(exit_code)) => std::process::exit(exit_code),
                // Child status unknown
                Some(None) => std::process::abort(),
                None => std::process::exit(EXIT_COMMAND_ERROR),
            }
        }
    }
}
