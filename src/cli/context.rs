//! Shared state handed to every command

use std::ffi::OsString;
use std::sync::Arc;

use crate::domain::{LocatorConfig, Tool};
use crate::infrastructure::{ExecutableLocator, Invocation, LaunchMode, Launcher, ProcessLauncher};
use crate::shared::Result;

pub struct CommandContext {
    locator: ExecutableLocator,
    launcher: Arc<dyn Launcher>,
}

impl CommandContext {
    pub fn new(locator: ExecutableLocator, launcher: Arc<dyn Launcher>) -> Self {
        Self { locator, launcher }
    }

    /// Context for a real run: locator configured from the environment,
    /// launching actual processes.
    pub fn from_env() -> Self {
        Self::new(
            ExecutableLocator::new(LocatorConfig::from_env()),
            Arc::new(ProcessLauncher),
        )
    }

    /// Locates `tool` and runs it with `args`, returning the exit code to
    /// terminate with. Nothing is launched when the tool can't be located.
    pub async fn run<I, S>(&self, tool: Tool, args: I, mode: LaunchMode) -> Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let executable = self.locator.locate(tool).await?;
        self.launcher
            .launch(Invocation::new(executable, args, mode))
            .await
    }

    pub async fn run_neon_cli(&self, args: Vec<String>, mode: LaunchMode) -> Result<i32> {
        self.run(Tool::NeonCli, args, mode).await
    }
}
