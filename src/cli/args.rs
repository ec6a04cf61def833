//! Builder for the argument vector handed to neon-cli

use crate::infrastructure::constants::DEFAULT_CLUSTER_DEPLOY_PARALLEL;
use crate::shared::{NeonError, Result};

/// Arguments in the order neon-cli receives them: command tokens, then the
/// positional argument, then flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeonCliArgs(Vec<String>);

impl NeonCliArgs {
    pub fn command(tokens: &[&str]) -> Self {
        Self(tokens.iter().map(|t| t.to_string()).collect())
    }

    pub fn positional(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.0.push(value.to_string());
        }
        self
    }

    /// Like [`positional`](Self::positional) but fails before anything is
    /// launched when the argument is missing.
    pub fn required(self, value: Option<&str>, name: &'static str) -> Result<Self> {
        match value {
            Some(value) => Ok(self.positional(Some(value))),
            None => Err(NeonError::MissingArgument(name)),
        }
    }

    /// `--name` when enabled
    pub fn switch(mut self, name: &str, enabled: bool) -> Self {
        if enabled {
            self.0.push(format!("--{}", name));
        }
        self
    }

    /// `--name=value` when a non-empty value is present
    pub fn value(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.0.push(format!("--{}={}", name, value));
        }
        self
    }

    /// Flags whose value is optional: a bare `--name` when given without a
    /// value, `--name=value` for a non-empty value, nothing otherwise.
    pub fn optional_value(mut self, name: &str, value: Option<Option<&str>>) -> Self {
        match value {
            Some(None) => self.0.push(format!("--{}", name)),
            Some(Some(value)) if !value.is_empty() => {
                self.0.push(format!("--{}={}", name, value))
            }
            _ => {}
        }
        self
    }

    /// `--max-parallel=N`, only when it differs from neon-cli's default
    pub fn max_parallel(mut self, max_parallel: u32) -> Self {
        if max_parallel != DEFAULT_CLUSTER_DEPLOY_PARALLEL {
            self.0.push(format!("--max-parallel={}", max_parallel));
        }
        self
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
