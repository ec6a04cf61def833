//! `neon version`

use clap::{Args, ValueEnum};

use super::display::{TableRenderer, VersionInfo};
use crate::infrastructure::constants::{EXIT_SUCCESS, HELM_VERSION, NEON_CLI_VERSION};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Args, Debug, Clone, Default)]
pub struct VersionCommand {
    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl VersionCommand {
    pub fn versions() -> VersionInfo {
        VersionInfo {
            plugin: env!("CARGO_PKG_VERSION").to_string(),
            neon_cli: NEON_CLI_VERSION.to_string(),
            helm: HELM_VERSION.to_string(),
        }
    }

    pub fn render(&self) -> anyhow::Result<String> {
        let versions = Self::versions();
        let output = match self.output {
            OutputFormat::Table => TableRenderer::new().render_versions(&versions),
            OutputFormat::Json => serde_json::to_string_pretty(&versions)?,
            OutputFormat::Yaml => serde_yaml::to_string(&versions)?,
        };
        Ok(output)
    }

    pub async fn execute(&self) -> anyhow::Result<i32> {
        println!("{}", self.render()?.trim_end());
        Ok(EXIT_SUCCESS)
    }
}
