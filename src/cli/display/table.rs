//! Table rendering for CLI output

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

/// Versions reported by `neon version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub plugin: String,
    pub neon_cli: String,
    pub helm: String,
}

/// Table renderer for formatted output
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer;

impl TableRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the component versions as a two column table
    pub fn render_versions(&self, versions: &VersionInfo) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("COMPONENT").set_alignment(CellAlignment::Left),
                Cell::new("VERSION").set_alignment(CellAlignment::Left),
            ]);

        for (component, version) in [
            ("neon", &versions.plugin),
            ("neon-cli", &versions.neon_cli),
            ("helm", &versions.helm),
        ] {
            table.add_row(vec![
                Cell::new(component).fg(Color::Cyan),
                Cell::new(version),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{}\n",
            "NEONKUBE kubectl plugin".bold()
        ));
        output.push_str(&table.to_string());
        output
    }
}
