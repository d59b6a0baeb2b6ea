//! Output format selection for CLI commands.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How CLI commands render their JSON payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Compact single-line JSON (machine friendly).
    #[default]
    Json,
    /// Indented JSON.
    Pretty,
}

impl OutputFormat {
    /// Render a serializable value in this format.
    pub fn render<T: Serialize>(self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        }
    }
}
