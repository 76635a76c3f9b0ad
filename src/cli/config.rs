use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::{
    form::form_model::FieldIds,
    search::client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_MS},
};

pub const DEFAULT_CONFIG_FILE: &str = "geoadmin-autocomplete.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "geoadmin-autocomplete",
    version,
    about = "Swiss address autocomplete backed by the geo.admin.ch search service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Search service endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Path to config file (default: geoadmin-autocomplete.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search addresses and print the suggestion rows
    Lookup {
        /// Free-text address fragment
        #[arg(long)]
        query: String,
    },

    /// Type a query into an in-memory form, pick a suggestion, print the fields
    Fill {
        /// Free-text address fragment
        #[arg(long)]
        query: String,

        /// Index of the suggestion to select
        #[arg(long, default_value_t = 0)]
        pick: usize,
    },

    /// Resolve the building id (EGID) of a full address
    Egid {
        #[arg(long)]
        street: String,

        #[arg(long)]
        postal_code: String,

        #[arg(long)]
        locality: String,
    },

    /// Serve the widget over NDJSON on stdin/stdout
    Bridge,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `geoadmin-autocomplete.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fields: FieldIds,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    /// JSONL file receiving controller transitions
    pub path: Option<PathBuf>,
}

// Serde default helpers
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_timeout_ms() -> u64 { DEFAULT_TIMEOUT_MS }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Resolve the endpoint: CLI flag > config file > default.
pub fn resolve_endpoint(cli_endpoint: Option<&str>, config: &AppConfig) -> String {
    cli_endpoint
        .map(str::to_string)
        .unwrap_or_else(|| config.search.endpoint.clone())
}

/// Default log filter for a `-v` count; `RUST_LOG` still wins.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
