// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Host used to qualify import paths; empty means "use the request Host header"
    #[serde(default)]
    pub host: String,
    /// `Cache-Control` max-age for vanity pages, in seconds
    #[serde(default)]
    pub cache_max_age: Option<i64>,
    /// Documentation viewer that browsers are redirected to
    #[serde(default = "default_docs_base")]
    pub docs_base: String,
    /// Vanity path -> repository mapping, filled from the raw YAML so key
    /// case survives (the `config` crate lowercases keys)
    #[serde(skip)]
    pub paths: BTreeMap<String, PathConfig>,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// The `paths` section on its own, read straight from the YAML document
#[derive(Debug, Deserialize, Default)]
pub struct PathsSection {
    #[serde(default)]
    pub paths: Option<BTreeMap<String, PathConfig>>,
}

/// Repository metadata for one vanity path
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PathConfig {
    pub repo: String,
    #[serde(default)]
    pub vcs: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_docs_base() -> String {
    "https://pkg.go.dev".to_string()
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// debug, info, warn or error
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Connection handling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Per-connection timeout in seconds
    pub request_timeout: u64,
    pub max_connections: Option<u64>,
}
