// Configuration module entry point
// Loads the vanity path mapping and server settings, and holds the shared runtime state

mod state;
mod types;

use config::builder::{ConfigBuilder, DefaultState};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::routing::RouteTable;
use types::PathsSection;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PathConfig};

/// Default config file name (`.yaml` or `.yml` is appended when missing)
pub const DEFAULT_CONFIG_PATH: &str = "config";

const YAML_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

impl Config {
    /// Load configuration from the specified YAML file (extension optional)
    /// and `VANITY_*` environment overrides
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let path = resolve_config_file(config_path);
        let yaml = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let builder = with_defaults(config::Config::builder())?
            .add_source(config::File::from_str(&yaml, config::FileFormat::Yaml))
            .add_source(
                config::Environment::with_prefix("VANITY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::finish(builder, &yaml)
    }

    /// Parse an in-memory YAML document with the same defaults as `load_from`
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let builder = with_defaults(config::Config::builder())?
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml));
        Self::finish(builder, yaml)
    }

    /// Deserialize the layered settings, then take `paths` from the document
    /// itself with its keys untouched
    fn finish(builder: ConfigBuilder<DefaultState>, yaml: &str) -> Result<Self, ConfigError> {
        let mut cfg: Self = builder.build()?.try_deserialize()?;
        if !yaml.trim().is_empty() {
            let section: PathsSection = serde_yaml::from_str(yaml)?;
            cfg.paths = section.paths.unwrap_or_default();
        }
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| ConfigError::InvalidAddress(format!("{addr}: {e}")))
    }

    /// Build the immutable route table from the configured paths
    pub fn route_table(&self) -> Result<RouteTable, ConfigError> {
        RouteTable::build(&self.paths, self.cache_max_age)
    }
}

/// "config" -> "config.yaml" (or "config.yml" if only that exists)
fn resolve_config_file(config_path: &str) -> PathBuf {
    let path = Path::new(config_path);
    if path.extension().is_some() {
        return path.to_path_buf();
    }
    YAML_EXTENSIONS
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| path.with_extension(YAML_EXTENSIONS[0]))
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("performance.keep_alive", true)?
        .set_default("performance.request_timeout", 30)
}
