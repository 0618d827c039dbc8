// Application state module
// Holds the immutable route table shared by every request handler

use super::types::{Config, LoggingConfig, PerformanceConfig};
use crate::error::ConfigError;
use crate::routing::RouteTable;

/// Application state
///
/// Built once at startup and shared through an `Arc`; nothing in it is
/// mutated afterwards, so handlers read it without locking.
#[derive(Debug)]
pub struct AppState {
    /// Configured import host; empty means "use the request Host header"
    pub host: String,
    pub docs_base: String,
    pub routes: RouteTable,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

impl AppState {
    /// Build state from configuration; fails without producing a table on invalid input
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            host: config.host.clone(),
            docs_base: config.docs_base.trim_end_matches('/').to_string(),
            routes: config.route_table()?,
            logging: config.logging.clone(),
            performance: config.performance.clone(),
        })
    }

    /// Host used to qualify import paths for one request
    pub fn import_host<'a>(&'a self, request_host: &'a str) -> &'a str {
        if self.host.is_empty() {
            request_host
        } else {
            &self.host
        }
    }
}
