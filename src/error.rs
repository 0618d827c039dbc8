//! Error types
//!
//! Configuration errors are fatal to startup; render errors are scoped to a
//! single request and surface as a 500.

use thiserror::Error;

/// Invalid or unloadable configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid paths section: {0}")]
    Paths(#[from] serde_yaml::Error),

    #[error("cache_max_age cannot be negative (got {0})")]
    NegativeCacheAge(i64),

    #[error("path {0:?} is configured more than once")]
    DuplicatePath(String),

    #[error("invalid listen address: {0}")]
    InvalidAddress(String),
}

/// Failure while building a response page
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to build response: {0}")]
    Response(#[from] hyper::http::Error),
}
