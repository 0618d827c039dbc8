//! Logger module
//!
//! Logging helpers for the vanity server:
//! - Server lifecycle logging
//! - Access logging in several formats
//! - Error, warning and debug logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::routing::RouteTable;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
        config.level.eq_ignore_ascii_case("debug"),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Vanity import server started");
    write_info(&format!("Listening on: http://{addr}"));
    if config.host.is_empty() {
        write_info("Import host: taken from request Host header");
    } else {
        write_info(&format!("Import host: {}", config.host));
    }
    write_info(&format!("Docs base: {}", config.docs_base));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

/// Log the loaded route table
pub fn log_route_table(table: &RouteTable) {
    write_info(&format!(
        "[CONFIG] {} vanity path(s), Cache-Control: {}",
        table.len(),
        table.cache_control()
    ));
    if table.is_empty() {
        log_warning("No vanity paths configured; only the index page will be served");
    }
    for route in table.routes() {
        log_debug(&format!(
            "route {:?} -> {} {} (branch {})",
            route.path, route.vcs, route.repo, route.branch
        ));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Debug lines are dropped unless `logging.level` is "debug"
pub fn log_debug(message: &str) {
    if writer::get().is_some_and(writer::LogWriter::debug_enabled) {
        write_info(&format!("[DEBUG] {message}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

pub fn log_shutdown() {
    write_info("[Shutdown] Signal received, no longer accepting connections");
}
