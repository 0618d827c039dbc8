//! Access log format module
//!
//! Supports:
//! - `combined` (Apache/Nginx combined-style line, with the Host header in place of the referer)
//! - `common` (Common Log Format - CLF)
//! - `json` (one object per line)

use chrono::Local;

/// One served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client address
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Host header as sent by the client
    pub host: String,
    /// e.g. "HTTP/1.1"
    pub http_version: String,
    pub status: u16,
    pub body_bytes: u64,
    /// Handling time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry stamped with the current time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            host: String::new(),
            http_version: "HTTP/1.1".to_string(),
            status: 200,
            body_bytes: 0,
            request_time_us: 0,
        }
    }

    /// Format the entry; unknown format names fall back to `combined`
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "json" => self.format_json(),
            _ => self.format_combined(),
        }
    }

    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} {}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn format_combined(&self) -> String {
        let host = if self.host.is_empty() { "-" } else { self.host.as_str() };
        format!("{} \"{host}\" {}us", self.format_common(), self.request_time_us)
    }

    fn format_json(&self) -> String {
        format!(
            r#"{{"remote_addr":"{}","time":"{}","method":"{}","path":"{}","host":"{}","http_version":"{}","status":{},"body_bytes":{},"request_time_us":{}}}"#,
            escape_json(&self.remote_addr),
            self.time.to_rfc3339(),
            escape_json(&self.method),
            escape_json(&self.path),
            escape_json(&self.host),
            escape_json(&self.http_version),
            self.status,
            self.body_bytes,
            self.request_time_us,
        )
    }
}

/// Escape special characters for JSON string
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
