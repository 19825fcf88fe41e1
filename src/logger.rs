//! Logger module
//!
//! Console logging for the dev server: startup banner, access log with
//! compression markers, error and warning output. Logging is fire-and-forget;
//! nothing here can fail a response.

use chrono::Local;
use hyper::Version;
use std::net::SocketAddr;
use std::path::Path;

/// Access log entry for a single request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client socket address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: &'static str,
    /// Response status code
    pub status: u16,
}

impl AccessLogEntry {
    /// Create an entry with the current timestamp
    pub fn new(
        remote_addr: String,
        method: String,
        path: String,
        version: Version,
        status: u16,
    ) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            http_version: http_version_str(version),
            status,
        }
    }

    /// Marker highlighting requests served from a compressed variant
    pub fn compression_marker(&self) -> &'static str {
        if self.path.contains(".br") {
            " [Brotli]"
        } else if self.path.contains(".gz") {
            " [Gzip]"
        } else {
            ""
        }
    }

    /// Format the entry according to the configured format
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            _ => self.format_plain(),
        }
    }

    /// `[Server] $remote_addr - "$request" $status [Brotli]`
    fn format_plain(&self) -> String {
        format!(
            "[Server] {} - \"{} {} HTTP/{}\" {}{}",
            self.remote_addr,
            self.method,
            self.path,
            self.http_version,
            self.status,
            self.compression_marker(),
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        // Manual JSON building to avoid a serde dependency for this
        let encoding = match self.compression_marker() {
            " [Brotli]" => "\"br\"",
            " [Gzip]" => "\"gzip\"",
            _ => "null",
        };
        format!(
            r#"{{"remote_addr":"{}","time":"{}","method":"{}","path":"{}","http_version":"{}","status":{},"encoding":{}}}"#,
            escape_json(&self.remote_addr),
            self.time.to_rfc3339(),
            escape_json(&self.method),
            escape_json(&self.path),
            self.http_version,
            self.status,
            encoding,
        )
    }
}

fn http_version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
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

/// Log a formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    println!("{}", entry.format(format));
}

pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    println!("============================================================");
    println!("Unity WebGL Dev Server with Brotli Support");
    println!("============================================================");
    println!("Server Address: http://{addr}");
    println!("Serving from:   {}", root.display());
    println!();
    println!("Features:");
    println!("  - Brotli compression (.br) with Content-Encoding header");
    println!("  - Gzip compression (.gz) with Content-Encoding header");
    println!("  - CORS enabled for local development");
    println!("  - Proper MIME types for Unity files");
    println!();
    println!("Press Ctrl+C to stop the server");
    println!("============================================================");
    println!();
}

pub fn log_shutdown() {
    println!("\nServer stopped.");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_for(path: &str) -> AccessLogEntry {
        AccessLogEntry::new(
            "127.0.0.1:54321".to_string(),
            "GET".to_string(),
            path.to_string(),
            Version::HTTP_11,
            200,
        )
    }

    #[test]
    fn test_compression_markers() {
        assert_eq!(entry_for("/game.wasm.br").compression_marker(), " [Brotli]");
        assert_eq!(entry_for("/main.js.gz").compression_marker(), " [Gzip]");
        assert_eq!(entry_for("/index.html").compression_marker(), "");
    }

    #[test]
    fn test_format_plain() {
        let formatted = entry_for("/game.wasm.br").format("plain");
        assert_eq!(
            formatted,
            "[Server] 127.0.0.1:54321 - \"GET /game.wasm.br HTTP/1.1\" 200 [Brotli]"
        );
    }

    #[test]
    fn test_format_json() {
        let formatted = entry_for("/main.js.gz").format("json");
        assert!(formatted.starts_with('{') && formatted.ends_with('}'));
        assert!(formatted.contains(r#""path":"/main.js.gz""#));
        assert!(formatted.contains(r#""encoding":"gzip""#));
        assert!(formatted.contains(r#""status":200"#));
    }

    #[test]
    fn test_json_escaping() {
        let entry = entry_for("/has\"quote");
        assert!(entry.format("json").contains(r#"/has\"quote"#));
    }
}
