// Configuration module
// Typed settings loaded from config.toml / environment, plus shared state

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub files: FilesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format: "plain" or "json"
    pub format: String,
}

/// Static file configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Document root; defaults to the process working directory
    #[serde(default)]
    pub root: Option<String>,
    pub index_files: Vec<String>,
}

impl Config {
    /// Load configuration from "config.toml" (if present) and `SERVER_*`
    /// environment variables, falling back to built-in defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("logging.access_log", true)?
            .set_default("logging.format", "plain")?
            .set_default("files.index_files", vec!["index.html", "index.htm"])?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Shared per-request state: configuration plus the resolved document root.
/// Read-only after startup, so a plain `Arc<AppState>` needs no locking.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the document root from config, defaulting to the current
    /// working directory.
    pub fn new(config: Config) -> std::io::Result<Self> {
        let root = match config.files.root.as_deref() {
            Some(dir) => PathBuf::from(dir).canonicalize()?,
            None => std::env::current_dir()?,
        };
        Ok(Self { config, root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from("nonexistent-config").unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.format, "plain");
        assert_eq!(cfg.files.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.files.root.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("nonexistent-config").unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
    }
}
