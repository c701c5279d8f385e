//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `DRONEDESK_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::events::{StoreBackend, DEFAULT_EVENT_KEY};
use crate::fleet::FleetConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fleet: FleetSection,

    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fleet service connection
#[derive(Debug, Clone, Deserialize)]
pub struct FleetSection {
    #[serde(default = "default_fleet_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_fleet_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

impl Default for FleetSection {
    fn default() -> Self {
        Self {
            url: default_fleet_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl FleetSection {
    pub fn client_config(&self) -> FleetConfig {
        FleetConfig {
            base_url: self.url.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Event log storage
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_event_key")]
    pub key: String,

    /// Byte limit for the memory backend
    pub quota_bytes: Option<usize>,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("dronedesk").to_string_lossy().to_string())
        .unwrap_or_else(|| "./dronedesk_data".to_string())
}

fn default_event_key() -> String {
    DEFAULT_EVENT_KEY.to_string()
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: default_data_dir(),
            key: default_event_key(),
            quota_bytes: None,
        }
    }
}

impl EventsConfig {
    /// Data directory with a leading `~` expanded
    pub fn data_path(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }
}

/// Dashboard HTTP server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_follow_up_secs")]
    pub follow_up_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_follow_up_secs() -> u64 {
    3
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn follow_up_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.follow_up_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            follow_up_secs: default_follow_up_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("dronedesk").join("config.toml")),
            Some(PathBuf::from("/etc/dronedesk/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("DRONEDESK_FLEET_URL") {
            self.fleet.url = url;
        }

        if let Some(data_dir) = var("DRONEDESK_DATA_DIR") {
            self.events.data_dir = data_dir;
        }
        if let Some(backend) = var("DRONEDESK_EVENT_BACKEND") {
            match backend.parse() {
                Ok(b) => self.events.backend = b,
                Err(e) => tracing::warn!("Ignoring DRONEDESK_EVENT_BACKEND: {}", e),
            }
        }

        if let Some(host) = var("DRONEDESK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("DRONEDESK_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring DRONEDESK_PORT={}", port),
            }
        }

        if let Some(level) = var("DRONEDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("DRONEDESK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# DroneDesk Configuration
#
# Environment variables override these settings:
# - DRONEDESK_FLEET_URL
# - DRONEDESK_DATA_DIR
# - DRONEDESK_EVENT_BACKEND
# - DRONEDESK_HOST
# - DRONEDESK_PORT
# - DRONEDESK_LOG_LEVEL
# - DRONEDESK_LOG_FORMAT

[fleet]
# Fleet service base URL, including the API prefix
url = "http://localhost:8080/api/v1"

# Per-request timeout (ms)
request_timeout_ms = 30000

[events]
# Event store: memory, file or sqlite
backend = "file"

# Directory for the event log
data_dir = "~/.local/share/dronedesk"

# Storage key of the event log
key = "eventMessages"

# Byte limit for the memory backend
# quota_bytes = 5242880

[server]
# Dashboard server host
host = "0.0.0.0"

# Dashboard server port
port = 8090

# Allowed CORS origins (empty allows any)
cors_origins = []

# Delay before showing idle drones after a registration (seconds)
follow_up_secs = 3

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fleet.url, "http://localhost:8080/api/v1");
        assert_eq!(config.events.backend, StoreBackend::File);
        assert_eq!(config.events.key, "eventMessages");
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.fleet.request_timeout_ms, 30_000);
        assert_eq!(config.events.data_dir, "~/.local/share/dronedesk");
        assert_eq!(config.server.follow_up_secs, 3);
        assert!(config.events.quota_bytes.is_none());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
            [events]
            backend = "sqlite"
            "#,
        )
        .unwrap();
        assert_eq!(config.events.backend, StoreBackend::Sqlite);
        assert_eq!(config.events.key, "eventMessages");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_data_path_expands_home() {
        let events = EventsConfig {
            data_dir: "~/.local/share/dronedesk".to_string(),
            ..Default::default()
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(events.data_path(), home.join(".local/share/dronedesk"));
        }

        let events = EventsConfig {
            data_dir: "/var/lib/dronedesk".to_string(),
            ..Default::default()
        };
        assert_eq!(events.data_path(), PathBuf::from("/var/lib/dronedesk"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DRONEDESK_FLEET_URL", "http://fleet:9000/api/v1"),
            ("DRONEDESK_EVENT_BACKEND", "memory"),
            ("DRONEDESK_PORT", "9999"),
            ("DRONEDESK_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.fleet.url, "http://fleet:9000/api/v1");
        assert_eq!(config.events.backend, StoreBackend::Memory);
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| match k {
            "DRONEDESK_PORT" => Some("not-a-port".to_string()),
            "DRONEDESK_EVENT_BACKEND" => Some("redis".to_string()),
            _ => None,
        });
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.events.backend, StoreBackend::File);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fleet]\nurl = \"http://10.0.0.2:8080/api/v1\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.fleet.client_config().base_url, "http://10.0.0.2:8080/api/v1");

        std::fs::write(&path, "[fleet\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
