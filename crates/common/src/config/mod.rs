//! Configuration management for Table Desk services
//!
//! Supports loading configuration from:
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Environment variables (prefixed with APP__)
//! - The flat deployment variables (PORT, DB_USER, DB_PASS, ...)
//! - Default values

use crate::errors::{AppError, Result};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Static asset directories
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts
    pub url: Option<String>,

    /// URL scheme used when assembling from parts
    #[serde(default = "default_db_scheme")]
    pub scheme: String,

    pub user: Option<String>,

    pub password: Option<String>,

    /// Host, optionally with `:port`
    pub host: Option<String>,

    /// Database (schema) name
    pub name: Option<String>,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Directory served under `/pdf`
    #[serde(default = "default_pdfs_path")]
    pub pdfs_path: PathBuf,

    /// Directory served under `/jpg`
    #[serde(default = "default_jpgs_path")]
    pub jpgs_path: PathBuf,

    /// Built single-page client
    #[serde(default = "default_client_path")]
    pub client_path: PathBuf,

    /// Document served for paths the client routes itself
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Prometheus exporter port (0 to disable)
    #[serde(default)]
    pub metrics_port: u16,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_db_scheme() -> String { "mysql".to_string() }
fn default_max_connections() -> u32 { 12 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 300 }
fn default_pdfs_path() -> PathBuf { PathBuf::from("./pdf_files") }
fn default_jpgs_path() -> PathBuf { PathBuf::from("./jpg_tables") }
fn default_client_path() -> PathBuf { PathBuf::from("./client/build") }
fn default_index_file() -> String { "index.html".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }

/// Flat variables used by existing deployments, mapped onto config keys
const LEGACY_ENV: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("DB_USER", "database.user"),
    ("DB_PASS", "database.password"),
    ("DB_HOST", "database.host"),
    ("DB_DATABASE", "database.name"),
    ("PDFS_PATH", "assets.pdfs_path"),
    ("JPGS_PATH", "assets.jpgs_path"),
    ("CLIENT_PATH", "assets.client_path"),
];

impl AppConfig {
    /// Load configuration from files and the process environment
    pub fn load() -> std::result::Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }
}

impl DatabaseConfig {
    /// Connection URL, either given verbatim or assembled from its parts
    ///
    /// User and password are inserted as-is, not percent-encoded. A password
    /// containing `@`, `:`, `/` or `%` must be given through `DATABASE_URL`
    /// (`database.url`) in encoded form instead.
    pub fn connection_url(&self) -> Result<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }

        let host = required(&self.host, "database.host (DB_HOST)")?;
        let name = required(&self.name, "database.name (DB_DATABASE)")?;

        let credentials = match (self.user.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !password.is_empty() => format!("{}:{}@", user, password),
            (Some(user), _) if !user.is_empty() => format!("{}@", user),
            _ => String::new(),
        };

        Ok(format!("{}://{}{}/{}", self.scheme, credentials, host, name))
    }

    /// Get connect timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Configuration {
            message: format!("missing {}", key),
        })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            scheme: default_db_scheme(),
            user: None,
            password: None,
            host: None,
            name: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            pdfs_path: default_pdfs_path(),
            jpgs_path: default_jpgs_path(),
            client_path: default_client_path(),
            index_file: default_index_file(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: 0,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            assets: AssetsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}
