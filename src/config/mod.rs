//! Configuration module for the campus resources backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Invalid environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.key, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite snapshot database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Write snapshots to SQLite; when false the store lives in memory only
    pub persist: bool,
    /// Populate the store with built-in mock data when nothing could be loaded
    pub seed: bool,
    /// Upper bound for loading the snapshot at startup
    pub read_timeout: Duration,
    /// Upper bound for writing a snapshot after a mutation
    pub write_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("CAMPUS_DB_PATH")
            .unwrap_or_else(|_| "./data/campus.sqlite".to_string())
            .into();

        let bind_addr = parse_var("CAMPUS_BIND_ADDR", "127.0.0.1:8080")?;
        let log_level = env::var("CAMPUS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = parse_var("CAMPUS_LOG_FORMAT", "pretty")?;
        let persist = parse_var("CAMPUS_PERSIST", "true")?;
        let seed = parse_var("CAMPUS_SEED", "true")?;
        let read_timeout = Duration::from_secs(parse_var("CAMPUS_READ_TIMEOUT_SECS", "5")?);
        let write_timeout = Duration::from_secs(parse_var("CAMPUS_WRITE_TIMEOUT_SECS", "10")?);

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_format,
            persist,
            seed,
            read_timeout,
            write_timeout,
        })
    }
}

fn parse_var<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        message: format!("'{}' ({})", raw, e),
    })
}
