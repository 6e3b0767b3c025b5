//! Configuration management for Drop Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default upper bound for a single upload request body: 500MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Flat directory holding every stored file
    pub root: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                root: PathBuf::from("uploads"),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", env::var("SERVER_PORT").ok())?
                    .unwrap_or(defaults.server.port),
            },
            storage: StorageConfig {
                root: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.root),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", env::var("MAX_UPLOAD_BYTES").ok())?
                    .unwrap_or(defaults.storage.max_upload_bytes),
            },
        })
    }

    /// Host and port handed to the listener; hostnames are resolved at bind time
    pub fn bind_target(&self) -> (&str, u16) {
        (self.server.host.as_str(), self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}
