//! Configuration types.

use crate::db::DEFAULT_POOL_SIZE;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Check values that deserialize fine but cannot be served.
    pub fn validate(&self) -> Result<()> {
        if self.database.pool_size == 0 {
            bail!("database.pool_size must be at least 1");
        }
        if self.server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0).
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `index.html` and the client assets.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Allow cross-origin API calls from any origin.
    #[serde(default)]
    pub cors: bool,
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            cors: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Number of pooled connections (default: 10).
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_size: default_pool_size(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("tasks.db")
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}
