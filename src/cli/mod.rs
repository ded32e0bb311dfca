//! CLI definitions for task-list-server.
//!
//! Every flag is optional and overrides the matching configuration value.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Task list REST server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Number of pooled database connections (overrides config)
    #[arg(long)]
    pub pool_size: Option<usize>,

    /// Listen address (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory with the client assets (overrides config)
    #[arg(long)]
    pub public_dir: Option<PathBuf>,

    /// Allow cross-origin API requests from any origin
    #[arg(long)]
    pub cors: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,
}

impl Cli {
    /// Apply flag overrides on top of loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }
        if let Some(pool_size) = self.pool_size {
            config.database.pool_size = pool_size;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(public_dir) = &self.public_dir {
            config.server.public_dir = public_dir.clone();
        }
        if self.cors {
            config.server.cors = true;
        }
    }
}
