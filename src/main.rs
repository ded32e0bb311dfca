//! Task List Server
//!
//! Serves the task REST API and the browser client.

use anyhow::Result;
use clap::Parser;
use task_list_server::api::start_server;
use task_list_server::cli::Cli;
use task_list_server::config::ConfigLoader;
use task_list_server::db::Database;
use task_list_server::logging::{self, LogTarget};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut loader = ConfigLoader::load(cli.config.as_deref())?;
    if let Some(path) = loader.config_path() {
        info!("Config file: {}", path.display());
    }
    cli.apply_overrides(loader.config_mut());
    let config = loader.into_config();
    config.validate()?;

    info!("Starting Task List Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {:?}", config.database.path);
    info!("Pool size: {}", config.database.pool_size);
    info!("Public dir: {:?}", config.server.public_dir);

    if !config.server.public_dir.join("index.html").exists() {
        warn!(
            "No index.html in {:?}; the client page will not be served",
            config.server.public_dir
        );
    }

    // Without a store there is nothing to serve; exit and let the supervisor
    // restart us.
    let db = match Database::open(&config.database.path, config.database.pool_size) {
        Ok(db) => db,
        Err(e) => {
            error!("Error connecting to DB or creating table: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut server = start_server(db.clone(), &config.server).await?;

    let stopped_early = tokio::select! {
        _ = shutdown_signal() => false,
        result = server.stopped() => {
            if let Err(e) = &result {
                error!("Server stopped: {:#}", e);
            }
            result?;
            true
        }
    };

    if !stopped_early {
        info!("Shutdown signal received");
        server.shutdown().await?;
    }
    db.close();

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
