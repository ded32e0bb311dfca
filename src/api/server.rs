//! Router assembly and server lifecycle.

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, put};
use std::net::SocketAddr;
use std::path::Path;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::ServerConfig;
use crate::db::Database;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

/// Build the full application router.
///
/// `/api` is a nested router with its own JSON 404 and 405, so it never falls
/// through to the static files. Every other path is a file from `public_dir` when one
/// exists, otherwise `index.html`.
pub fn build_router(state: AppState, public_dir: &Path, cors: bool) -> Router {
    let mut api = Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::api_not_found)
        .method_not_allowed_fallback(handlers::api_method_not_allowed)
        .with_state(state);

    if cors {
        api = api.layer(CorsLayer::permissive());
    }

    let index = public_dir.join("index.html");
    let static_files = ServeDir::new(public_dir).fallback(ServeFile::new(index));

    Router::new()
        .nest("/api", api)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
}

/// A running server. Dropping the handle also triggers graceful shutdown.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl ServerHandle {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Resolves when the server stops on its own (listener error).
    pub async fn stopped(&mut self) -> Result<()> {
        if let Some(task) = self.task.as_mut() {
            let result = task.await;
            self.task = None;
            result??;
        }
        Ok(())
    }

    /// Stop accepting connections, let in-flight requests finish, and wait.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await??;
        }
        Ok(())
    }
}

/// Bind the listener and start serving in a background task.
pub async fn start_server(db: Database, config: &ServerConfig) -> Result<ServerHandle> {
    let app = build_router(AppState::new(db), &config.public_dir, config.cors);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    let addr = listener.local_addr()?;

    info!("Server running on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Server shutting down");
            })
            .await
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}
