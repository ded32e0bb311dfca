//! HTTP API server.
//!
//! REST endpoints for the task collection live under `/api`; everything else
//! is served from the public directory, with `index.html` as the catch-all.

mod handlers;
mod server;

pub use server::{AppState, ServerHandle, build_router, start_server};
