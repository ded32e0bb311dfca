//! Task List Server Library
//!
//! A small REST API over a single SQLite table of to-do items, plus the
//! static single-page client that drives it.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
