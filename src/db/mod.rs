//! Database layer for the task list server.

pub mod pool;
pub mod tasks;

use anyhow::{Context, Result, bail};
use pool::ConnectionPool;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::types::PoolStatus;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Database handle wrapping a bounded pool of SQLite connections.
///
/// Cheap to clone; all clones share the same pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: Arc<ConnectionPool>,
}

impl Database {
    /// Open or create the database at the given path with `pool_size`
    /// connections, creating the schema if it is missing.
    pub fn open<P: AsRef<Path>>(path: P, pool_size: usize) -> Result<Self> {
        if pool_size == 0 {
            bail!("Connection pool size must be at least 1");
        }
        let path = path.as_ref();

        let mut first = open_connection(path)?;
        info!("Successfully connected to the database");

        run_migrations(&mut first)?;
        info!("Table \"tasks\" checked/created successfully");

        let mut conns = Vec::with_capacity(pool_size);
        conns.push(first);
        for _ in 1..pool_size {
            conns.push(open_connection(path)?);
        }
        debug!(pool_size, "Connection pool filled");

        Ok(Self {
            pool: Arc::new(ConnectionPool::new(conns)),
        })
    }

    /// Open an in-memory database (for testing).
    ///
    /// Each in-memory connection is its own database, so the pool holds one.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        run_migrations(&mut conn)?;

        Ok(Self {
            pool: Arc::new(ConnectionPool::new(vec![conn])),
        })
    }

    /// Run `f` on a pooled connection.
    ///
    /// Waits for a free connection when the pool is exhausted. The query runs
    /// on the blocking thread pool and the connection goes back to the pool
    /// as soon as `f` returns.
    pub async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.pool.acquire().await?;
        tokio::task::spawn_blocking(move || f(&conn)).await?
    }

    /// Close the pool. Later operations fail with a "pool is closed" error.
    pub fn close(&self) {
        self.pool.close();
        info!("Database connection pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    pub fn pool_status(&self) -> PoolStatus {
        PoolStatus {
            size: self.pool.size(),
            idle: self.pool.idle(),
        }
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;

    // WAL lets readers proceed while another pooled connection writes
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;",
    )?;

    Ok(conn)
}

fn run_migrations(conn: &mut Connection) -> Result<()> {
    embedded::migrations::runner()
        .run(conn)
        .context("Failed to create the tasks table")?;
    Ok(())
}
