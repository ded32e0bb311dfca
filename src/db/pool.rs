//! Bounded pool of SQLite connections.
//!
//! Capacity is fixed at construction. Callers past capacity wait on a fair
//! semaphore; the wait queue has no length limit and no timeout.

use rusqlite::Connection;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("connection pool is closed")]
    Closed,
}

#[derive(Debug)]
pub struct ConnectionPool {
    idle: Mutex<Vec<Connection>>,
    permits: Arc<Semaphore>,
    size: usize,
}

impl ConnectionPool {
    /// Build a pool owning the given connections. Capacity is their count.
    pub fn new(conns: Vec<Connection>) -> Self {
        let size = conns.len();
        Self {
            idle: Mutex::new(conns),
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Connections currently checked in.
    pub fn idle(&self) -> usize {
        self.lock_idle().len()
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// Check out one connection, waiting until one is free.
    pub async fn acquire(self: &Arc<Self>) -> Result<PooledConnection, PoolError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;
        // Each permit is backed by an idle connection until `close` clears them
        let conn = self.lock_idle().pop().ok_or_else(|| {
            debug_assert!(self.is_closed(), "permit granted without an idle connection");
            PoolError::Closed
        })?;
        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(self),
            _permit: permit,
        })
    }

    /// Refuse further checkouts and drop idle connections.
    ///
    /// Connections still checked out are dropped when their guard is.
    pub fn close(&self) {
        self.permits.close();
        self.lock_idle().clear();
    }

    fn lock_idle(&self) -> MutexGuard<'_, Vec<Connection>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A checked-out connection. Returned to the pool on drop.
pub struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<ConnectionPool>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection is only taken in drop")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        // The permit field drops after this body, so the connection is back
        // in the idle list before the next waiter wakes.
        if let Some(conn) = self.conn.take() {
            if !self.pool.is_closed() {
                self.pool.lock_idle().push(conn);
            }
        }
    }
}
