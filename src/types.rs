//! Core types for the task list server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task identifier, assigned by the store.
pub type TaskId = i64;

/// A task as stored and listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub task_name: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Record returned by the create endpoint.
///
/// Carries only what the caller supplied plus the new id; `created_at` is
/// left to the next list call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTask {
    pub id: TaskId,
    pub task_name: String,
    pub is_completed: bool,
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub task_name: Option<String>,
}

impl CreateTaskRequest {
    /// The name if present and non-empty. Whitespace is not trimmed here.
    pub fn name(&self) -> Option<&str> {
        self.task_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Body of `PUT /api/tasks/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub is_completed: Option<bool>,
}

/// Generic acknowledgment for update and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Snapshot of the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub size: usize,
    pub idle: usize,
}
