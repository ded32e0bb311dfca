//! Task CRUD. Each operation is a single autocommitted statement.

use super::Database;
use crate::types::{CreatedTask, Task, TaskId};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Row, params};

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: TaskId = row.get("id")?;
    let task_name: String = row.get("task_name")?;
    let is_completed: bool = row.get("is_completed")?;
    let created_at: String = row.get("created_at")?;

    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Task {
        id,
        task_name,
        is_completed,
        created_at,
    })
}

impl Database {
    /// All tasks, newest first. Ties on `created_at` fall back to the id so
    /// insertion order is kept within one clock tick.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, task_name, is_completed, created_at
                 FROM tasks
                 ORDER BY created_at DESC, id DESC",
            )?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
        .await
    }

    /// Insert a new, incomplete task. The store assigns id and timestamp.
    pub async fn create_task(&self, task_name: &str) -> Result<CreatedTask> {
        let task_name = task_name.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO tasks (task_name) VALUES (?1)",
                params![task_name],
            )?;
            Ok(CreatedTask {
                id: conn.last_insert_rowid(),
                task_name,
                is_completed: false,
            })
        })
        .await
    }

    /// Set the completion flag. Returns the number of rows changed, which is
    /// zero for an unknown id.
    pub async fn set_task_completed(&self, id: TaskId, is_completed: bool) -> Result<usize> {
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE tasks SET is_completed = ?1 WHERE id = ?2",
                params![is_completed, id],
            )?;
            Ok(changed)
        })
        .await
    }

    /// Delete a task. Returns the number of rows removed (zero or one).
    pub async fn delete_task(&self, id: TaskId) -> Result<usize> {
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
            Ok(removed)
        })
        .await
    }
}
