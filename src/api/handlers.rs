//! Request handlers. Each one maps to a single store call.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{Method, StatusCode};
use serde::Serialize;
use tracing::{debug, error, info};

use super::server::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    Ack, CreateTaskRequest, CreatedTask, PoolStatus, Task, TaskId, UpdateTaskRequest,
};

/// Health check response.
#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: &'static str,
    pool: PoolStatus,
}

/// Log a store failure and turn it into a 500 carrying the raw message.
fn store_error(action: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
    move |err| {
        error!(error = %err, "Failed to {}", action);
        ApiError::from(err)
    }
}

/// Ids that are not integers cannot match a row.
fn parse_task_id(raw: &str) -> Option<TaskId> {
    raw.parse().ok()
}

/// `GET /api/tasks`
pub(crate) async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state
        .db()
        .list_tasks()
        .await
        .map_err(store_error("list tasks"))?;
    Ok(Json(tasks))
}

/// `POST /api/tasks`
pub(crate) async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedTask>)> {
    let Json(request) = body?;
    let name = request
        .name()
        .ok_or_else(|| ApiError::missing_field("Task name is required"))?;

    let created = state
        .db()
        .create_task(name)
        .await
        .map_err(store_error("create task"))?;
    info!(id = created.id, "Task created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/tasks/{id}`
///
/// Unknown ids are acknowledged like known ones.
pub(crate) async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Ack>> {
    let Json(request) = body?;
    let is_completed = request
        .is_completed
        .ok_or_else(|| ApiError::missing_field("is_completed is required"))?;

    match parse_task_id(&id) {
        Some(task_id) => {
            let changed = state
                .db()
                .set_task_completed(task_id, is_completed)
                .await
                .map_err(store_error("update task"))?;
            if changed == 0 {
                debug!(id = task_id, "Update matched no task");
            }
        }
        None => debug!(id = %id, "Update for non-numeric id ignored"),
    }

    Ok(Json(Ack::new("Task updated successfully")))
}

/// `DELETE /api/tasks/{id}`
///
/// Unknown ids are acknowledged like known ones.
pub(crate) async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ack>> {
    match parse_task_id(&id) {
        Some(task_id) => {
            let removed = state
                .db()
                .delete_task(task_id)
                .await
                .map_err(store_error("delete task"))?;
            if removed == 0 {
                debug!(id = task_id, "Delete matched no task");
            }
        }
        None => debug!(id = %id, "Delete for non-numeric id ignored"),
    }

    Ok(Json(Ack::new("Task deleted successfully")))
}

/// `GET /api/health`
///
/// 503 once the pool has been closed.
pub(crate) async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let db = state.db();
    let (code, status) = if db.is_closed() {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    } else {
        (StatusCode::OK, "healthy")
    };
    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        pool: db.pool_status(),
    };
    (code, Json(response))
}

/// Fallback for unmatched paths under `/api`.
pub(crate) async fn api_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(uri.path())
}

/// Known `/api` path, unsupported method.
pub(crate) async fn api_method_not_allowed(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiError {
    ApiError::method_not_allowed(&method, uri.path())
}
