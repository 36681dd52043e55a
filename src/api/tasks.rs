use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{StatusUpdate, Task, TaskPayload, TaskStatus};

fn to_body<T: Serialize>(payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Parse(e.to_string()))
}

fn task_path(task_id: i64) -> String {
    format!("/api/tasks/{}", task_id)
}

/// Load every task. Role filtering is the caller's job.
///
/// Rows that do not decode (an unknown status, a missing id) are skipped
/// with a warning; the rest of the list is still returned.
pub async fn load_tasks(api: &ApiClient) -> Result<Vec<Task>, ApiError> {
    let rows: Vec<Value> = api.get("/api/tasks").await?;
    let total = rows.len();
    let tasks: Vec<Task> = rows.into_iter().filter_map(decode_task).collect();
    tracing::debug!(count = tasks.len(), skipped = total - tasks.len(), "Loaded tasks");
    Ok(tasks)
}

fn decode_task(row: Value) -> Option<Task> {
    let id = row.get("id").cloned();
    match serde_json::from_value::<Task>(row) {
        Ok(task) => Some(task),
        Err(e) => {
            tracing::warn!(id = ?id, error = %e, "Skipping malformed task row");
            None
        }
    }
}

pub async fn create_task(api: &ApiClient, payload: &TaskPayload) -> Result<(), ApiError> {
    api.send(Method::POST, "/api/tasks", Some(to_body(payload)?)).await
}

pub async fn update_task(api: &ApiClient, task_id: i64, payload: &TaskPayload) -> Result<(), ApiError> {
    api.send(Method::PUT, &task_path(task_id), Some(to_body(payload)?)).await
}

/// Partial update carrying only `{status}`.
pub async fn update_task_status(api: &ApiClient, task_id: i64, status: TaskStatus) -> Result<(), ApiError> {
    api.send(Method::PUT, &task_path(task_id), Some(to_body(&StatusUpdate { status })?))
        .await
}

pub async fn delete_task(api: &ApiClient, task_id: i64) -> Result<(), ApiError> {
    api.send(Method::DELETE, &task_path(task_id), None).await
}
