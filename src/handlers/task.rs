use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{validate_due_date, validate_optional, validate_required, IdParams};
use crate::models::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
use crate::state::AppState;

// ============ Request DTOs ============

/// Unrecognized fields are ignored
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// ISO date, e.g. `2026-03-01`
    pub due_date: Option<String>,
    pub project_id: Option<i64>,
}

/// Absent or null fields keep their stored value
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
    pub project_id: Option<i64>,
}

// ============ Handlers ============

/// List all tasks, newest first
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "List of tasks", body = [Task])
    ),
    tag = "Tasks"
)]
pub async fn list_tasks(State(state): State<AppState>) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list().await?;
    Ok(Json(tasks))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, description = "Validation error")
    ),
    tag = "Tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let new_task = NewTask {
        title: validate_required("title", payload.title)?,
        description: payload.description.unwrap_or_default(),
        status: payload.status.unwrap_or_default(),
        priority: payload.priority.unwrap_or_default(),
        due_date: validate_due_date(payload.due_date)?,
        project_id: payload.project_id,
    };

    let task = state.tasks.create(new_task).await?;
    tracing::info!(task_id = task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// Merge supplied fields into a task
#[utoipa::path(
    patch,
    path = "/api/tasks",
    params(IdParams),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Task not found")
    ),
    tag = "Tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
    Json(payload): Json<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    let patch = TaskPatch {
        title: validate_optional("title", payload.title)?,
        description: payload.description,
        status: payload.status,
        priority: payload.priority,
        due_date: validate_due_date(payload.due_date)?,
        project_id: payload.project_id,
    };

    let task = state
        .tasks
        .update(params.id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Task".to_string()))?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks",
    params(IdParams),
    responses(
        (status = 204, description = "Task deleted successfully"),
        (status = 404, description = "Task not found")
    ),
    tag = "Tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<StatusCode> {
    if !state.tasks.delete(params.id).await? {
        return Err(AppError::NotFound("Task".to_string()));
    }

    tracing::info!(task_id = params.id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}
