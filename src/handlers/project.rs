use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{validate_optional, validate_required, IdParams};
use crate::models::{NewProject, Project, ProjectPatch, ProjectStatus};
use crate::state::AppState;

// ============ Request DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

// ============ Handlers ============

/// List all projects, newest first
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "List of projects", body = [Project])
    ),
    tag = "Projects"
)]
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = state.projects.list().await?;
    Ok(Json(projects))
}

/// Create a new project
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = Project),
        (status = 400, description = "Validation error")
    ),
    tag = "Projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let new_project = NewProject {
        name: validate_required("name", payload.name)?,
        description: payload.description.unwrap_or_default(),
        status: payload.status.unwrap_or_default(),
    };

    let project = state.projects.create(new_project).await?;
    tracing::info!(project_id = project.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// Update a project
#[utoipa::path(
    patch,
    path = "/api/projects",
    params(IdParams),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated successfully", body = Project),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
    Json(payload): Json<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    let patch = ProjectPatch {
        name: validate_optional("name", payload.name)?,
        description: payload.description,
        status: payload.status,
    };

    let project = state
        .projects
        .update(params.id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;
    Ok(Json(project))
}

/// Delete a project. Tasks that reference it are left untouched.
#[utoipa::path(
    delete,
    path = "/api/projects",
    params(IdParams),
    responses(
        (status = 204, description = "Project deleted successfully"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<StatusCode> {
    if !state.projects.delete(params.id).await? {
        return Err(AppError::NotFound("Project".to_string()));
    }

    tracing::info!(project_id = params.id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
