// Library crate for the task tracker
// Exports modules for use by the server binary and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    create_project, create_task, delete_project, delete_task, get_milestones, list_projects,
    list_tasks, update_project, update_task,
};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Hello, Task Tracker!" }))
        // Task routes; unrouted methods get 405
        .route(
            "/api/tasks",
            get(list_tasks)
                .post(create_task)
                .patch(update_task)
                .delete(delete_task),
        )
        // Project routes
        .route(
            "/api/projects",
            get(list_projects)
                .post(create_project)
                .patch(update_project)
                .delete(delete_project),
        )
        .route("/api/milestones", get(get_milestones))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
