use anyhow::Context;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use task_tracker::config::{Config, LogFormat};
use task_tracker::handlers::{
    CreateProjectRequest, CreateTaskRequest, UpdateProjectRequest, UpdateTaskRequest,
};
use task_tracker::models::{
    MilestoneSummary, Project, ProjectProgress, ProjectStatus, Task, TaskPriority, TaskStatus,
};
use task_tracker::state::AppState;
use task_tracker::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::task::list_tasks,
        handlers::task::create_task,
        handlers::task::update_task,
        handlers::task::delete_task,
        handlers::project::list_projects,
        handlers::project::create_project,
        handlers::project::update_project,
        handlers::project::delete_project,
        handlers::milestone::get_milestones,
    ),
    components(schemas(
        Task,
        TaskStatus,
        TaskPriority,
        CreateTaskRequest,
        UpdateTaskRequest,
        Project,
        ProjectStatus,
        CreateProjectRequest,
        UpdateProjectRequest,
        MilestoneSummary,
        ProjectProgress,
    )),
    tags(
        (name = "Tasks", description = "Task management endpoints"),
        (name = "Projects", description = "Project management endpoints"),
        (name = "Milestones", description = "Project progress and deadlines")
    )
)]
struct ApiDoc;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("task_tracker=info,tower_http=info"));

    match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);
    let addr = config.server_addr();

    // Initialize application state (selects the storage backend)
    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
