use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};

use crate::config::Config;
use crate::models::{Project, Task};
use crate::store::{LocalStore, RemoteProjectStore, RemoteTaskStore, Store};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn Store<Task>>,
    pub projects: Arc<dyn Store<Project>>,
    pub config: Config,
}

impl AppState {
    /// Pick the storage backend once: SQL when `DATABASE_URL` is set,
    /// local snapshot files otherwise
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let (tasks, projects): (Arc<dyn Store<Task>>, Arc<dyn Store<Project>>) =
            match &config.database_url {
                Some(url) => {
                    // Each connection to an in-memory SQLite database gets its own empty copy
                    let max_connections = if url.contains(":memory:") { 1 } else { 10 };
                    let mut opt = ConnectOptions::new(url);
                    opt.max_connections(max_connections)
                        .min_connections(1)
                        .sqlx_logging(true);

                    let db = Database::connect(opt)
                        .await
                        .map_err(|e| AppStateError::Database(e.to_string()))?;

                    tracing::info!("Using SQL storage");
                    let tasks: Arc<dyn Store<Task>> = Arc::new(RemoteTaskStore::new(db.clone()));
                    let projects: Arc<dyn Store<Project>> = Arc::new(RemoteProjectStore::new(db));
                    (tasks, projects)
                }
                None => {
                    let tasks = LocalStore::<Task>::open_or_empty(
                        config.tasks_file(),
                        config.persist_policy,
                    );
                    let projects = LocalStore::<Project>::open_or_empty(
                        config.projects_file(),
                        config.persist_policy,
                    );

                    tracing::info!(
                        tasks = %tasks.path().display(),
                        projects = %projects.path().display(),
                        "Using local file storage"
                    );
                    let tasks: Arc<dyn Store<Task>> = Arc::new(tasks);
                    let projects: Arc<dyn Store<Project>> = Arc::new(projects);
                    (tasks, projects)
                }
            };

        Ok(Self::with_stores(config, tasks, projects))
    }

    /// Create AppState with explicit stores (for testing)
    pub fn with_stores(
        config: Config,
        tasks: Arc<dyn Store<Task>>,
        projects: Arc<dyn Store<Project>>,
    ) -> Self {
        Self {
            tasks,
            projects,
            config,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Database connection error: {0}")]
    Database(String),
}
