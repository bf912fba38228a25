use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use sea_orm::{ConnectOptions, Database};
use tempfile::TempDir;

use task_tracker::build_router;
use task_tracker::config::{Config, LogFormat};
use task_tracker::models::{Project, Task};
use task_tracker::state::AppState;
use task_tracker::store::{
    LocalStore, PersistPolicy, RemoteProjectStore, RemoteTaskStore, Store,
};

/// Test configuration rooted at `data_dir`
pub fn test_config(data_dir: PathBuf) -> Config {
    Config {
        database_url: None,
        data_dir,
        persist_policy: PersistPolicy::Strict,
        host: "127.0.0.1".to_string(),
        port: 0,
        log_format: LogFormat::Pretty,
    }
}

/// Test application wrapper
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    /// Holds the snapshot directory alive for local-store apps
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    /// Application backed by local snapshot files in a fresh temp directory
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self::local_in(dir)
    }

    /// Application backed by an in-memory SQLite database
    pub async fn remote() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        // A single connection keeps every query on the same in-memory database
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        let db = Database::connect(opt)
            .await
            .expect("Failed to open in-memory database");

        let tasks: Arc<dyn Store<Task>> = Arc::new(RemoteTaskStore::new(db.clone()));
        let projects: Arc<dyn Store<Project>> = Arc::new(RemoteProjectStore::new(db));
        let state = AppState::with_stores(test_config(dir.path().to_path_buf()), tasks, projects);

        Self::serve(state, dir)
    }

    /// Simulate a process restart: a new app loading the same snapshot files
    pub fn restart(self) -> Self {
        Self::local_in(self.dir)
    }

    fn local_in(dir: TempDir) -> Self {
        let config = test_config(dir.path().to_path_buf());
        let tasks: Arc<dyn Store<Task>> = Arc::new(
            LocalStore::<Task>::open(config.tasks_file(), config.persist_policy)
                .expect("Failed to open task snapshot"),
        );
        let projects: Arc<dyn Store<Project>> = Arc::new(
            LocalStore::<Project>::open(config.projects_file(), config.persist_policy)
                .expect("Failed to open project snapshot"),
        );
        let state = AppState::with_stores(config, tasks, projects);

        Self::serve(state, dir)
    }

    fn serve(state: AppState, dir: TempDir) -> Self {
        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, state, dir }
    }
}
