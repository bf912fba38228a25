use task_tracker::models::{
    NewProject, NewTask, Project, ProjectStatus, Task, TaskPriority, TaskStatus,
};
use task_tracker::state::AppState;

/// Factory for creating test data directly through the stores
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test task with defaults
    pub async fn create_task(&self, title: &str) -> Task {
        self.state
            .tasks
            .create(NewTask {
                title: title.to_string(),
                description: String::new(),
                status: TaskStatus::Todo,
                priority: TaskPriority::Medium,
                due_date: None,
                project_id: None,
            })
            .await
            .unwrap()
    }

    /// Create a test task linked to a project
    pub async fn create_task_in_project(
        &self,
        title: &str,
        project_id: i64,
        status: TaskStatus,
    ) -> Task {
        self.state
            .tasks
            .create(NewTask {
                title: title.to_string(),
                description: String::new(),
                status,
                priority: TaskPriority::Medium,
                due_date: None,
                project_id: Some(project_id),
            })
            .await
            .unwrap()
    }

    /// Create a test project
    pub async fn create_project(&self, name: &str) -> Project {
        self.state
            .projects
            .create(NewProject {
                name: name.to_string(),
                description: "Test project description".to_string(),
                status: ProjectStatus::Upcoming,
            })
            .await
            .unwrap()
    }
}
