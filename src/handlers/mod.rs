pub mod common;
pub mod milestone;
pub mod project;
pub mod task;

pub use common::{validate_due_date, validate_optional, validate_required, IdParams};
pub use milestone::get_milestones;
pub use project::{
    create_project, delete_project, list_projects, update_project, CreateProjectRequest,
    UpdateProjectRequest,
};
pub use task::{
    create_task, delete_task, list_tasks, update_task, CreateTaskRequest, UpdateTaskRequest,
};
