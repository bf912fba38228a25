pub mod project;
pub mod task;

pub use project::Entity as ProjectEntity;
pub use task::Entity as TaskEntity;
