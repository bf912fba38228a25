use serde::Serialize;
use utoipa::ToSchema;

use super::{ProjectStatus, Task};

/// Completion progress of one project, derived from the tasks pointing at it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub id: i64,
    pub name: String,
    pub status: ProjectStatus,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    /// Rounded percentage, 0 when the project has no tasks
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneSummary {
    pub projects: Vec<ProjectProgress>,
    pub upcoming_deadlines: Vec<Task>,
    pub open_tasks: u64,
}
