use time::{Date, OffsetDateTime};

use crate::error::AppResult;
use crate::models::{MilestoneSummary, Project, ProjectProgress, Task, TaskStatus};
use crate::store::Store;

/// Derives project progress and upcoming deadlines from the task and project stores
pub struct MilestoneService;

impl MilestoneService {
    /// Maximum number of upcoming deadlines returned
    pub const UPCOMING_LIMIT: usize = 5;

    /// Build the summary from the current store contents, relative to today (UTC)
    pub async fn summary(
        tasks: &dyn Store<Task>,
        projects: &dyn Store<Project>,
    ) -> AppResult<MilestoneSummary> {
        let tasks = tasks.list().await?;
        let projects = projects.list().await?;
        let today = OffsetDateTime::now_utc().date();

        Ok(Self::summarize(&tasks, &projects, today))
    }

    /// Pure summary over already-listed records; keeps the stores' ordering
    pub fn summarize(tasks: &[Task], projects: &[Project], today: Date) -> MilestoneSummary {
        let projects = projects
            .iter()
            .map(|project| {
                let linked = tasks
                    .iter()
                    .filter(|t| t.project_id == Some(project.id));
                let total = linked.clone().count() as u64;
                let completed = linked.filter(|t| t.status == TaskStatus::Done).count() as u64;

                ProjectProgress {
                    id: project.id,
                    name: project.name.clone(),
                    status: project.status,
                    total_tasks: total,
                    completed_tasks: completed,
                    progress: percent(completed, total),
                }
            })
            .collect();

        let upcoming_deadlines = tasks
            .iter()
            .filter(|t| t.due_day().is_some_and(|day| day > today))
            .take(Self::UPCOMING_LIMIT)
            .cloned()
            .collect();

        let open_tasks = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Todo)
            .count() as u64;

        MilestoneSummary {
            projects,
            upcoming_deadlines,
            open_tasks,
        }
    }
}

/// Rounded (half up) percentage of `part` in `whole`; 0 for an empty whole
fn percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part * 100 + whole / 2) / whole).min(100) as u8
}
