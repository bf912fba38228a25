use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::MilestoneSummary;
use crate::services::MilestoneService;
use crate::state::AppState;

/// Project progress and upcoming deadlines
#[utoipa::path(
    get,
    path = "/api/milestones",
    responses(
        (status = 200, description = "Milestone summary", body = MilestoneSummary)
    ),
    tag = "Milestones"
)]
pub async fn get_milestones(State(state): State<AppState>) -> AppResult<Json<MilestoneSummary>> {
    let summary = MilestoneService::summary(state.tasks.as_ref(), state.projects.as_ref()).await?;
    Ok(Json(summary))
}
