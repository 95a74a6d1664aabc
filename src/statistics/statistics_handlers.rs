use axum::{extract::State, Json};

use crate::{error::Result, state::AppState};
use super::statistics_service::Statistics;

/// Completed-task counts for the statistics dialog
#[utoipa::path(
    get,
    path = "/api/statistics/",
    responses(
        (status = 200, description = "Completion statistics", body = Statistics)
    ),
    tag = "statistics"
)]
pub async fn get_statistics(State(state): State<AppState>) -> Result<Json<Statistics>> {
    let today = state.today();
    let stats = state.statistics_service.stats(today).await?;
    Ok(Json(stats))
}
