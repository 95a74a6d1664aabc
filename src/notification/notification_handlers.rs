use axum::{extract::State, Json};

use crate::{error::Result, state::AppState};
use super::notification_dto::{NotificationsResponse, PendingTasksResponse};

/// Tasks due within the next 10 minutes, each reported once
#[utoipa::path(
    get,
    path = "/api/notifications/",
    responses(
        (status = 200, description = "Due-soon notifications", body = NotificationsResponse)
    ),
    tag = "notifications"
)]
pub async fn check_notifications(
    State(state): State<AppState>,
) -> Result<Json<NotificationsResponse>> {
    let now = state.now();
    let notifications = state.notification_service.scan(now).await?;

    Ok(Json(NotificationsResponse { notifications }))
}

/// Count and list of all incomplete tasks
#[utoipa::path(
    get,
    path = "/api/notifications/count/",
    responses(
        (status = 200, description = "Incomplete tasks", body = PendingTasksResponse)
    ),
    tag = "notifications"
)]
pub async fn notifications_count(
    State(state): State<AppState>,
) -> Result<Json<PendingTasksResponse>> {
    let pending = state.notification_service.pending().await?;
    Ok(Json(pending))
}
