use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};

use crate::{
    error::Result,
    middleware::CurrentUser,
    state::AppState,
};
use super::{
    task_dto::{
        FilterParams, QuickAddForm, TaskForm, TaskListView, ToggleTaskError, ToggleTaskRequest,
        ToggleTaskResponse,
    },
    task_filter::filter_after_edit,
    task_models::Task,
};

/// Redirect to a list view. Keywords that are not plain words are dropped
/// rather than echoed into the Location header.
fn list_redirect(filter: Option<&str>) -> Redirect {
    match filter {
        Some(keyword)
            if !keyword.is_empty()
                && keyword
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
        {
            Redirect::to(&format!("/tasks/?filter={}", keyword))
        }
        _ => Redirect::to("/tasks/"),
    }
}

pub async fn index() -> Redirect {
    Redirect::to("/tasks/?filter=today")
}

/// Tasks for one view with its pending/completed summary
#[utoipa::path(
    get,
    path = "/tasks/",
    params(FilterParams),
    responses(
        (status = 200, description = "Filtered task list", body = TaskListView)
    ),
    tag = "tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<TaskListView>> {
    let today = state.today();
    let view = state
        .task_service
        .list(params.filter.as_deref(), today)
        .await?;

    Ok(Json(view))
}

/// Create a task from the full form
#[utoipa::path(
    post,
    path = "/add/",
    request_body(content = TaskForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to the task list"),
        (status = 400, description = "Invalid form")
    ),
    tag = "tasks"
)]
pub async fn add_task(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Form(form): Form<TaskForm>,
) -> Result<Redirect> {
    state.task_service.create_task(user_id, form).await?;
    Ok(Redirect::to("/tasks/"))
}

/// Create a title-only task dated from the active view
#[utoipa::path(
    post,
    path = "/quick_add/",
    request_body(content = QuickAddForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect back to the active view")
    ),
    tag = "tasks"
)]
pub async fn quick_add_task(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Form(form): Form<QuickAddForm>,
) -> Result<Redirect> {
    let today = state.today();
    let filter = form.filter.as_deref().unwrap_or("today");

    state
        .task_service
        .quick_add(user_id, &form.title, Some(filter), today)
        .await?;

    Ok(list_redirect(Some(filter)))
}

/// Current values of a task, used to fill the edit form
#[utoipa::path(
    get,
    path = "/edit/{id}/",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task", body = Task),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<Json<Task>> {
    let task = state.task_service.get_task(task_id).await?;
    Ok(Json(task))
}

/// Replace a task's fields and go to the view it now belongs to
#[utoipa::path(
    post,
    path = "/edit/{id}/",
    params(("id" = i64, Path, description = "Task ID"), FilterParams),
    request_body(content = TaskForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirect to the matching view"),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn edit_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Query(params): Query<FilterParams>,
    Form(form): Form<TaskForm>,
) -> Result<Redirect> {
    let task = state.task_service.edit_task(task_id, form).await?;
    let today = state.today();
    let filter = filter_after_edit(task.due_date, today, params.filter.as_deref());

    Ok(list_redirect(Some(&filter)))
}

/// Delete a task and return to the active view
#[utoipa::path(
    post,
    path = "/delete/{id}/",
    params(("id" = i64, Path, description = "Task ID"), FilterParams),
    responses(
        (status = 303, description = "Redirect back to the active view"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Query(params): Query<FilterParams>,
) -> Result<Redirect> {
    state.task_service.delete_task(task_id).await?;
    Ok(list_redirect(Some(params.filter.as_deref().unwrap_or("today"))))
}

/// Set a task's completion flag
#[utoipa::path(
    post,
    path = "/api/toggle-task/{id}/",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = ToggleTaskRequest,
    responses(
        (status = 200, description = "Completion updated", body = ToggleTaskResponse),
        (status = 400, description = "Malformed body", body = ToggleTaskError),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    body: Bytes,
) -> Result<Response> {
    state.task_service.get_task(task_id).await?;

    let request = match serde_json::from_slice::<ToggleTaskRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(task_id, "rejected toggle body: {}", e);
            let error = ToggleTaskError {
                success: false,
                error: e.to_string(),
            };
            return Ok((StatusCode::BAD_REQUEST, Json(error)).into_response());
        }
    };

    let task = state
        .task_service
        .toggle_task(task_id, request.completed)
        .await?;

    Ok(Json(ToggleTaskResponse {
        success: true,
        task_id: task.id,
        completed: task.completed,
    })
    .into_response())
}
