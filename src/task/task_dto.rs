use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use super::{
    task_filter::ViewSummary,
    task_models::{NewTask, Task, TaskChanges, TaskPriority},
};

/// Add/edit form as posted by the browser. Every field arrives as text;
/// empty date, time and priority inputs mean "not set".
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct TaskForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub due_time: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub completed: Option<String>,
}

impl TaskForm {
    pub fn into_changes(mut self) -> Result<TaskChanges> {
        self.title = self.title.trim().to_string();
        self.validate()?;

        let due_date = parse_date(self.due_date.as_deref())?;
        let due_time = parse_time(self.due_time.as_deref())?;
        let priority = match non_empty(self.priority.as_deref()) {
            Some(raw) => raw
                .parse::<TaskPriority>()
                .map_err(|e| AppError::Validation(format!("priority: {}", e)))?,
            None => TaskPriority::default(),
        };

        Ok(TaskChanges {
            title: self.title,
            description: self.description,
            due_date,
            due_time,
            priority,
            completed: checkbox(self.completed.as_deref()),
        })
    }

    pub fn into_new_task(self, user_id: Option<Uuid>) -> Result<NewTask> {
        let changes = self.into_changes()?;

        Ok(NewTask {
            user_id,
            title: changes.title,
            description: changes.description,
            due_date: changes.due_date,
            due_time: changes.due_time,
            priority: changes.priority,
            completed: changes.completed,
        })
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    non_empty(raw)
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| AppError::Validation(format!("due_date: invalid date '{}'", value)))
        })
        .transpose()
}

fn parse_time(raw: Option<&str>) -> Result<Option<NaiveTime>> {
    non_empty(raw)
        .map(|value| {
            NaiveTime::parse_from_str(value, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
                .map_err(|_| AppError::Validation(format!("due_time: invalid time '{}'", value)))
        })
        .transpose()
}

fn checkbox(raw: Option<&str>) -> bool {
    matches!(
        non_empty(raw).map(str::to_ascii_lowercase).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuickAddForm {
    #[serde(default)]
    pub title: String,
    pub filter: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterParams {
    /// One of today, tomorrow, week, planned, completed
    pub filter: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListView {
    pub page_title: String,
    pub current_filter: String,
    pub tasks: Vec<Task>,
    pub summary: ViewSummary,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleTaskRequest {
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleTaskResponse {
    pub success: bool,
    pub task_id: i64,
    pub completed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleTaskError {
    pub success: bool,
    pub error: String,
}
