use serde::Serialize;
use utoipa::ToSchema;

use crate::task::{Task, TaskPriority};

/// Shown in place of a time for tasks without a due time.
pub const ALL_DAY: &str = "All day";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DueNotification {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    /// `HH:MM`, or "All day"
    pub due_time: String,
}

impl DueNotification {
    pub fn for_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_time: task
                .due_time
                .map(|time| time.format("%H:%M").to_string())
                .unwrap_or_else(|| ALL_DAY.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationsResponse {
    pub notifications: Vec<DueNotification>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingTask {
    pub id: i64,
    pub title: String,
    /// `YYYY-MM-DD`
    pub due_date: Option<String>,
    /// `HH:MM`
    pub due_time: Option<String>,
    pub priority: TaskPriority,
}

impl From<Task> for PendingTask {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            due_date: task.due_date.map(|date| date.format("%Y-%m-%d").to_string()),
            due_time: task.due_time.map(|time| time.format("%H:%M").to_string()),
            priority: task.priority,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingTasksResponse {
    pub count: i64,
    pub tasks: Vec<PendingTask>,
}
