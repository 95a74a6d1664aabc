use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use super::{
    task_dto::{TaskForm, TaskListView},
    task_filter::{TaskFilter, ViewSummary},
    task_models::{NewTask, Task},
    task_repository::TaskStore,
};

/// Service layer for task‑related business logic.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, keyword: Option<&str>, today: NaiveDate) -> Result<TaskListView> {
        let filter = TaskFilter::parse(keyword);
        let tasks = self.store.query(filter.select(today)).await?;
        let summary = ViewSummary::from_tasks(&tasks);

        debug!(
            filter = ?filter,
            %today,
            tasks = tasks.len(),
            pending = summary.pending_count,
            completed = summary.completed_count,
            "task list selected"
        );

        Ok(TaskListView {
            page_title: filter.page_title().to_string(),
            current_filter: keyword.unwrap_or("today").to_string(),
            tasks,
            summary,
        })
    }

    pub async fn get_task(&self, id: i64) -> Result<Task> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::task_not_found(id))
    }

    pub async fn create_task(&self, user_id: Option<Uuid>, form: TaskForm) -> Result<Task> {
        let task = self.store.create(form.into_new_task(user_id)?).await?;
        info!(task_id = task.id, "task created");
        Ok(task)
    }

    /// Creates a title-only task dated from the active view. Blank titles
    /// are ignored.
    pub async fn quick_add(
        &self,
        user_id: Option<Uuid>,
        title: &str,
        keyword: Option<&str>,
        today: NaiveDate,
    ) -> Result<Option<Task>> {
        let title = title.trim();
        if title.is_empty() {
            debug!("quick add ignored: empty title");
            return Ok(None);
        }

        let due_date = TaskFilter::parse(keyword).quick_add_due_date(today);
        let task = self
            .store
            .create(NewTask::quick(user_id, title, due_date))
            .await?;
        info!(task_id = task.id, %due_date, "task quick-added");

        Ok(Some(task))
    }

    pub async fn edit_task(&self, id: i64, form: TaskForm) -> Result<Task> {
        let changes = form.into_changes()?;
        let task = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::task_not_found(id))?;

        info!(task_id = id, notified = task.notified_10min, "task updated");
        Ok(task)
    }

    pub async fn toggle_task(&self, id: i64, completed: bool) -> Result<Task> {
        let task = self
            .store
            .set_completed(id, completed)
            .await?
            .ok_or_else(|| AppError::task_not_found(id))?;

        debug!(task_id = id, completed, "task completion toggled");
        Ok(task)
    }

    /// Unknown ids are a `NotFound`; a failure while deleting an existing
    /// task is logged and otherwise ignored.
    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let task = self.get_task(id).await?;

        match self.store.delete(id).await {
            Ok(rows) => info!(task_id = id, title = %task.title, rows, "task deleted"),
            Err(e) => warn!(task_id = id, error = %e, "failed to delete task"),
        }

        Ok(())
    }
}
