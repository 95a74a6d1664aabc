use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::Result,
    task::{TaskPredicate, TaskStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Statistics {
    pub total_completed: i64,
    #[serde(rename = "tasks_completed_this_week")]
    pub completed_this_week: i64,
    #[serde(rename = "tasks_completed_today")]
    pub completed_today: i64,
}

/// Monday and Sunday of the week containing `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(today.weekday().num_days_from_monday());
    let monday = today.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
    let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    (monday, sunday)
}

#[derive(Clone)]
pub struct StatisticsService {
    store: Arc<dyn TaskStore>,
}

impl StatisticsService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Completed-task counts. Week and day buckets go by due date; tasks
    /// carry no completion timestamp.
    pub async fn stats(&self, today: NaiveDate) -> Result<Statistics> {
        let (monday, sunday) = week_bounds(today);

        let total_completed = self.store.count(TaskPredicate::all().completed(true)).await?;
        let completed_this_week = self
            .store
            .count(TaskPredicate::due_between(monday, sunday).completed(true))
            .await?;
        let completed_today = self
            .store
            .count(TaskPredicate::due_on(today).completed(true))
            .await?;

        Ok(Statistics {
            total_completed,
            completed_this_week,
            completed_today,
        })
    }
}
