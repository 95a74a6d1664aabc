use chrono::{Days, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    task_models::Task,
    task_query::{TaskOrdering, TaskPredicate, TaskQuery},
};

/// Fixed per-task effort used for the list view estimates.
pub const MINUTES_PER_TASK: i64 = 30;

/// View selector taken from the `filter` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    Today,
    Tomorrow,
    Week,
    Planned,
    Completed,
    All,
}

impl TaskFilter {
    /// A missing keyword means today; anything unrecognised shows all tasks.
    pub fn parse(keyword: Option<&str>) -> Self {
        match keyword {
            None | Some("today") => TaskFilter::Today,
            Some("tomorrow") => TaskFilter::Tomorrow,
            Some("week") => TaskFilter::Week,
            Some("planned") => TaskFilter::Planned,
            Some("completed") => TaskFilter::Completed,
            Some(_) => TaskFilter::All,
        }
    }

    pub fn page_title(&self) -> &'static str {
        match self {
            TaskFilter::Today => "Today",
            TaskFilter::Tomorrow => "Tomorrow",
            TaskFilter::Week => "This Week",
            TaskFilter::Planned => "Planned",
            TaskFilter::Completed => "Completed",
            TaskFilter::All => "Tasks",
        }
    }

    pub fn select(&self, today: NaiveDate) -> TaskQuery {
        match self {
            TaskFilter::Today => {
                TaskQuery::new(TaskPredicate::due_on(today), TaskOrdering::DayAgenda)
            }
            TaskFilter::Tomorrow => {
                TaskQuery::new(TaskPredicate::due_on(days_after(today, 1)), TaskOrdering::DayAgenda)
            }
            TaskFilter::Week => TaskQuery::new(
                TaskPredicate::due_between(today, days_after(today, 7)),
                TaskOrdering::Agenda,
            ),
            TaskFilter::Planned => {
                TaskQuery::new(TaskPredicate::due_from(today), TaskOrdering::Agenda)
            }
            TaskFilter::Completed => {
                TaskQuery::new(TaskPredicate::all().completed(true), TaskOrdering::RecentFirst)
            }
            TaskFilter::All => TaskQuery::new(TaskPredicate::all(), TaskOrdering::Agenda),
        }
    }

    /// Due date given to a title-only task added from this view.
    pub fn quick_add_due_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            TaskFilter::Tomorrow => days_after(today, 1),
            TaskFilter::Week => days_after(today, 7),
            _ => today,
        }
    }
}

pub fn select(keyword: Option<&str>, today: NaiveDate) -> TaskQuery {
    TaskFilter::parse(keyword).select(today)
}

pub fn derive_due_date(keyword: Option<&str>, today: NaiveDate) -> NaiveDate {
    TaskFilter::parse(keyword).quick_add_due_date(today)
}

/// Keyword of the view an edited task should land on.
pub fn filter_after_edit(due_date: Option<NaiveDate>, today: NaiveDate, fallback: Option<&str>) -> String {
    match due_date {
        Some(due) if due == today => "today".to_string(),
        Some(due) if due == days_after(today, 1) => "tomorrow".to_string(),
        Some(due) if due >= today => "planned".to_string(),
        _ => fallback.unwrap_or("today").to_string(),
    }
}

pub(crate) fn days_after(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ViewSummary {
    pub pending_count: i64,
    pub completed_count: i64,
    pub has_completed: bool,
    pub estimated_minutes: i64,
    pub elapsed_minutes: i64,
}

impl ViewSummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed_count = tasks.iter().filter(|task| task.completed).count() as i64;
        let pending_count = tasks.len() as i64 - completed_count;

        Self {
            pending_count,
            completed_count,
            has_completed: completed_count > 0,
            estimated_minutes: MINUTES_PER_TASK * pending_count,
            elapsed_minutes: MINUTES_PER_TASK * completed_count,
        }
    }
}
