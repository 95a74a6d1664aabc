use chrono::NaiveDate;
use std::cmp::Ordering;

use super::task_models::Task;

/// Conjunction of optional conditions over a task. Unset fields do not
/// constrain. Date bounds never match a task without a due date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskPredicate {
    pub due_from: Option<NaiveDate>,
    pub due_until: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub notified: Option<bool>,
}

impl TaskPredicate {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn due_on(date: NaiveDate) -> Self {
        Self::due_between(date, date)
    }

    /// Inclusive on both ends.
    pub fn due_between(from: NaiveDate, until: NaiveDate) -> Self {
        Self {
            due_from: Some(from),
            due_until: Some(until),
            ..Self::default()
        }
    }

    pub fn due_from(from: NaiveDate) -> Self {
        Self {
            due_from: Some(from),
            ..Self::default()
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn notified(mut self, notified: bool) -> Self {
        self.notified = Some(notified);
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(from) = self.due_from {
            if !task.due_date.is_some_and(|due| due >= from) {
                return false;
            }
        }
        if let Some(until) = self.due_until {
            if !task.due_date.is_some_and(|due| due <= until) {
                return false;
            }
        }
        if let Some(completed) = self.completed {
            if task.completed != completed {
                return false;
            }
        }
        if let Some(notified) = self.notified {
            if task.notified_10min != notified {
                return false;
            }
        }
        true
    }
}

/// Sort orders used by the views. Ascending keys put missing dates and
/// times last, descending keys put them first, the way PostgreSQL sorts
/// NULLs by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrdering {
    /// completed, due_time, id
    DayAgenda,
    /// completed, due_date, due_time, id
    Agenda,
    /// due_date desc, due_time desc, id desc
    RecentFirst,
    /// due_date, due_time, id
    Upcoming,
}

impl TaskOrdering {
    pub fn sql(&self) -> &'static str {
        match self {
            TaskOrdering::DayAgenda => "completed ASC, due_time ASC NULLS LAST, id ASC",
            TaskOrdering::Agenda => {
                "completed ASC, due_date ASC NULLS LAST, due_time ASC NULLS LAST, id ASC"
            }
            TaskOrdering::RecentFirst => {
                "due_date DESC NULLS FIRST, due_time DESC NULLS FIRST, id DESC"
            }
            TaskOrdering::Upcoming => "due_date ASC NULLS LAST, due_time ASC NULLS LAST, id ASC",
        }
    }

    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            TaskOrdering::DayAgenda => a
                .completed
                .cmp(&b.completed)
                .then_with(|| nulls_last(a.due_time, b.due_time))
                .then_with(|| a.id.cmp(&b.id)),
            TaskOrdering::Agenda => a
                .completed
                .cmp(&b.completed)
                .then_with(|| nulls_last(a.due_date, b.due_date))
                .then_with(|| nulls_last(a.due_time, b.due_time))
                .then_with(|| a.id.cmp(&b.id)),
            TaskOrdering::RecentFirst => nulls_last(a.due_date, b.due_date)
                .then_with(|| nulls_last(a.due_time, b.due_time))
                .then_with(|| a.id.cmp(&b.id))
                .reverse(),
            TaskOrdering::Upcoming => nulls_last(a.due_date, b.due_date)
                .then_with(|| nulls_last(a.due_time, b.due_time))
                .then_with(|| a.id.cmp(&b.id)),
        }
    }

    pub fn sort(&self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}

fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    pub predicate: TaskPredicate,
    pub ordering: TaskOrdering,
}

impl TaskQuery {
    pub fn new(predicate: TaskPredicate, ordering: TaskOrdering) -> Self {
        Self {
            predicate,
            ordering,
        }
    }
}
