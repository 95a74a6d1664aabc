use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "text")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "Low"),
            TaskPriority::Medium => write!(f, "Medium"),
            TaskPriority::High => write!(f, "High"),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(TaskPriority::Low),
            "Medium" => Ok(TaskPriority::Medium),
            "High" => Ok(TaskPriority::High),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Task {
    pub id: i64,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub priority: TaskPriority,
    pub completed: bool,
    pub notified_10min: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a task that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub priority: TaskPriority,
    pub completed: bool,
}

impl NewTask {
    /// Title-only task used by the inline quick-add box.
    pub fn quick(user_id: Option<Uuid>, title: &str, due_date: NaiveDate) -> Self {
        Self {
            user_id,
            title: title.to_string(),
            description: String::new(),
            due_date: Some(due_date),
            due_time: None,
            priority: TaskPriority::Medium,
            completed: false,
        }
    }
}

/// Full replacement of the editable fields of a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChanges {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub priority: TaskPriority,
    pub completed: bool,
}

impl TaskChanges {
    pub fn reschedules(&self, task: &Task) -> bool {
        self.due_date != task.due_date || self.due_time != task.due_time
    }

    /// Applies the edit in place. A new date or time re-arms the
    /// 10-minute notification.
    pub fn apply(self, task: &mut Task) {
        if self.reschedules(task) {
            task.notified_10min = false;
        }
        task.title = self.title;
        task.description = self.description;
        task.due_date = self.due_date;
        task.due_time = self.due_time;
        task.priority = self.priority;
        task.completed = self.completed;
        task.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task {
            id: 1,
            user_id: None,
            title: "Water plants".to_string(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 10),
            due_time: NaiveTime::from_hms_opt(9, 5, 0),
            priority: TaskPriority::Medium,
            completed: false,
            notified_10min: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn changes_from(task: &Task) -> TaskChanges {
        TaskChanges {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            due_time: task.due_time,
            priority: task.priority,
            completed: task.completed,
        }
    }

    #[test]
    fn test_task_priority_display() {
        assert_eq!(TaskPriority::Low.to_string(), "Low");
        assert_eq!(TaskPriority::Medium.to_string(), "Medium");
        assert_eq!(TaskPriority::High.to_string(), "High");
    }

    #[test]
    fn test_task_priority_parse() {
        assert_eq!("High".parse::<TaskPriority>(), Ok(TaskPriority::High));
        assert!("Urgent".parse::<TaskPriority>().is_err());
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_edit_new_time_rearms_notification() {
        let mut task = task();
        let mut changes = changes_from(&task);
        changes.due_time = NaiveTime::from_hms_opt(10, 0, 0);

        changes.apply(&mut task);

        assert!(!task.notified_10min);
        assert_eq!(task.due_time, NaiveTime::from_hms_opt(10, 0, 0));
    }

    #[test]
    fn test_edit_new_date_rearms_notification() {
        let mut task = task();
        let mut changes = changes_from(&task);
        changes.due_date = NaiveDate::from_ymd_opt(2024, 6, 11);

        changes.apply(&mut task);

        assert!(!task.notified_10min);
    }

    #[test]
    fn test_edit_same_schedule_keeps_flag() {
        let mut task = task();
        let mut changes = changes_from(&task);
        changes.title = "Water all the plants".to_string();
        changes.priority = TaskPriority::High;

        changes.apply(&mut task);

        assert!(task.notified_10min);
        assert_eq!(task.title, "Water all the plants");
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn test_quick_task_defaults() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let quick = NewTask::quick(None, "Call mum", date);

        assert_eq!(quick.priority, TaskPriority::Medium);
        assert!(!quick.completed);
        assert_eq!(quick.due_date, Some(date));
        assert_eq!(quick.due_time, None);
    }
}
