use chrono::{Duration, NaiveDateTime};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    error::Result,
    task::{Task, TaskOrdering, TaskPredicate, TaskQuery, TaskStore},
};
use super::notification_dto::{DueNotification, PendingTask, PendingTasksResponse};

/// How far ahead of its due time a task is reported.
pub const NOTIFY_AHEAD_MINUTES: i64 = 10;

/// Whether `task` should be reported by a scan at local time `now`.
///
/// Timed tasks are due-soon when `now <= due <= now + 10 min`; tasks with no
/// time are due-soon at any point of their due day.
pub fn is_due_soon(task: &Task, now: NaiveDateTime) -> bool {
    if task.completed || task.notified_10min || task.due_date != Some(now.date()) {
        return false;
    }

    match (task.due_date, task.due_time) {
        (Some(date), Some(time)) => {
            let due = date.and_time(time);
            now <= due && due <= now + Duration::minutes(NOTIFY_AHEAD_MINUTES)
        }
        _ => true,
    }
}

/// Polling check for tasks that are about to fall due.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn TaskStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Reports every due-soon task once. A task is only reported by the
    /// scan whose conditional update moved it to notified, so overlapping
    /// scans never report the same task twice.
    ///
    /// A timed task whose whole window passes between two scans is never
    /// reported.
    pub async fn scan(&self, now: NaiveDateTime) -> Result<Vec<DueNotification>> {
        let candidates = self
            .store
            .query(TaskQuery::new(
                TaskPredicate::due_on(now.date()).completed(false).notified(false),
                TaskOrdering::DayAgenda,
            ))
            .await?;

        let mut notifications = Vec::new();
        for task in candidates.iter().filter(|task| is_due_soon(task, now)) {
            let Some(date) = task.due_date else { continue };

            match self.store.mark_notified(task.id, date, task.due_time).await? {
                Some(marked) => {
                    info!(task_id = marked.id, title = %marked.title, "due-soon notification");
                    notifications.push(DueNotification::for_task(&marked));
                }
                None => debug!(task_id = task.id, "task changed during scan, skipped"),
            }
        }

        Ok(notifications)
    }

    /// All incomplete tasks, soonest first.
    pub async fn pending(&self) -> Result<PendingTasksResponse> {
        let tasks = self
            .store
            .query(TaskQuery::new(
                TaskPredicate::all().completed(false),
                TaskOrdering::Upcoming,
            ))
            .await?;

        Ok(PendingTasksResponse {
            count: tasks.len() as i64,
            tasks: tasks.into_iter().map(PendingTask::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::notification_dto::ALL_DAY;
    use crate::task::{MemoryTaskStore, NewTask, TaskChanges, TaskPriority};
    use chrono::{NaiveDate, NaiveTime};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(d).and_hms_opt(h, m, 0).unwrap()
    }

    fn new_task(title: &str, due_date: Option<NaiveDate>, due_time: Option<NaiveTime>) -> NewTask {
        NewTask {
            user_id: None,
            title: title.to_string(),
            description: format!("{} details", title),
            due_date,
            due_time,
            priority: TaskPriority::High,
            completed: false,
        }
    }

    async fn setup(tasks: Vec<NewTask>) -> (Arc<MemoryTaskStore>, NotificationService) {
        let store = Arc::new(MemoryTaskStore::new());
        for task in tasks {
            store.create(task).await.unwrap();
        }
        let service = NotificationService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn test_scan_reports_once() {
        let (store, service) =
            setup(vec![new_task("standup", Some(date(10)), NaiveTime::from_hms_opt(9, 5, 0))]).await;

        let first = service.scan(at(10, 9, 0)).await.unwrap();
        let second = service.scan(at(10, 9, 1)).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].title, "standup");
        assert_eq!(first[0].due_time, "09:05");
        assert_eq!(first[0].priority, TaskPriority::High);
        assert!(second.is_empty());
        assert!(store.get(first[0].id).await.unwrap().unwrap().notified_10min);
    }

    #[tokio::test]
    async fn test_scan_all_day_task() {
        let (_, service) = setup(vec![new_task("laundry", Some(date(10)), None)]).await;

        let late = service.scan(at(10, 23, 50)).await.unwrap();

        assert_eq!(late.len(), 1);
        assert_eq!(late[0].due_time, ALL_DAY);
        assert!(service.scan(at(10, 23, 55)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_window_edges() {
        let (_, service) = setup(vec![
            new_task("exactly now", Some(date(10)), NaiveTime::from_hms_opt(9, 0, 0)),
            new_task("ten minutes", Some(date(10)), NaiveTime::from_hms_opt(9, 10, 0)),
            new_task("eleven minutes", Some(date(10)), NaiveTime::from_hms_opt(9, 11, 0)),
            new_task("already past", Some(date(10)), NaiveTime::from_hms_opt(8, 59, 0)),
        ])
        .await;

        let reported = service.scan(at(10, 9, 0)).await.unwrap();

        let titles: Vec<&str> = reported.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["exactly now", "ten minutes"]);
    }

    #[tokio::test]
    async fn test_scan_later_picks_up_task() {
        let (_, service) =
            setup(vec![new_task("call", Some(date(10)), NaiveTime::from_hms_opt(9, 30, 0))]).await;

        assert!(service.scan(at(10, 9, 0)).await.unwrap().is_empty());
        assert_eq!(service.scan(at(10, 9, 21)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scan_skips_other_days_and_completed() {
        let (store, service) = setup(vec![
            new_task("tomorrow", Some(date(11)), None),
            new_task("undated", None, None),
            new_task("done", Some(date(10)), None),
        ])
        .await;
        store.set_completed(3, true).await.unwrap();

        assert!(service.scan(at(10, 8, 0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reschedule_rearms_notification() {
        let (store, service) =
            setup(vec![new_task("review", Some(date(10)), NaiveTime::from_hms_opt(9, 5, 0))]).await;
        assert_eq!(service.scan(at(10, 9, 0)).await.unwrap().len(), 1);

        store
            .update(
                1,
                TaskChanges {
                    title: "review".to_string(),
                    description: String::new(),
                    due_date: Some(date(10)),
                    due_time: NaiveTime::from_hms_opt(14, 0, 0),
                    priority: TaskPriority::Medium,
                    completed: false,
                },
            )
            .await
            .unwrap();

        assert!(service.scan(at(10, 9, 2)).await.unwrap().is_empty());
        assert_eq!(service.scan(at(10, 13, 55)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_scans_report_once() {
        let (_, service) = setup(vec![new_task("lunch", Some(date(10)), None)]).await;

        let (a, b) = tokio::join!(service.scan(at(10, 12, 0)), service.scan(at(10, 12, 0)));

        assert_eq!(a.unwrap().len() + b.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_pending_lists_incomplete_tasks() {
        let (store, service) = setup(vec![
            new_task("later", Some(date(12)), NaiveTime::from_hms_opt(9, 0, 0)),
            new_task("undated", None, None),
            new_task("sooner", Some(date(10)), None),
            new_task("done", Some(date(9)), None),
        ])
        .await;
        store.set_completed(4, true).await.unwrap();

        let pending = service.pending().await.unwrap();

        let titles: Vec<&str> = pending.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(pending.count, 3);
        assert_eq!(titles, vec!["sooner", "later", "undated"]);
        assert_eq!(pending.tasks[1].due_date.as_deref(), Some("2024-06-12"));
        assert_eq!(pending.tasks[1].due_time.as_deref(), Some("09:00"));
        assert_eq!(pending.tasks[2].due_date, None);
    }

    #[test]
    fn test_is_due_soon_requires_same_day() {
        let store_task = Task {
            id: 1,
            user_id: None,
            title: "midnight".to_string(),
            description: String::new(),
            due_date: Some(date(11)),
            due_time: NaiveTime::from_hms_opt(0, 3, 0),
            priority: TaskPriority::Medium,
            completed: false,
            notified_10min: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        assert!(!is_due_soon(&store_task, at(10, 23, 58)));
        assert!(is_due_soon(&store_task, at(11, 0, 0)));
    }
}
