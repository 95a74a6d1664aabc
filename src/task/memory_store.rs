use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::Result;
use super::{
    task_models::{NewTask, Task, TaskChanges},
    task_query::{TaskPredicate, TaskQuery},
    task_repository::TaskStore,
};

#[derive(Default)]
struct Inner {
    last_id: i64,
    tasks: BTreeMap<i64, Task>,
}

/// Process-local task store. Used when no database is configured and by
/// the tests.
#[derive(Default)]
pub struct MemoryTaskStore {
    inner: RwLock<Inner>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let task = Task {
            id: inner.last_id,
            user_id: task.user_id,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            due_time: task.due_time,
            priority: task.priority,
            completed: task.completed,
            notified_10min: false,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn update(&self, id: i64, changes: TaskChanges) -> Result<Option<Task>> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.get_mut(&id).map(|task| {
            changes.apply(task);
            task.clone()
        }))
    }

    async fn set_completed(&self, id: i64, completed: bool) -> Result<Option<Task>> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.get_mut(&id).map(|task| {
            task.completed = completed;
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.remove(&id).map_or(0, |_| 1))
    }

    async fn query(&self, query: TaskQuery) -> Result<Vec<Task>> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|task| query.predicate.matches(task))
            .cloned()
            .collect();
        query.ordering.sort(&mut tasks);

        Ok(tasks)
    }

    async fn count(&self, predicate: TaskPredicate) -> Result<i64> {
        let inner = self.inner.read().await;
        let count = inner
            .tasks
            .values()
            .filter(|task| predicate.matches(task))
            .count();

        Ok(count as i64)
    }

    async fn mark_notified(
        &self,
        id: i64,
        due_date: NaiveDate,
        due_time: Option<NaiveTime>,
    ) -> Result<Option<Task>> {
        let mut inner = self.inner.write().await;
        let Some(task) = inner.tasks.get_mut(&id) else {
            return Ok(None);
        };

        let armed = task.due_date == Some(due_date)
            && task.due_time == due_time
            && !task.completed
            && !task.notified_10min;
        if !armed {
            return Ok(None);
        }

        task.notified_10min = true;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }
}
