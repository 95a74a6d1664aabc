use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::Result;
use super::{
    task_models::{NewTask, Task, TaskChanges},
    task_query::{TaskPredicate, TaskQuery},
};

/// Persistence boundary for tasks. Every mutating call is a single-row
/// atomic update.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, task: NewTask) -> Result<Task>;

    async fn get(&self, id: i64) -> Result<Option<Task>>;

    /// Full replace of the editable fields; resets `notified_10min` when the
    /// due date or time changes.
    async fn update(&self, id: i64, changes: TaskChanges) -> Result<Option<Task>>;

    async fn set_completed(&self, id: i64, completed: bool) -> Result<Option<Task>>;

    async fn delete(&self, id: i64) -> Result<u64>;

    async fn query(&self, query: TaskQuery) -> Result<Vec<Task>>;

    async fn count(&self, predicate: TaskPredicate) -> Result<i64>;

    /// Flips `notified_10min` to true only if the task is still incomplete,
    /// not yet notified and scheduled at the given date and time. Returns
    /// the task when this call performed the transition.
    async fn mark_notified(
        &self,
        id: i64,
        due_date: NaiveDate,
        due_time: Option<NaiveTime>,
    ) -> Result<Option<Task>>;
}

#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: TaskPredicate) {
    let mut separator = " WHERE ";

    if let Some(from) = predicate.due_from {
        builder.push(separator).push("due_date >= ").push_bind(from);
        separator = " AND ";
    }
    if let Some(until) = predicate.due_until {
        builder.push(separator).push("due_date <= ").push_bind(until);
        separator = " AND ";
    }
    if let Some(completed) = predicate.completed {
        builder.push(separator).push("completed = ").push_bind(completed);
        separator = " AND ";
    }
    if let Some(notified) = predicate.notified {
        builder.push(separator).push("notified_10min = ").push_bind(notified);
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (user_id, title, description, due_date, due_time, priority, completed)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.due_time)
        .bind(task.priority)
        .bind(task.completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn update(&self, id: i64, changes: TaskChanges) -> Result<Option<Task>> {
        // SET expressions see the pre-update row, so the CASE compares the
        // old schedule with the new one.
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET
                title = $1,
                description = $2,
                notified_10min = CASE
                    WHEN due_date IS DISTINCT FROM $3 OR due_time IS DISTINCT FROM $4 THEN FALSE
                    ELSE notified_10min
                END,
                due_date = $3,
                due_time = $4,
                priority = $5,
                completed = $6,
                updated_at = NOW()
             WHERE id = $7
             RETURNING *",
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.due_date)
        .bind(changes.due_time)
        .bind(changes.priority)
        .bind(changes.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn set_completed(&self, id: i64, completed: bool) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET completed = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING *",
        )
        .bind(completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn query(&self, query: TaskQuery) -> Result<Vec<Task>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM tasks");
        push_predicate(&mut builder, query.predicate);
        builder.push(" ORDER BY ").push(query.ordering.sql());

        let tasks = builder
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn count(&self, predicate: TaskPredicate) -> Result<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks");
        push_predicate(&mut builder, predicate);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn mark_notified(
        &self,
        id: i64,
        due_date: NaiveDate,
        due_time: Option<NaiveTime>,
    ) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET notified_10min = TRUE, updated_at = NOW()
             WHERE id = $1
               AND due_date = $2
               AND due_time IS NOT DISTINCT FROM $3
               AND completed = FALSE
               AND notified_10min = FALSE
             RETURNING *",
        )
        .bind(id)
        .bind(due_date)
        .bind(due_time)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }
}
