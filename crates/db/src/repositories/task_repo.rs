//! Repository for the `tasks` table.

use lockedin_core::tasks::{PRIORITY_MEDIUM, STATUS_DONE, STATUS_TODO};
use lockedin_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};

const COLUMNS: &str = "id, user_id, creator_id, category_id, title, description, priority, \
                       status, deadline, reminder_sent_at, overdue_notified_at, \
                       created_at, updated_at";

pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task owned by `owner_id` and created by `creator_id`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        creator_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (user_id, creator_id, category_id, title, description, priority, status, deadline)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .bind(creator_id)
            .bind(input.category_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.priority.as_deref().unwrap_or(PRIORITY_MEDIUM))
            .bind(input.status.as_deref().unwrap_or(STATUS_TODO))
            .bind(input.deadline)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's tasks, newest first, narrowed by any filters that are set.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TEXT IS NULL OR priority = $3)
               AND ($4::BIGINT IS NULL OR category_id = $4)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(&filter.status)
            .bind(&filter.priority)
            .bind(filter.category_id)
            .fetch_all(pool)
            .await
    }

    /// A user's tasks created at or after `since` (all of them for `None`).
    pub async fn list_created_since(
        pool: &PgPool,
        user_id: DbId,
        since: Option<Timestamp>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = $1 AND ($2::TIMESTAMPTZ IS NULL OR created_at >= $2)"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Changing the deadline clears both reminder markers so the new
    /// deadline gets its own notifications.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                user_id = COALESCE($2, user_id),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                priority = COALESCE($5, priority),
                status = COALESCE($6, status),
                category_id = COALESCE($8, category_id),
                reminder_sent_at = CASE WHEN $7::TIMESTAMPTZ IS DISTINCT FROM deadline
                                        AND $7 IS NOT NULL
                                        THEN NULL ELSE reminder_sent_at END,
                overdue_notified_at = CASE WHEN $7::TIMESTAMPTZ IS DISTINCT FROM deadline
                                           AND $7 IS NOT NULL
                                           THEN NULL ELSE overdue_notified_at END,
                deadline = COALESCE($7, deadline)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(input.user_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.priority)
            .bind(&input.status)
            .bind(input.deadline)
            .bind(input.category_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Claim open tasks whose deadline falls in `(now, until]` and that have
    /// not been reminded yet, stamping `reminder_sent_at` in the same
    /// statement so concurrent sweeps never claim a task twice.
    pub async fn claim_due_for_reminder(
        pool: &PgPool,
        now: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET reminder_sent_at = NOW()
             WHERE status <> $3
               AND deadline > $1 AND deadline <= $2
               AND reminder_sent_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(now)
            .bind(until)
            .bind(STATUS_DONE)
            .fetch_all(pool)
            .await
    }

    /// Claim open tasks whose deadline is at or before `now` and that have
    /// not had an overdue notice yet.
    pub async fn claim_overdue(pool: &PgPool, now: Timestamp) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET overdue_notified_at = NOW()
             WHERE status <> $2
               AND deadline <= $1
               AND overdue_notified_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(now)
            .bind(STATUS_DONE)
            .fetch_all(pool)
            .await
    }
}
