//! Repositories for `pomodoro_sessions` and `pomodoro_settings`.

use lockedin_core::pomodoro::{PomodoroSettings, STATUS_COMPLETED, STATUS_IN_PROGRESS};
use lockedin_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::pomodoro::{PomodoroSession, PomodoroSettingsRow, UpdatePomodoroSession};

const SESSION_COLUMNS: &str = "id, user_id, task_id, session_type, duration_minutes, \
                               start_time, end_time, status, notes, created_at, updated_at";

const SETTINGS_COLUMNS: &str = "id, user_id, work_minutes, short_break_minutes, \
                                long_break_minutes, long_break_interval, auto_start_breaks, \
                                auto_start_pomodoros, created_at, updated_at";

/// Resolved values for a new session; defaults are applied by the handler.
#[derive(Debug)]
pub struct NewSession<'a> {
    pub task_id: Option<DbId>,
    pub session_type: &'a str,
    pub duration_minutes: i32,
    pub start_time: Timestamp,
    pub notes: Option<&'a str>,
}

pub struct PomodoroSessionRepo;

impl PomodoroSessionRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &NewSession<'_>,
    ) -> Result<PomodoroSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO pomodoro_sessions
                (user_id, task_id, session_type, duration_minutes, start_time, status, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, PomodoroSession>(&query)
            .bind(user_id)
            .bind(input.task_id)
            .bind(input.session_type)
            .bind(input.duration_minutes)
            .bind(input.start_time)
            .bind(STATUS_IN_PROGRESS)
            .bind(input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PomodoroSession>, sqlx::Error> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM pomodoro_sessions WHERE id = $1");
        sqlx::query_as::<_, PomodoroSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's sessions started at or after `since` (all for `None`),
    /// most recent first.
    pub async fn list_started_since(
        pool: &PgPool,
        user_id: DbId,
        since: Option<Timestamp>,
    ) -> Result<Vec<PomodoroSession>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM pomodoro_sessions
             WHERE user_id = $1 AND ($2::TIMESTAMPTZ IS NULL OR start_time >= $2)
             ORDER BY start_time DESC, id DESC"
        );
        sqlx::query_as::<_, PomodoroSession>(&query)
            .bind(user_id)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Session types of completed sessions since `since`, oldest first.
    pub async fn completed_types_since(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT session_type FROM pomodoro_sessions
             WHERE user_id = $1 AND status = $2 AND start_time >= $3
             ORDER BY start_time, id",
        )
        .bind(user_id)
        .bind(STATUS_COMPLETED)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Apply a patch. Completing a session without an explicit `end_time`
    /// stamps it with the current time.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePomodoroSession,
    ) -> Result<Option<PomodoroSession>, sqlx::Error> {
        let query = format!(
            "UPDATE pomodoro_sessions SET
                task_id = COALESCE($2, task_id),
                status = COALESCE($3, status),
                end_time = COALESCE($4, end_time,
                                    CASE WHEN $3 = '{STATUS_COMPLETED}' THEN NOW() END),
                duration_minutes = COALESCE($5, duration_minutes),
                notes = COALESCE($6, notes)
             WHERE id = $1
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, PomodoroSession>(&query)
            .bind(id)
            .bind(input.task_id)
            .bind(&input.status)
            .bind(input.end_time)
            .bind(input.duration_minutes)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pomodoro_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PomodoroSettingsRepo;

impl PomodoroSettingsRepo {
    /// The user's settings, or the defaults when none are stored.
    pub async fn get_or_default(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<PomodoroSettings, sqlx::Error> {
        let query = format!("SELECT {SETTINGS_COLUMNS} FROM pomodoro_settings WHERE user_id = $1");
        let row = sqlx::query_as::<_, PomodoroSettingsRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into).unwrap_or_default())
    }

    /// Insert or replace the user's settings.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        settings: &PomodoroSettings,
    ) -> Result<PomodoroSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO pomodoro_settings
                (user_id, work_minutes, short_break_minutes, long_break_minutes,
                 long_break_interval, auto_start_breaks, auto_start_pomodoros)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_pomodoro_settings_user_id DO UPDATE SET
                work_minutes = EXCLUDED.work_minutes,
                short_break_minutes = EXCLUDED.short_break_minutes,
                long_break_minutes = EXCLUDED.long_break_minutes,
                long_break_interval = EXCLUDED.long_break_interval,
                auto_start_breaks = EXCLUDED.auto_start_breaks,
                auto_start_pomodoros = EXCLUDED.auto_start_pomodoros
             RETURNING {SETTINGS_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PomodoroSettingsRow>(&query)
            .bind(user_id)
            .bind(settings.work_minutes)
            .bind(settings.short_break_minutes)
            .bind(settings.long_break_minutes)
            .bind(settings.long_break_interval)
            .bind(settings.auto_start_breaks)
            .bind(settings.auto_start_pomodoros)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }
}
