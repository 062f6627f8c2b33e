//! Repository for the `calendar_events` table.

use lockedin_core::calendar::{EVENT_CUSTOM, SOURCE_MANUAL};
use lockedin_core::types::DbId;
use sqlx::PgPool;

use crate::models::calendar_event::{
    CalendarEvent, CalendarRange, CreateCalendarEvent, UpdateCalendarEvent,
};

const COLUMNS: &str = "id, user_id, title, description, starts_at, ends_at, all_day, \
                       event_type, source_id, source_type, color, created_at, updated_at";

pub struct CalendarEventRepo;

impl CalendarEventRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCalendarEvent,
    ) -> Result<CalendarEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO calendar_events
                (user_id, title, description, starts_at, ends_at, all_day,
                 event_type, source_id, source_type, color)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(user_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.start)
            .bind(input.end)
            .bind(input.all_day.unwrap_or(false))
            .bind(input.event_type.as_deref().unwrap_or(EVENT_CUSTOM))
            .bind(input.source_id)
            .bind(input.source_type.as_deref().unwrap_or(SOURCE_MANUAL))
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calendar_events WHERE id = $1");
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's events overlapping `range`, in start order.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        range: &CalendarRange,
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE user_id = $1
               AND ($2::TIMESTAMPTZ IS NULL OR ends_at >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR starts_at <= $3)
             ORDER BY starts_at, id"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(user_id)
            .bind(range.from)
            .bind(range.to)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCalendarEvent,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE calendar_events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at),
                all_day = COALESCE($6, all_day),
                event_type = COALESCE($7, event_type),
                source_id = COALESCE($8, source_id),
                source_type = COALESCE($9, source_type),
                color = COALESCE($10, color)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.start)
            .bind(input.end)
            .bind(input.all_day)
            .bind(&input.event_type)
            .bind(input.source_id)
            .bind(&input.source_type)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
