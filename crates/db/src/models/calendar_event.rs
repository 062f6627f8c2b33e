//! Calendar event model and DTOs.
//!
//! The columns are `starts_at`/`ends_at`; the JSON fields are `start`/`end`.

use lockedin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarEvent {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "start")]
    pub starts_at: Timestamp,
    #[serde(rename = "end")]
    pub ends_at: Timestamp,
    pub all_day: bool,
    pub event_type: String,
    pub source_id: Option<DbId>,
    pub source_type: String,
    pub color: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCalendarEvent {
    pub title: String,
    pub description: Option<String>,
    pub start: Timestamp,
    pub end: Timestamp,
    pub all_day: Option<bool>,
    pub event_type: Option<String>,
    pub source_id: Option<DbId>,
    pub source_type: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCalendarEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub all_day: Option<bool>,
    pub event_type: Option<String>,
    pub source_id: Option<DbId>,
    pub source_type: Option<String>,
    pub color: Option<String>,
}

/// Overlap window for listings: events that end at or after `from` and
/// start at or before `to`.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarRange {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}
