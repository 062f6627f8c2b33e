//! Pomodoro session and settings models.

use lockedin_core::pomodoro::{PomodoroSettings, SessionType};
use lockedin_core::reports::SessionSnapshot;
use lockedin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `pomodoro_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PomodoroSession {
    pub id: DbId,
    pub user_id: DbId,
    pub task_id: Option<DbId>,
    pub session_type: String,
    pub duration_minutes: i32,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PomodoroSession {
    pub fn session_type(&self) -> SessionType {
        self.session_type.parse().unwrap_or(SessionType::Work)
    }
}

impl From<&PomodoroSession> for SessionSnapshot {
    fn from(session: &PomodoroSession) -> Self {
        Self {
            session_type: session.session_type(),
            status: session.status.clone(),
            duration_minutes: session.duration_minutes,
        }
    }
}

/// DTO for starting a session. `duration_minutes` defaults to the user's
/// configured length for the session type.
#[derive(Debug, Deserialize)]
pub struct CreatePomodoroSession {
    pub task_id: Option<DbId>,
    pub session_type: Option<String>,
    pub duration_minutes: Option<i32>,
    pub start_time: Option<Timestamp>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePomodoroSession {
    pub task_id: Option<DbId>,
    pub status: Option<String>,
    pub end_time: Option<Timestamp>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

/// A row from the `pomodoro_settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct PomodoroSettingsRow {
    pub id: DbId,
    pub user_id: DbId,
    pub work_minutes: i32,
    pub short_break_minutes: i32,
    pub long_break_minutes: i32,
    pub long_break_interval: i32,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PomodoroSettingsRow> for PomodoroSettings {
    fn from(row: PomodoroSettingsRow) -> Self {
        Self {
            work_minutes: row.work_minutes,
            short_break_minutes: row.short_break_minutes,
            long_break_minutes: row.long_break_minutes,
            long_break_interval: row.long_break_interval,
            auto_start_breaks: row.auto_start_breaks,
            auto_start_pomodoros: row.auto_start_pomodoros,
        }
    }
}

/// Partial settings update, merged over the current (or default) values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePomodoroSettings {
    pub work_minutes: Option<i32>,
    pub short_break_minutes: Option<i32>,
    pub long_break_minutes: Option<i32>,
    pub long_break_interval: Option<i32>,
    pub auto_start_breaks: Option<bool>,
    pub auto_start_pomodoros: Option<bool>,
}

impl UpdatePomodoroSettings {
    pub fn apply(&self, current: PomodoroSettings) -> PomodoroSettings {
        PomodoroSettings {
            work_minutes: self.work_minutes.unwrap_or(current.work_minutes),
            short_break_minutes: self
                .short_break_minutes
                .unwrap_or(current.short_break_minutes),
            long_break_minutes: self.long_break_minutes.unwrap_or(current.long_break_minutes),
            long_break_interval: self
                .long_break_interval
                .unwrap_or(current.long_break_interval),
            auto_start_breaks: self.auto_start_breaks.unwrap_or(current.auto_start_breaks),
            auto_start_pomodoros: self
                .auto_start_pomodoros
                .unwrap_or(current.auto_start_pomodoros),
        }
    }
}
