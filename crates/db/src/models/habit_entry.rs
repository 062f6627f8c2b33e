//! Habit entry model and DTOs.

use lockedin_core::streak::CompletionRecord;
use lockedin_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::habit::Habit;

/// A row from the `habit_entries` table. One per (habit, date).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HabitEntry {
    pub id: DbId,
    pub habit_id: DbId,
    pub user_id: DbId,
    pub date: CalendarDate,
    pub completed: bool,
    pub value: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The minimal projection the streak calculator needs.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct EntryCompletion {
    pub habit_id: DbId,
    pub date: CalendarDate,
    pub completed: bool,
}

impl From<EntryCompletion> for CompletionRecord {
    fn from(row: EntryCompletion) -> Self {
        CompletionRecord::new(row.date, row.completed)
    }
}

/// Upsert payload: a second create for the same (habit, date) overwrites
/// `completed` and `value`.
#[derive(Debug, Deserialize)]
pub struct CreateHabitEntry {
    pub habit_id: DbId,
    pub date: CalendarDate,
    pub completed: Option<bool>,
    pub value: Option<i32>,
}

/// `value` distinguishes a missing key (keep) from an explicit `null`
/// (clear).
#[derive(Debug, Default, Deserialize)]
#[allow(clippy::option_option)]
pub struct UpdateHabitEntry {
    pub date: Option<CalendarDate>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub value: Option<Option<i32>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HabitEntryFilter {
    pub habit_id: Option<DbId>,
}

/// The habit's stats before and after an entry mutation.
///
/// Handlers compare the two to decide which domain events to publish.
#[derive(Debug, Clone)]
pub struct StatsChange {
    pub habit: Habit,
    pub previous_streak: i32,
    pub previous_best: i32,
}

/// Result of an entry create or update.
#[derive(Debug, Clone)]
pub struct EntryWrite {
    pub entry: HabitEntry,
    pub change: StatsChange,
}
