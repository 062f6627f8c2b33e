//! Habit model and DTOs.

use lockedin_core::habits::Frequency;
use lockedin_core::streak::HabitStats;
use lockedin_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `habits` table.
///
/// `streak`, `best_streak` and `total_completions` are written only by the
/// entry repository's recompute step and by the explicit reset.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Habit {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub frequency: String,
    pub target: i32,
    pub unit: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub streak: i32,
    pub best_streak: i32,
    pub total_completions: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Habit {
    /// Parsed frequency. The CHECK constraint keeps the column valid; an
    /// unexpected value falls back to daily.
    pub fn frequency(&self) -> Frequency {
        self.frequency.parse().unwrap_or(Frequency::Daily)
    }
}

/// A habit with its stats recomputed for the request's reference date.
#[derive(Debug, Clone, Serialize)]
pub struct HabitWithStats {
    #[serde(flatten)]
    pub habit: Habit,
    pub progress_percent: i32,
}

impl HabitWithStats {
    pub fn new(mut habit: Habit, stats: HabitStats) -> Self {
        habit.streak = stats.streak;
        habit.best_streak = stats.best_streak;
        habit.total_completions = stats.total_completions;
        Self {
            habit,
            progress_percent: stats.progress_percent,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateHabit {
    pub title: String,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub target: Option<i32>,
    pub unit: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

/// Stats fields are deliberately absent; unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateHabit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub target: Option<i32>,
    pub unit: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}
