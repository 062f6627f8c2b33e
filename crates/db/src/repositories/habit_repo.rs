//! Repository for the `habits` table.
//!
//! Stats columns are never written here except by [`HabitRepo::reset_stats`];
//! entry mutations recompute them in [`super::HabitEntryRepo`].

use chrono::NaiveDate;
use lockedin_core::habits::Frequency;
use lockedin_core::streak::BestStreak;
use lockedin_core::types::DbId;
use sqlx::PgPool;

use super::habit_entry_repo;
use crate::models::habit::{CreateHabit, Habit, UpdateHabit};
use crate::models::habit_entry::StatsChange;

pub(crate) const COLUMNS: &str = "id, user_id, title, description, frequency, target, unit, \
                                  color, icon, is_active, streak, best_streak, \
                                  total_completions, created_at, updated_at";

pub struct HabitRepo;

impl HabitRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateHabit,
    ) -> Result<Habit, sqlx::Error> {
        let query = format!(
            "INSERT INTO habits
                (user_id, title, description, frequency, target, unit, color, icon, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Habit>(&query)
            .bind(user_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(
                input
                    .frequency
                    .as_deref()
                    .unwrap_or(Frequency::Daily.as_str()),
            )
            .bind(input.target.unwrap_or(1))
            .bind(input.unit.as_deref().map(str::trim).unwrap_or("times"))
            .bind(&input.color)
            .bind(&input.icon)
            .bind(input.is_active.unwrap_or(true))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Habit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM habits WHERE id = $1");
        sqlx::query_as::<_, Habit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's habits, oldest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Habit>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM habits WHERE user_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, Habit>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update descriptive fields. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHabit,
    ) -> Result<Option<Habit>, sqlx::Error> {
        let query = format!(
            "UPDATE habits SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                frequency = COALESCE($4, frequency),
                target = COALESCE($5, target),
                unit = COALESCE($6, unit),
                color = COALESCE($7, color),
                icon = COALESCE($8, icon),
                is_active = COALESCE($9, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Habit>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.frequency)
            .bind(input.target)
            .bind(input.unit.as_deref().map(str::trim))
            .bind(&input.color)
            .bind(&input.icon)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a habit and, by cascade, its entries.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recompute stats from entries alone, discarding the stored best streak.
    ///
    /// Returns `None` if the habit no longer exists.
    pub async fn reset_stats(
        pool: &PgPool,
        id: DbId,
        as_of: NaiveDate,
    ) -> Result<Option<StatsChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(habit) = habit_entry_repo::lock_habit(&mut tx, id).await? else {
            return Ok(None);
        };
        let change = habit_entry_repo::recompute(&mut tx, habit, BestStreak::Reset, as_of).await?;
        tx.commit().await?;
        Ok(Some(change))
    }
}
