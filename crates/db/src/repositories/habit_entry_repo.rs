//! Repository for the `habit_entries` table.
//!
//! Every mutation runs in one transaction that locks the owning habit row,
//! writes the entry, reloads all of the habit's entries, runs the streak
//! calculator and writes the stats back. Two concurrent writers for the same
//! habit therefore serialize on the lock, and whichever commits last leaves
//! stats that reflect every entry present.

use chrono::NaiveDate;
use lockedin_core::streak::{self, BestStreak, CompletionRecord};
use lockedin_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use super::habit_repo::COLUMNS as HABIT_COLUMNS;
use crate::models::habit::Habit;
use crate::models::habit_entry::{
    CreateHabitEntry, EntryCompletion, EntryWrite, HabitEntry, StatsChange, UpdateHabitEntry,
};

const COLUMNS: &str = "id, habit_id, user_id, date, completed, value, created_at, updated_at";

pub struct HabitEntryRepo;

impl HabitEntryRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<HabitEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM habit_entries WHERE id = $1");
        sqlx::query_as::<_, HabitEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's entries, newest date first, optionally for one habit.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        habit_id: Option<DbId>,
    ) -> Result<Vec<HabitEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM habit_entries
             WHERE user_id = $1 AND ($2::BIGINT IS NULL OR habit_id = $2)
             ORDER BY date DESC, id DESC"
        );
        sqlx::query_as::<_, HabitEntry>(&query)
            .bind(user_id)
            .bind(habit_id)
            .fetch_all(pool)
            .await
    }

    /// Completion records for one habit.
    pub async fn completions_for_habit(
        pool: &PgPool,
        habit_id: DbId,
    ) -> Result<Vec<EntryCompletion>, sqlx::Error> {
        sqlx::query_as::<_, EntryCompletion>(
            "SELECT habit_id, date, completed FROM habit_entries WHERE habit_id = $1",
        )
        .bind(habit_id)
        .fetch_all(pool)
        .await
    }

    /// Completion records for all of a user's habits in one query.
    pub async fn completions_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<EntryCompletion>, sqlx::Error> {
        sqlx::query_as::<_, EntryCompletion>(
            "SELECT e.habit_id, e.date, e.completed
             FROM habit_entries e
             JOIN habits h ON h.id = e.habit_id
             WHERE h.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Insert or overwrite the entry for `(habit_id, date)` and recompute the
    /// habit's stats.
    ///
    /// Returns `None` if the habit does not exist.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateHabitEntry,
        as_of: NaiveDate,
    ) -> Result<Option<EntryWrite>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(habit) = lock_habit(&mut tx, input.habit_id).await? else {
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO habit_entries (habit_id, user_id, date, completed, value)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_habit_entries_habit_date
             DO UPDATE SET completed = EXCLUDED.completed, value = EXCLUDED.value
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, HabitEntry>(&query)
            .bind(input.habit_id)
            .bind(user_id)
            .bind(input.date)
            .bind(input.completed.unwrap_or(true))
            .bind(input.value)
            .fetch_one(&mut *tx)
            .await?;

        let best = BestStreak::KeepStored(habit.best_streak);
        let change = recompute(&mut tx, habit, best, as_of).await?;
        tx.commit().await?;
        Ok(Some(EntryWrite { entry, change }))
    }

    /// Update an entry and recompute its habit's stats.
    ///
    /// Moving an entry onto a date that already has one violates
    /// `uq_habit_entries_habit_date`. Returns `None` if the entry does not
    /// exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHabitEntry,
        as_of: NaiveDate,
    ) -> Result<Option<EntryWrite>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(habit) = lock_habit_of_entry(&mut tx, id).await? else {
            return Ok(None);
        };

        // Outer `Some` means the key was sent; the inner value may clear it.
        let value_provided = input.value.is_some();
        let value = input.value.flatten();

        let query = format!(
            "UPDATE habit_entries SET
                date = COALESCE($2, date),
                completed = COALESCE($3, completed),
                value = CASE WHEN $4 THEN $5 ELSE value END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(entry) = sqlx::query_as::<_, HabitEntry>(&query)
            .bind(id)
            .bind(input.date)
            .bind(input.completed)
            .bind(value_provided)
            .bind(value)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let best = BestStreak::KeepStored(habit.best_streak);
        let change = recompute(&mut tx, habit, best, as_of).await?;
        tx.commit().await?;
        Ok(Some(EntryWrite { entry, change }))
    }

    /// Delete an entry and recompute its habit's stats. The stored best
    /// streak survives even if this removes the run that set it.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        as_of: NaiveDate,
    ) -> Result<Option<StatsChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(habit) = lock_habit_of_entry(&mut tx, id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM habit_entries WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let best = BestStreak::KeepStored(habit.best_streak);
        let change = recompute(&mut tx, habit, best, as_of).await?;
        tx.commit().await?;
        Ok(Some(change))
    }
}

/// `SELECT ... FOR UPDATE` on the habit row.
pub(crate) async fn lock_habit(
    conn: &mut PgConnection,
    habit_id: DbId,
) -> Result<Option<Habit>, sqlx::Error> {
    let query = format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Habit>(&query)
        .bind(habit_id)
        .fetch_optional(conn)
        .await
}

async fn lock_habit_of_entry(
    conn: &mut PgConnection,
    entry_id: DbId,
) -> Result<Option<Habit>, sqlx::Error> {
    let query = format!(
        "SELECT {HABIT_COLUMNS} FROM habits
         WHERE id = (SELECT habit_id FROM habit_entries WHERE id = $1)
         FOR UPDATE"
    );
    sqlx::query_as::<_, Habit>(&query)
        .bind(entry_id)
        .fetch_optional(conn)
        .await
}

/// Reload the locked habit's entries, run the calculator and persist the
/// result. The caller owns the transaction and commits it.
pub(crate) async fn recompute(
    conn: &mut PgConnection,
    habit: Habit,
    best: BestStreak,
    as_of: NaiveDate,
) -> Result<StatsChange, sqlx::Error> {
    let rows = sqlx::query_as::<_, EntryCompletion>(
        "SELECT habit_id, date, completed FROM habit_entries WHERE habit_id = $1",
    )
    .bind(habit.id)
    .fetch_all(&mut *conn)
    .await?;
    let records: Vec<CompletionRecord> = rows.into_iter().map(Into::into).collect();

    let evaluation = streak::evaluate(habit.frequency(), &records, best, as_of);
    let stats = evaluation.stats;

    let query = format!(
        "UPDATE habits SET streak = $2, best_streak = $3, total_completions = $4
         WHERE id = $1
         RETURNING {HABIT_COLUMNS}"
    );
    let updated = sqlx::query_as::<_, Habit>(&query)
        .bind(habit.id)
        .bind(stats.streak)
        .bind(stats.best_streak)
        .bind(stats.total_completions)
        .fetch_one(&mut *conn)
        .await?;

    tracing::debug!(
        habit_id = habit.id,
        streak = stats.streak,
        best_streak = stats.best_streak,
        total_completions = stats.total_completions,
        "Recomputed habit stats"
    );

    Ok(StatsChange {
        habit: updated,
        previous_streak: habit.streak,
        previous_best: habit.best_streak,
    })
}
