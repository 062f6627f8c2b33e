//! Handlers for the `/habits` resource.
//!
//! Every read recomputes streak figures from the entries through
//! [`streak::evaluate`]; the stored columns only provide the best-streak
//! floor.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use lockedin_core::habits::{self, Frequency};
use lockedin_core::streak::{self, BestStreak, CompletionRecord, HabitStats};
use lockedin_core::types::DbId;
use lockedin_db::models::habit::{CreateHabit, Habit, HabitWithStats, UpdateHabit};
use lockedin_db::models::habit_entry::EntryCompletion;
use lockedin_db::repositories::{HabitEntryRepo, HabitRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::AsOfParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// `GET /habits/{id}/stats` payload.
#[derive(Debug, Serialize)]
pub struct HabitStatsResponse {
    pub habit_id: DbId,
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub stats: HabitStats,
}

/// One raw entry in a streak preview. `date` may be missing or malformed;
/// such entries are skipped.
#[derive(Debug, Deserialize)]
pub struct PreviewEntry {
    #[serde(default)]
    pub date: Option<String>,
    pub completed: bool,
}

/// Request body for `POST /habits/streak-preview`.
#[derive(Debug, Deserialize)]
pub struct StreakPreviewRequest {
    pub frequency: String,
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub entries: Vec<PreviewEntry>,
}

#[derive(Debug, Serialize)]
pub struct StreakPreviewResponse {
    #[serde(flatten)]
    pub stats: HabitStats,
    pub skipped_entries: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Live stats for `habit` from its completion rows.
pub(crate) fn live_stats(habit: &Habit, rows: &[EntryCompletion], as_of: NaiveDate) -> HabitStats {
    let records: Vec<CompletionRecord> = rows.iter().copied().map(Into::into).collect();
    streak::evaluate(
        habit.frequency(),
        &records,
        BestStreak::KeepStored(habit.best_streak),
        as_of,
    )
    .stats
}

/// Every habit of `user_id` with live stats, using one entries query.
pub(crate) async fn habits_with_stats(
    state: &AppState,
    user_id: DbId,
    as_of: NaiveDate,
) -> AppResult<Vec<HabitWithStats>> {
    let habits = HabitRepo::list_for_user(&state.pool, user_id).await?;
    let mut by_habit: HashMap<DbId, Vec<EntryCompletion>> = HashMap::new();
    for row in HabitEntryRepo::completions_for_user(&state.pool, user_id).await? {
        by_habit.entry(row.habit_id).or_default().push(row);
    }

    Ok(habits
        .into_iter()
        .map(|habit| {
            let rows = by_habit.get(&habit.id).map(Vec::as_slice).unwrap_or(&[]);
            let stats = live_stats(&habit, rows, as_of);
            HabitWithStats::new(habit, stats)
        })
        .collect())
}

async fn load_owned(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Habit> {
    let habit = HabitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Habit", id))?;
    if habit.user_id != user.user_id {
        return Err(AppError::forbidden("You do not own this habit"));
    }
    Ok(habit)
}

async fn with_stats(state: &AppState, habit: Habit, as_of: NaiveDate) -> AppResult<HabitWithStats> {
    let rows = HabitEntryRepo::completions_for_habit(&state.pool, habit.id).await?;
    let stats = live_stats(&habit, &rows, as_of);
    Ok(HabitWithStats::new(habit, stats))
}

fn validate_fields(
    title: Option<&str>,
    frequency: Option<&str>,
    target: Option<i32>,
    unit: Option<&str>,
    color: Option<&str>,
    icon: Option<&str>,
) -> Result<(), String> {
    if let Some(title) = title {
        habits::validate_title(title)?;
    }
    if let Some(frequency) = frequency {
        frequency.parse::<Frequency>()?;
    }
    if let Some(target) = target {
        habits::validate_target(target)?;
    }
    if let Some(unit) = unit {
        habits::validate_unit(unit)?;
    }
    habits::validate_appearance(color, icon)
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/habits?as_of=
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AsOfParams>,
) -> AppResult<Json<DataResponse<Vec<HabitWithStats>>>> {
    let habits = habits_with_stats(&state, user.user_id, params.resolve()).await?;
    Ok(Json(DataResponse { data: habits }))
}

/// POST /api/v1/habits
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateHabit>,
) -> AppResult<(StatusCode, Json<DataResponse<HabitWithStats>>)> {
    validate_fields(
        Some(&input.title),
        input.frequency.as_deref(),
        input.target,
        input.unit.as_deref(),
        input.color.as_deref(),
        input.icon.as_deref(),
    )
    .map_err(AppError::validation)?;

    let habit = HabitRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(habit_id = habit.id, user_id = user.user_id, "Habit created");

    let stats = HabitStats {
        streak: 0,
        best_streak: 0,
        total_completions: 0,
        progress_percent: 0,
    };
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: HabitWithStats::new(habit, stats),
        }),
    ))
}

/// GET /api/v1/habits/{id}?as_of=
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AsOfParams>,
) -> AppResult<Json<DataResponse<HabitWithStats>>> {
    let habit = load_owned(&state, id, &user).await?;
    let data = with_stats(&state, habit, params.resolve()).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/habits/{id}?as_of=
///
/// Stats fields are not writable; unknown JSON keys are ignored.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AsOfParams>,
    Json(input): Json<UpdateHabit>,
) -> AppResult<Json<DataResponse<HabitWithStats>>> {
    load_owned(&state, id, &user).await?;
    validate_fields(
        input.title.as_deref(),
        input.frequency.as_deref(),
        input.target,
        input.unit.as_deref(),
        input.color.as_deref(),
        input.icon.as_deref(),
    )
    .map_err(AppError::validation)?;

    let habit = HabitRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Habit", id))?;
    let data = with_stats(&state, habit, params.resolve()).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/habits/{id}
///
/// Removes the habit and all of its entries.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, id, &user).await?;
    if HabitRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Habit", id))
    }
}

// ---------------------------------------------------------------------------
// Streak operations
// ---------------------------------------------------------------------------

/// GET /api/v1/habits/{id}/stats?as_of=
pub async fn stats(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AsOfParams>,
) -> AppResult<Json<DataResponse<HabitStatsResponse>>> {
    let habit = load_owned(&state, id, &user).await?;
    let as_of = params.resolve();
    let rows = HabitEntryRepo::completions_for_habit(&state.pool, habit.id).await?;
    Ok(Json(DataResponse {
        data: HabitStatsResponse {
            habit_id: habit.id,
            as_of,
            stats: live_stats(&habit, &rows, as_of),
        },
    }))
}

/// POST /api/v1/habits/{id}/reset-stats?as_of=
///
/// Recompute the stored figures from the entries alone, dropping a best
/// streak that no remaining entries support.
pub async fn reset_stats(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AsOfParams>,
) -> AppResult<Json<DataResponse<HabitWithStats>>> {
    load_owned(&state, id, &user).await?;
    let as_of = params.resolve();
    let change = HabitRepo::reset_stats(&state.pool, id, as_of)
        .await?
        .ok_or_else(|| AppError::not_found("Habit", id))?;

    tracing::info!(
        habit_id = id,
        previous_best = change.previous_best,
        best_streak = change.habit.best_streak,
        "Habit stats reset"
    );

    let data = with_stats(&state, change.habit, as_of).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/habits/streak-preview
///
/// Stateless: computes stats for caller-supplied entries without touching
/// the database.
pub async fn streak_preview(
    user: AuthUser,
    Json(input): Json<StreakPreviewRequest>,
) -> AppResult<Json<DataResponse<StreakPreviewResponse>>> {
    let frequency: Frequency = input.frequency.parse().map_err(AppError::validation)?;
    let as_of = input
        .as_of
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let records: Vec<CompletionRecord> = input
        .entries
        .iter()
        .map(|e| match &e.date {
            Some(raw) => CompletionRecord::from_raw(raw, e.completed),
            None => CompletionRecord {
                date: None,
                completed: e.completed,
            },
        })
        .collect();

    let evaluation = streak::evaluate(frequency, &records, BestStreak::Reset, as_of);
    if evaluation.skipped > 0 {
        tracing::warn!(
            user_id = user.user_id,
            skipped = evaluation.skipped,
            "Streak preview skipped entries with missing or malformed dates"
        );
    }

    Ok(Json(DataResponse {
        data: StreakPreviewResponse {
            stats: evaluation.stats,
            skipped_entries: evaluation.skipped,
        },
    }))
}
