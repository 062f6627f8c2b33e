//! Handlers for the `/habit-entries` resource.
//!
//! Each write recomputes the owning habit's stats in the same transaction
//! (see `HabitEntryRepo`). After commit, crossing a streak milestone or
//! setting a new personal best is published on the event bus.
//!
//! Entries of other users are reported as 404. Naming another user's habit
//! (on create or as a list filter) is 403, as on the habit routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lockedin_core::notifications::{crossed_milestone, is_new_best};
use lockedin_core::types::DbId;
use lockedin_db::models::habit_entry::{
    CreateHabitEntry, HabitEntry, HabitEntryFilter, StatsChange, UpdateHabitEntry,
};
use lockedin_db::repositories::{HabitEntryRepo, HabitRepo};
use lockedin_events::{DomainEvent, EventKind};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::AsOfParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Publish milestone and best-streak events for a committed stats change.
pub(crate) fn publish_stats_events(state: &AppState, user_id: DbId, change: &StatsChange) {
    let habit = &change.habit;

    if let Some(milestone) = crossed_milestone(change.previous_streak, habit.streak) {
        state.event_bus.publish(DomainEvent::new(
            user_id,
            EventKind::StreakMilestone {
                habit_id: habit.id,
                habit_title: habit.title.clone(),
                streak: milestone,
            },
        ));
    }

    if is_new_best(change.previous_best, habit.best_streak) {
        state.event_bus.publish(DomainEvent::new(
            user_id,
            EventKind::BestStreak {
                habit_id: habit.id,
                habit_title: habit.title.clone(),
                best_streak: habit.best_streak,
            },
        ));
    }
}

async fn ensure_habit_owned(state: &AppState, habit_id: DbId, user: &AuthUser) -> AppResult<()> {
    let habit = HabitRepo::find_by_id(&state.pool, habit_id)
        .await?
        .ok_or_else(|| AppError::not_found("Habit", habit_id))?;
    if habit.user_id != user.user_id {
        return Err(AppError::forbidden("You do not own this habit"));
    }
    Ok(())
}

async fn load_owned(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<HabitEntry> {
    match HabitEntryRepo::find_by_id(&state.pool, id).await? {
        Some(entry) if entry.user_id == user.user_id => Ok(entry),
        _ => Err(AppError::not_found("HabitEntry", id)),
    }
}

/// GET /api/v1/habit-entries?habit_id=
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<HabitEntryFilter>,
) -> AppResult<Json<DataResponse<Vec<HabitEntry>>>> {
    if let Some(habit_id) = filter.habit_id {
        ensure_habit_owned(&state, habit_id, &user).await?;
    }
    let entries = HabitEntryRepo::list_for_user(&state.pool, user.user_id, filter.habit_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/habit-entries?as_of=
///
/// Upserts by `(habit_id, date)`: logging the same day twice overwrites the
/// first entry.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AsOfParams>,
    Json(input): Json<CreateHabitEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<HabitEntry>>)> {
    ensure_habit_owned(&state, input.habit_id, &user).await?;

    let write = HabitEntryRepo::upsert(&state.pool, user.user_id, &input, params.resolve())
        .await?
        .ok_or_else(|| AppError::not_found("Habit", input.habit_id))?;

    tracing::info!(
        habit_id = input.habit_id,
        entry_id = write.entry.id,
        date = %write.entry.date,
        streak = write.change.habit.streak,
        "Habit entry recorded"
    );
    publish_stats_events(&state, user.user_id, &write.change);

    Ok((StatusCode::CREATED, Json(DataResponse { data: write.entry })))
}

/// GET /api/v1/habit-entries/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<HabitEntry>>> {
    let entry = load_owned(&state, id, &user).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// PUT /api/v1/habit-entries/{id}?as_of=
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AsOfParams>,
    Json(input): Json<UpdateHabitEntry>,
) -> AppResult<Json<DataResponse<HabitEntry>>> {
    load_owned(&state, id, &user).await?;

    let write = HabitEntryRepo::update(&state.pool, id, &input, params.resolve())
        .await?
        .ok_or_else(|| AppError::not_found("HabitEntry", id))?;
    publish_stats_events(&state, user.user_id, &write.change);

    Ok(Json(DataResponse { data: write.entry }))
}

/// DELETE /api/v1/habit-entries/{id}?as_of=
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AsOfParams>,
) -> AppResult<StatusCode> {
    load_owned(&state, id, &user).await?;

    let change = HabitEntryRepo::delete(&state.pool, id, params.resolve())
        .await?
        .ok_or_else(|| AppError::not_found("HabitEntry", id))?;
    tracing::info!(
        entry_id = id,
        habit_id = change.habit.id,
        streak = change.habit.streak,
        "Habit entry deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
