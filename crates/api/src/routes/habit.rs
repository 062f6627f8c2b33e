//! Route definitions for `/habits` and `/habit-entries`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{habit, habit_entry};
use crate::state::AppState;

/// Routes mounted at `/habits`.
///
/// ```text
/// GET    /                  -> list (live stats)
/// POST   /                  -> create
/// POST   /streak-preview    -> streak_preview
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// GET    /{id}/stats        -> stats (?as_of=)
/// POST   /{id}/reset-stats  -> reset_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(habit::list).post(habit::create))
        .route("/streak-preview", post(habit::streak_preview))
        .route(
            "/{id}",
            get(habit::get_by_id)
                .put(habit::update)
                .delete(habit::delete),
        )
        .route("/{id}/stats", get(habit::stats))
        .route("/{id}/reset-stats", post(habit::reset_stats))
}

/// Routes mounted at `/habit-entries`.
///
/// ```text
/// GET    /      -> list (?habit_id=)
/// POST   /      -> create (upsert by habit and date)
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn entries_router() -> Router<AppState> {
    Router::new()
        .route("/", get(habit_entry::list).post(habit_entry::create))
        .route(
            "/{id}",
            get(habit_entry::get_by_id)
                .put(habit_entry::update)
                .delete(habit_entry::delete),
        )
}
