//! Route definitions for Pomodoro sessions and settings.

use axum::routing::get;
use axum::Router;

use crate::handlers::pomodoro;
use crate::state::AppState;

/// Routes mounted at `/pomodoro-sessions`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create
/// GET    /next  -> next
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn sessions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(pomodoro::list).post(pomodoro::create))
        .route("/next", get(pomodoro::next))
        .route(
            "/{id}",
            get(pomodoro::get_by_id)
                .put(pomodoro::update)
                .delete(pomodoro::delete),
        )
}

/// Routes mounted at `/pomodoro`.
///
/// ```text
/// GET /settings -> get_settings
/// PUT /settings -> update_settings
/// ```
pub fn settings_router() -> Router<AppState> {
    Router::new().route(
        "/settings",
        get(pomodoro::get_settings).put(pomodoro::update_settings),
    )
}
