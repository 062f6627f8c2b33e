pub mod auth;
pub mod calendar_event;
pub mod category;
pub mod habit;
pub mod health;
pub mod notification;
pub mod pomodoro;
pub mod report;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register | /auth/login | /auth/refresh      public
/// /auth/logout | /auth/me                           requires auth
///
/// /categories                                       list, create
/// /categories/{id}                                  get, update, delete
///
/// /tasks                                            list, create
/// /tasks/{id}                                       get, update, delete
///
/// /habits                                           list, create
/// /habits/streak-preview                            stateless preview (POST)
/// /habits/{id}                                      get, update, delete
/// /habits/{id}/stats                                live stats (GET)
/// /habits/{id}/reset-stats                          recompute best streak (POST)
///
/// /habit-entries                                    list, create (upsert)
/// /habit-entries/{id}                               get, update, delete
///
/// /pomodoro-sessions                                list, create
/// /pomodoro-sessions/next                           next session in the cycle
/// /pomodoro-sessions/{id}                           get, update, delete
/// /pomodoro/settings                                get, update
///
/// /calendar-events                                  list, create
/// /calendar-events/{id}                             get, update, delete
///
/// /notifications                                    list
/// /notifications/unread-count                       count (GET)
/// /notifications/read-all                           mark all read (POST)
/// /notifications/{id}/read                          mark read (POST)
/// /notifications/{id}                               update, delete
///
/// /reports/summary                                  summary (GET)
/// ```
///
/// Everything except register, login and refresh requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", category::router())
        .nest("/tasks", task::router())
        .nest("/habits", habit::router())
        .nest("/habit-entries", habit::entries_router())
        .nest("/pomodoro-sessions", pomodoro::sessions_router())
        .nest("/pomodoro", pomodoro::settings_router())
        .nest("/calendar-events", calendar_event::router())
        .nest("/notifications", notification::router())
        .nest("/reports", report::router())
}
