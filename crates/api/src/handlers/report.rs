//! Handler for `/reports/summary`.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use lockedin_core::reports::{
    self, HabitSnapshot, ReportPeriod, ReportSummary, SessionSnapshot, TaskSnapshot,
};
use lockedin_db::repositories::{PomodoroSessionRepo, TaskRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::habit::habits_with_stats;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub period: Option<String>,
}

/// GET /api/v1/reports/summary?period=week|month|all
///
/// Tasks are filtered by creation time and sessions by start time. Habit
/// figures are always all-time, with live streaks.
pub async fn summary(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> AppResult<Json<DataResponse<ReportSummary>>> {
    let period = match params.period.as_deref() {
        Some(raw) => raw.parse::<ReportPeriod>().map_err(AppError::validation)?,
        None => ReportPeriod::default(),
    };
    let now = Utc::now();
    let since = period.start(now);

    let tasks: Vec<TaskSnapshot> = TaskRepo::list_created_since(&state.pool, user.user_id, since)
        .await?
        .iter()
        .map(Into::into)
        .collect();

    let habits: Vec<HabitSnapshot> = habits_with_stats(&state, user.user_id, now.date_naive())
        .await?
        .iter()
        .map(|h| HabitSnapshot {
            is_active: h.habit.is_active,
            streak: h.habit.streak,
            best_streak: h.habit.best_streak,
            total_completions: h.habit.total_completions,
        })
        .collect();

    let sessions: Vec<SessionSnapshot> =
        PomodoroSessionRepo::list_started_since(&state.pool, user.user_id, since)
            .await?
            .iter()
            .map(Into::into)
            .collect();

    let summary = reports::summarize(period, &tasks, &habits, &sessions, now);
    Ok(Json(DataResponse { data: summary }))
}
