//! Handlers for `/pomodoro-sessions` and `/pomodoro/settings`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use lockedin_core::pomodoro::{
    self, NextSession, PomodoroSettings, SessionType, STATUS_COMPLETED,
};
use lockedin_core::types::DbId;
use lockedin_db::models::pomodoro::{
    CreatePomodoroSession, PomodoroSession, UpdatePomodoroSession, UpdatePomodoroSettings,
};
use lockedin_db::repositories::pomodoro_repo::NewSession;
use lockedin_db::repositories::{PomodoroSessionRepo, PomodoroSettingsRepo, TaskRepo};
use lockedin_events::{DomainEvent, EventKind};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_owned(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<PomodoroSession> {
    let session = PomodoroSessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("PomodoroSession", id))?;
    if session.user_id != user.user_id {
        return Err(AppError::forbidden("You do not own this session"));
    }
    Ok(session)
}

/// A linked task must be one of the caller's. Returns its title.
async fn owned_task_title(
    state: &AppState,
    task_id: DbId,
    user: &AuthUser,
) -> AppResult<String> {
    match TaskRepo::find_by_id(&state.pool, task_id).await? {
        Some(task) if task.user_id == user.user_id => Ok(task.title),
        _ => Err(AppError::validation(format!(
            "task_id {task_id} does not reference one of your tasks"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// GET /api/v1/pomodoro-sessions
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PomodoroSession>>>> {
    let sessions = PomodoroSessionRepo::list_started_since(&state.pool, user.user_id, None).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/pomodoro-sessions
///
/// `session_type` defaults to work and `duration_minutes` to the caller's
/// configured length for that type.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePomodoroSession>,
) -> AppResult<(StatusCode, Json<DataResponse<PomodoroSession>>)> {
    let session_type = match input.session_type.as_deref() {
        Some(raw) => raw.parse::<SessionType>().map_err(AppError::validation)?,
        None => SessionType::Work,
    };
    let duration_minutes = match input.duration_minutes {
        Some(minutes) => minutes,
        None => {
            let settings = PomodoroSettingsRepo::get_or_default(&state.pool, user.user_id).await?;
            pomodoro::duration_for(session_type, &settings)
        }
    };
    pomodoro::validate_duration("duration_minutes", duration_minutes)
        .map_err(AppError::validation)?;
    pomodoro::validate_notes(input.notes.as_deref()).map_err(AppError::validation)?;
    if let Some(task_id) = input.task_id {
        owned_task_title(&state, task_id, &user).await?;
    }

    let session = PomodoroSessionRepo::create(
        &state.pool,
        user.user_id,
        &NewSession {
            task_id: input.task_id,
            session_type: session_type.as_str(),
            duration_minutes,
            start_time: input.start_time.unwrap_or_else(Utc::now),
            notes: input.notes.as_deref(),
        },
    )
    .await?;

    tracing::debug!(
        session_id = session.id,
        user_id = user.user_id,
        session_type = %session_type,
        "Pomodoro session started"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// GET /api/v1/pomodoro-sessions/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PomodoroSession>>> {
    let session = load_owned(&state, id, &user).await?;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/pomodoro-sessions/{id}
///
/// Completing a work session publishes `pomodoro.completed`.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePomodoroSession>,
) -> AppResult<Json<DataResponse<PomodoroSession>>> {
    let existing = load_owned(&state, id, &user).await?;

    if let Some(status) = &input.status {
        pomodoro::validate_status(status).map_err(AppError::validation)?;
    }
    if let Some(minutes) = input.duration_minutes {
        pomodoro::validate_duration("duration_minutes", minutes).map_err(AppError::validation)?;
    }
    pomodoro::validate_notes(input.notes.as_deref()).map_err(AppError::validation)?;
    if let Some(task_id) = input.task_id {
        owned_task_title(&state, task_id, &user).await?;
    }

    let session = PomodoroSessionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("PomodoroSession", id))?;

    let just_completed =
        existing.status != STATUS_COMPLETED && session.status == STATUS_COMPLETED;
    if just_completed && session.session_type() == SessionType::Work {
        let task_title = match session.task_id {
            Some(task_id) => TaskRepo::find_by_id(&state.pool, task_id)
                .await?
                .map(|t| t.title),
            None => None,
        };
        state.event_bus.publish(DomainEvent::new(
            user.user_id,
            EventKind::PomodoroCompleted {
                session_id: session.id,
                duration_minutes: session.duration_minutes,
                task_title,
            },
        ));
    }

    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/pomodoro-sessions/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, id, &user).await?;
    if PomodoroSessionRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("PomodoroSession", id))
    }
}

/// GET /api/v1/pomodoro-sessions/next
///
/// The next session in the cycle, derived from sessions completed today
/// (UTC).
pub async fn next(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<NextSession>>> {
    let settings = PomodoroSettingsRepo::get_or_default(&state.pool, user.user_id).await?;
    let start_of_day = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::InternalError("Invalid start of day".into()))?;

    let completed: Vec<SessionType> =
        PomodoroSessionRepo::completed_types_since(&state.pool, user.user_id, start_of_day)
            .await?
            .iter()
            .filter_map(|raw| raw.parse().ok())
            .collect();

    let (last, work_since_long_break) = pomodoro::cycle_position(&completed);
    let next = pomodoro::next_session(last, work_since_long_break, &settings);
    Ok(Json(DataResponse { data: next }))
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// GET /api/v1/pomodoro/settings
pub async fn get_settings(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PomodoroSettings>>> {
    let settings = PomodoroSettingsRepo::get_or_default(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/pomodoro/settings
///
/// Partial update over the current (or default) settings.
pub async fn update_settings(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdatePomodoroSettings>,
) -> AppResult<Json<DataResponse<PomodoroSettings>>> {
    let current = PomodoroSettingsRepo::get_or_default(&state.pool, user.user_id).await?;
    let merged = input.apply(current);
    merged.validate().map_err(AppError::validation)?;

    let settings = PomodoroSettingsRepo::upsert(&state.pool, user.user_id, &merged).await?;
    Ok(Json(DataResponse { data: settings }))
}
