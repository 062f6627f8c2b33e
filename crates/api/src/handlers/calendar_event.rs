//! Handlers for the `/calendar-events` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lockedin_core::calendar;
use lockedin_core::types::DbId;
use lockedin_db::models::calendar_event::{
    CalendarEvent, CalendarRange, CreateCalendarEvent, UpdateCalendarEvent,
};
use lockedin_db::repositories::CalendarEventRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn load_owned(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<CalendarEvent> {
    let event = CalendarEventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("CalendarEvent", id))?;
    if event.user_id != user.user_id {
        return Err(AppError::forbidden("You do not own this event"));
    }
    Ok(event)
}

fn validate_vocab(event_type: Option<&str>, source_type: Option<&str>) -> Result<(), String> {
    if let Some(event_type) = event_type {
        calendar::validate_event_type(event_type)?;
    }
    if let Some(source_type) = source_type {
        calendar::validate_source_type(source_type)?;
    }
    Ok(())
}

/// GET /api/v1/calendar-events?from=&to=
///
/// Events overlapping the range; either bound may be omitted.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(range): Query<CalendarRange>,
) -> AppResult<Json<DataResponse<Vec<CalendarEvent>>>> {
    if let (Some(from), Some(to)) = (range.from, range.to) {
        calendar::validate_range(from, to).map_err(AppError::validation)?;
    }
    let events = CalendarEventRepo::list_for_user(&state.pool, user.user_id, &range).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/calendar-events
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCalendarEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<CalendarEvent>>)> {
    calendar::validate_title(&input.title).map_err(AppError::validation)?;
    validate_vocab(input.event_type.as_deref(), input.source_type.as_deref())
        .map_err(AppError::validation)?;
    calendar::validate_range(input.start, input.end).map_err(AppError::validation)?;

    let event = CalendarEventRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/calendar-events/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CalendarEvent>>> {
    let event = load_owned(&state, id, &user).await?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/calendar-events/{id}
///
/// The range check runs on the merged start and end, so moving only one
/// bound past the other is rejected.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCalendarEvent>,
) -> AppResult<Json<DataResponse<CalendarEvent>>> {
    let existing = load_owned(&state, id, &user).await?;

    if let Some(title) = &input.title {
        calendar::validate_title(title).map_err(AppError::validation)?;
    }
    validate_vocab(input.event_type.as_deref(), input.source_type.as_deref())
        .map_err(AppError::validation)?;
    calendar::validate_range(
        input.start.unwrap_or(existing.starts_at),
        input.end.unwrap_or(existing.ends_at),
    )
    .map_err(AppError::validation)?;

    let event = CalendarEventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("CalendarEvent", id))?;
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/calendar-events/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, id, &user).await?;
    if CalendarEventRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("CalendarEvent", id))
    }
}
