//! Handlers for the `/notifications` resource.
//!
//! Rows belonging to other users are indistinguishable from missing ones
//! (404).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lockedin_core::notifications::clamp_limit;
use lockedin_core::types::DbId;
use lockedin_db::models::notification::{Notification, UpdateNotification};
use lockedin_db::repositories::NotificationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub unread_only: Option<bool>,
    /// Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

/// GET /api/v1/notifications?unread_only=&limit=&offset=
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let limit = clamp_limit(params.limit);
    let offset = params.offset.unwrap_or(0).max(0);
    let unread_only = params.unread_only.unwrap_or(false);

    let notifications =
        NotificationRepo::list_for_user(&state.pool, user.user_id, unread_only, limit, offset)
            .await?;
    Ok(Json(DataResponse { data: notifications }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = NotificationRepo::unread_count(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// POST /api/v1/notifications/{id}/read
pub async fn mark_read(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    set_read(&state, id, &user, true).await
}

/// PUT /api/v1/notifications/{id} with `{ "read": bool }`
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNotification>,
) -> AppResult<Json<DataResponse<Notification>>> {
    set_read(&state, id, &user, input.read).await
}

async fn set_read(
    state: &AppState,
    id: DbId,
    user: &AuthUser,
    read: bool,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = NotificationRepo::set_read(&state.pool, id, user.user_id, read)
        .await?
        .ok_or_else(|| AppError::not_found("Notification", id))?;
    Ok(Json(DataResponse { data: notification }))
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let updated = NotificationRepo::mark_all_read(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: MarkedRead { updated },
    }))
}

/// DELETE /api/v1/notifications/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if NotificationRepo::delete(&state.pool, id, user.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Notification", id))
    }
}
