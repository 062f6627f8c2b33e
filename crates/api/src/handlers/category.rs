//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lockedin_core::fields::{validate_optional_text, validate_required_text};
use lockedin_core::types::DbId;
use lockedin_db::models::category::{Category, CreateCategory, UpdateCategory};
use lockedin_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 255;
const MAX_COLOR_LENGTH: usize = 50;

fn validate_fields(
    name: Option<&str>,
    color: Option<&str>,
) -> Result<(), String> {
    if let Some(name) = name {
        validate_required_text("name", name, MAX_NAME_LENGTH)?;
    }
    validate_optional_text("color", color, MAX_COLOR_LENGTH)
}

/// Load a category, answering 403 if someone else owns it.
async fn load_owned(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Category> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    if category.user_id != user.user_id {
        return Err(AppError::forbidden("You do not own this category"));
    }
    Ok(category)
}

/// GET /api/v1/categories
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    validate_fields(Some(&input.name), input.color.as_deref()).map_err(AppError::validation)?;
    let category = CategoryRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = load_owned(&state, id, &user).await?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    load_owned(&state, id, &user).await?;
    validate_fields(input.name.as_deref(), input.color.as_deref())
        .map_err(AppError::validation)?;
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Tasks in the category survive with no category.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, id, &user).await?;
    if CategoryRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Category", id))
    }
}
