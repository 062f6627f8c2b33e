//! Handlers for the `/tasks` resource.
//!
//! Owners read and delete their tasks. Owners, creators and admins may
//! edit. Placing a task in someone else's list needs a manager or admin
//! role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lockedin_core::tasks;
use lockedin_core::types::DbId;
use lockedin_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use lockedin_db::repositories::{CategoryRepo, TaskRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_task(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))
}

async fn load_owned(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Task> {
    let task = find_task(state, id).await?;
    if task.user_id != user.user_id {
        return Err(AppError::forbidden("You do not own this task"));
    }
    Ok(task)
}

fn validate_optional_vocab(priority: Option<&str>, status: Option<&str>) -> Result<(), String> {
    if let Some(priority) = priority {
        tasks::validate_priority(priority)?;
    }
    if let Some(status) = status {
        tasks::validate_status(status)?;
    }
    Ok(())
}

/// Check that `assignee_id` may receive a task from `user`, and exists.
async fn check_assignee(state: &AppState, user: &AuthUser, assignee_id: DbId) -> AppResult<()> {
    if !tasks::can_assign_to(user.user_id, &user.role, assignee_id) {
        return Err(AppError::forbidden(
            "Only task managers and admins can assign tasks to other users",
        ));
    }
    if assignee_id != user.user_id && UserRepo::find_by_id(&state.pool, assignee_id).await?.is_none()
    {
        return Err(AppError::validation(format!(
            "Assignee {assignee_id} does not exist"
        )));
    }
    Ok(())
}

async fn check_category(state: &AppState, category_id: Option<DbId>, owner_id: DbId) -> AppResult<()> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    if !CategoryRepo::is_owned_by(&state.pool, category_id, owner_id).await? {
        return Err(AppError::validation(format!(
            "category_id {category_id} does not belong to the task owner"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tasks?status=&priority=&category_id=
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    validate_optional_vocab(filter.priority.as_deref(), filter.status.as_deref())
        .map_err(AppError::validation)?;
    let tasks = TaskRepo::list_for_user(&state.pool, user.user_id, &filter).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/tasks
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    tasks::validate_title(&input.title).map_err(AppError::validation)?;
    tasks::validate_description(input.description.as_deref()).map_err(AppError::validation)?;
    validate_optional_vocab(input.priority.as_deref(), input.status.as_deref())
        .map_err(AppError::validation)?;

    let owner_id = input.user_id.unwrap_or(user.user_id);
    check_assignee(&state, &user, owner_id).await?;
    check_category(&state, input.category_id, owner_id).await?;

    let task = TaskRepo::create(&state.pool, owner_id, user.user_id, &input).await?;
    tracing::info!(task_id = task.id, owner_id, creator_id = user.user_id, "Task created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = load_owned(&state, id, &user).await?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = find_task(&state, id).await?;
    if !tasks::can_edit(task.user_id, task.creator_id, user.user_id, &user.role) {
        return Err(AppError::forbidden("You cannot edit this task"));
    }

    if let Some(title) = &input.title {
        tasks::validate_title(title).map_err(AppError::validation)?;
    }
    tasks::validate_description(input.description.as_deref()).map_err(AppError::validation)?;
    validate_optional_vocab(input.priority.as_deref(), input.status.as_deref())
        .map_err(AppError::validation)?;

    let owner_id = match input.user_id {
        Some(new_owner) if new_owner != task.user_id => {
            if !lockedin_core::roles::can_assign_tasks(&user.role) {
                return Err(AppError::forbidden(
                    "Only task managers and admins can reassign tasks",
                ));
            }
            check_assignee(&state, &user, new_owner).await?;
            new_owner
        }
        _ => task.user_id,
    };
    check_category(&state, input.category_id, owner_id).await?;

    let updated = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, id, &user).await?;
    if TaskRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Task", id))
    }
}
