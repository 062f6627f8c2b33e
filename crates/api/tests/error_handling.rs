//! `AppError` to HTTP response mapping.
//!
//! Most cases call `IntoResponse` directly; the database cases provoke real
//! constraint violations against a test database.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use lockedin_api::error::AppError;
use lockedin_core::error::CoreError;
use lockedin_db::models::user::CreateUser;
use lockedin_db::repositories::UserRepo;
use sqlx::PgPool;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn user(email: &str) -> CreateUser {
    CreateUser {
        name: "Ada".to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role: "end_user".to_string(),
    }
}

#[tokio::test]
async fn not_found_names_the_entity() {
    let (status, json) = error_to_response(AppError::not_found("Habit", 42)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Habit with id 42 not found");
}

#[tokio::test]
async fn validation_is_400() {
    let (status, json) = error_to_response(AppError::validation("title is required")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "title is required");
}

#[tokio::test]
async fn bad_request_is_400() {
    let (status, json) = error_to_response(AppError::BadRequest("malformed".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn auth_failures_map_to_401_and_403() {
    let (status, json) = error_to_response(AppError::unauthorized("no token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) = error_to_response(AppError::forbidden("not yours")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("secret connection string".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Internal("stack trace".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_is_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unique_violation_is_conflict(pool: PgPool) {
    UserRepo::create(&pool, &user("ada@example.com")).await.unwrap();
    let err = UserRepo::create(&pool, &user("ada@example.com"))
        .await
        .unwrap_err();

    let (status, json) = error_to_response(AppError::from(err)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].as_str().unwrap().contains("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_key_violation_is_400(pool: PgPool) {
    let err = sqlx::query("INSERT INTO categories (user_id, name) VALUES ($1, $2)")
        .bind(999_999_i64)
        .bind("Orphan")
        .execute(&pool)
        .await
        .unwrap_err();

    let (status, json) = error_to_response(AppError::from(err)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn check_violation_is_validation_error(pool: PgPool) {
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            role: "overlord".to_string(),
            ..user("ada@example.com")
        },
    )
    .await
    .unwrap_err();

    let (status, json) = error_to_response(AppError::from(err)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("ck_users_role"));
}
