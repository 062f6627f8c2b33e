mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_auth, post_auth, post_json, register};
use lockedin_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

fn registration(email: &str) -> serde_json::Value {
    json!({
        "name": "Ada",
        "email": email,
        "password": "password123",
        "password_confirmation": "password123",
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_tokens_and_user(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/register", registration("Ada@Example.com")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["token_type"], "Bearer");
    assert!(json["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(json["refresh_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["role"], "end_user");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_conflict(pool: PgPool) {
    let app = build_test_app(pool);
    register(app.clone(), "Ada", "ada@example.com").await;

    let response = post_json(app, "/api/v1/auth/register", registration("ADA@example.com")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_short_password_and_mismatch(pool: PgPool) {
    let app = build_test_app(pool);

    let short = json!({
        "name": "Ada",
        "email": "ada@example.com",
        "password": "short",
        "password_confirmation": "short",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", short).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let mismatch = json!({
        "name": "Ada",
        "email": "ada@example.com",
        "password": "password123",
        "password_confirmation": "password124",
    });
    let response = post_json(app, "/api/v1/auth/register", mismatch).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);
    register(app.clone(), "Ada", "ada@example.com").await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": "ada@example.com", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "nobody@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_account_cannot_log_in(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (user_id, _) = register(app.clone(), "Ada", "ada@example.com").await;
    UserRepo::set_active(&pool, user_id, false).await.unwrap();

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "ada@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_requires_a_valid_token(pool: PgPool) {
    let app = build_test_app(pool);
    let (user_id, token) = register(app.clone(), "Ada", "ada@example.com").await;

    let response = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.clone(), "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user_id);
    assert_eq!(json["data"]["email"], "ada@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_and_old_token_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        registration("ada@example.com"),
    )
    .await;
    let first = body_json(response).await["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": first }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], first.as_str());

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": first }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        registration("ada@example.com"),
    )
    .await;
    let json = body_json(response).await;
    let access = json["access_token"].as_str().unwrap().to_string();
    let refresh = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_auth(app.clone(), "/api/v1/auth/logout", &access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
