mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get_auth, post_json_auth, put_json_auth, register};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_account_summary_is_all_zero(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, token) = register(app.clone(), "Ada", "ada@example.com").await;

    let response = get_auth(app, "/api/v1/reports/summary", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["period"], "week");
    assert_eq!(data["tasks"]["total"], 0);
    assert_eq!(data["habits"]["total"], 0);
    assert_eq!(data["pomodoro"]["completed_sessions"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_counts_tasks_and_focus_time(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, token) = register(app.clone(), "Ada", "ada@example.com").await;

    for (title, status) in [("A", "done"), ("B", "todo"), ("C", "in_progress")] {
        post_json_auth(
            app.clone(),
            "/api/v1/tasks",
            json!({ "title": title, "status": status }),
            &token,
        )
        .await;
    }

    let response = post_json_auth(app.clone(), "/api/v1/pomodoro-sessions", json!({}), &token).await;
    let session_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    put_json_auth(
        app.clone(),
        &format!("/api/v1/pomodoro-sessions/{session_id}"),
        json!({ "status": "completed" }),
        &token,
    )
    .await;

    let response = get_auth(app.clone(), "/api/v1/reports/summary?period=all", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["period"], "all");
    assert_eq!(data["tasks"]["total"], 3);
    assert_eq!(data["tasks"]["completed"], 1);
    assert_eq!(data["pomodoro"]["completed_sessions"], 1);
    assert_eq!(data["pomodoro"]["focus_minutes"], 25);

    let response = get_auth(app, "/api/v1/reports/summary?period=decade", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
