mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get_auth, post_json_auth, promote, put_json_auth,
    register,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults_and_list_filters(pool: PgPool) {
    let app = build_test_app(pool);
    let (user_id, token) = register(app.clone(), "Ada", "ada@example.com").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "  Write report  " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await["data"].clone();
    assert_eq!(task["title"], "Write report");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["status"], "todo");
    assert_eq!(task["user_id"], user_id);
    assert_eq!(task["creator_id"], user_id);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "Ship it", "status": "done", "priority": "high" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app.clone(), "/api/v1/tasks?status=done", &token).await;
    let done = body_json(response).await["data"].clone();
    assert_eq!(done.as_array().unwrap().len(), 1);
    assert_eq!(done[0]["title"], "Ship it");

    let response = get_auth(app, "/api/v1/tasks", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_vocabulary_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, token) = register(app.clone(), "Ada", "ada@example.com").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "Task", "priority": "urgent" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json_auth(app.clone(), "/api/v1/tasks", json!({ "title": "   " }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app, "/api/v1/tasks?status=blocked", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn end_users_cannot_assign_to_others(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, token) = register(app.clone(), "Ada", "ada@example.com").await;
    let (other_id, _) = register(app.clone(), "Bob", "bob@example.com").await;

    let response = post_json_auth(
        app,
        "/api/v1/tasks",
        json!({ "title": "For Bob", "user_id": other_id }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_manager_assigns_and_creator_can_edit(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (manager_id, _) = register(app.clone(), "Mia", "mia@example.com").await;
    let manager = promote(&pool, manager_id, "task_manager").await;
    let (bob_id, bob) = register(app.clone(), "Bob", "bob@example.com").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "Review PR", "user_id": bob_id }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await["data"].clone();
    let task_id = task["id"].as_i64().unwrap();
    assert_eq!(task["user_id"], bob_id);
    assert_eq!(task["creator_id"], manager_id);

    // The assignee sees it in their own list.
    let response = get_auth(app.clone(), "/api/v1/tasks", &bob).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    // The creator may still edit it.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{task_id}"),
        json!({ "priority": "high" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["priority"], "high");

    // Assigning to a user that does not exist is a validation error.
    let response = post_json_auth(
        app,
        "/api/v1/tasks",
        json!({ "title": "Ghost", "user_id": 999_999 }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn strangers_cannot_read_edit_or_delete(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, owner) = register(app.clone(), "Ada", "ada@example.com").await;
    let (_, stranger) = register(app.clone(), "Eve", "eve@example.com").await;

    let response = post_json_auth(app.clone(), "/api/v1/tasks", json!({ "title": "Mine" }), &owner).await;
    let task_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tasks/{task_id}");

    let response = get_auth(app.clone(), &uri, &stranger).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(app.clone(), &uri, json!({ "title": "Yours" }), &stranger).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &stranger).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_must_belong_to_the_task_owner(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, ada) = register(app.clone(), "Ada", "ada@example.com").await;
    let (_, eve) = register(app.clone(), "Eve", "eve@example.com").await;

    let response = post_json_auth(app.clone(), "/api/v1/categories", json!({ "name": "Work" }), &eve).await;
    let eve_category = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "Sneaky", "category_id": eve_category }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(app.clone(), "/api/v1/categories", json!({ "name": "Home" }), &ada).await;
    let ada_category = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "Laundry", "category_id": ada_category }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app, &format!("/api/v1/tasks?category_id={ada_category}"), &ada).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}
