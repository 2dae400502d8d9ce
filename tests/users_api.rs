//! User CRUD endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use user_service::observability::LogLevel;

mod common;

#[tokio::test]
async fn test_create_and_list_users() {
    let (app, _logs) = common::test_app(LogLevel::Info);

    let created = common::send(
        &app,
        common::json_request("POST", "/api/users", json!({ "email": "ada@example.com", "name": "Ada" })),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let user = common::body_json(created).await;
    assert!(user["id"].as_str().unwrap().starts_with("user_"));
    assert_eq!(user["email"], "ada@example.com");
    assert!(user["createdAt"].is_string());

    let listed = common::body_json(common::send(&app, common::get("/api/users")).await).await;
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["users"][0]["id"], user["id"]);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let (app, logs) = common::test_app(LogLevel::Info);
    let body = json!({ "email": "ada@example.com", "name": "Ada" });

    common::send(&app, common::json_request("POST", "/api/users", body.clone())).await;
    let response = common::send(&app, common::json_request("POST", "/api/users", body)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let id = common::request_id(&response);
    let error = common::body_json(response).await;
    assert_eq!(error["error"], "User with this email already exists");

    let entries = logs.for_request(&id);
    assert!(entries.iter().any(|e| e["message"] == "User creation failed" && e["level"] == "WARN"));
    assert_eq!(entries.last().unwrap()["status_code"], 409);
}

#[tokio::test]
async fn test_invalid_input_is_bad_request() {
    let (app, _logs) = common::test_app(LogLevel::Info);

    let response = common::send(
        &app,
        common::json_request("POST", "/api/users", json!({ "email": "nope", "name": "Ada" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_update_delete_user() {
    let (app, _logs) = common::test_app(LogLevel::Info);

    let user = common::body_json(
        common::send(
            &app,
            common::json_request("POST", "/api/users", json!({ "email": "ada@example.com", "name": "Ada" })),
        )
        .await,
    )
    .await;
    let path = format!("/api/users/{}", user["id"].as_str().unwrap());

    let fetched = common::send(&app, common::get(&path)).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(common::body_json(fetched).await["name"], "Ada");

    let updated = common::send(&app, common::json_request("PATCH", &path, json!({ "name": "Ada Lovelace" }))).await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = common::body_json(updated).await;
    assert_eq!(updated["name"], "Ada Lovelace");
    assert_eq!(updated["email"], "ada@example.com");

    let deleted = common::send(
        &app,
        axum::http::Request::builder()
            .method("DELETE")
            .uri(&path)
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = common::send(&app, common::get(&path)).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let (app, _logs) = common::test_app(LogLevel::Info);

    let name = "x".repeat(2 * 1024 * 1024);
    let response = common::send(
        &app,
        common::json_request("POST", "/api/users", json!({ "email": "big@example.com", "name": name })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!common::request_id(&response).is_empty());
}

#[tokio::test]
async fn test_malformed_json_gets_error_body() {
    let (app, logs) = common::test_app(LogLevel::Info);

    let broken = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .header("x-request-id", "bad-json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = common::send(&app, broken).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert!(!body["error"].as_str().unwrap().is_empty());

    let end = logs.for_request("bad-json").pop().unwrap();
    assert_eq!(end["message"], "response sent");
    assert_eq!(end["status_code"], 400);

    let wrong_type = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "text/plain")
        .body(Body::from("email=ada@example.com"))
        .unwrap();
    let response = common::send(&app, wrong_type).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(common::body_json(response).await["error"].is_string());

    let missing_field =
        common::send(&app, common::json_request("POST", "/api/users", json!({ "email": "ada@example.com" }))).await;
    assert_eq!(missing_field.status(), StatusCode::BAD_REQUEST);
    assert!(common::body_json(missing_field).await["error"].is_string());
}
