//! End-to-end tests of the HTTP boundary over the in-memory store

use std::time::Duration;

use api::{AppState, create_router};
use auth::{AuthService, JwtConfig, JwtService, PasswordConfig, PasswordManager};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::memory::MemoryStore;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(store: &MemoryStore) -> Router {
    let repositories = store.repositories();
    let passwords = PasswordManager::new(&PasswordConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap();
    let jwt = JwtService::new(JwtConfig {
        secret: "http-test-secret".to_string(),
        expiry_seconds: 3600,
    })
    .unwrap();
    let auth = AuthService::new(repositories.users.clone(), passwords, jwt);
    create_router(AppState::new(repositories, auth), Duration::from_secs(5))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_and_login(app: &Router, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "jane", "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["userId"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], user_id.as_str());
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 3600);
    (user_id, body["token"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn health_reflects_store_availability() {
    let store = MemoryStore::new();
    let app = app(&store);

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    store.set_unavailable(true);
    let (status, _) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn registration_errors_map_to_statuses() {
    let store = MemoryStore::new();
    let app = app(&store);
    register_and_login(&app, "jane@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "jane", "email": "jane@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "user already exists");

    let (status, body) = send(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "jo", "email": "jo@example.com", "password": "1234567" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation failed");
    assert!(body["fields"]["username"].is_string());
    assert!(body["fields"]["password"].is_string());

    let (status, _) = send(&app, "POST", "/register", None, Some(json!({ "email": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.user_count(), 1);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let store = MemoryStore::new();
    let app = app(&store);
    register_and_login(&app, "jane@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "jane@example.com", "password": "password124" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let store = MemoryStore::new();
    let app = app(&store);

    let (status, _) = send(&app, "GET", "/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/profile", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/galleria",
        None,
        Some(json!({ "title": "sunset", "url": "https://x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(store.image_count(), 0);
}

#[tokio::test]
async fn profile_patch_round_trip() {
    let store = MemoryStore::new();
    let app = app(&store);
    let (user_id, token) = register_and_login(&app, "jane@example.com").await;

    let (status, _) = send(
        &app,
        "PATCH",
        "/profile",
        Some(&token),
        Some(json!({ "bio": "Landscape photographer" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, profile) = send(&app, "GET", "/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["id"], user_id.as_str());
    assert_eq!(profile["username"], "jane");
    assert_eq!(profile["bio"], "Landscape photographer");
    assert!(profile["avatarUrl"].is_null());
    assert!(profile.get("passwordHash").is_none());
}

#[tokio::test]
async fn publish_comment_and_like() {
    let store = MemoryStore::new();
    let app = app(&store);
    let (user_id, token) = register_and_login(&app, "jane@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/galleria",
        Some(&token),
        Some(json!({ "title": "sunset", "url": "ftp://x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["url"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/galleria",
        Some(&token),
        Some(json!({ "title": "sunset", "url": "https://x" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let image_id = body["imageId"].as_str().unwrap().to_string();

    let (status, image) = send(&app, "GET", &format!("/galleria/posts/{}", image_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(image["title"], "sunset");
    assert_eq!(image["userId"], user_id.as_str());

    let (status, body) = send(
        &app,
        "POST",
        &format!("/galleria/posts/{}", image_id),
        Some(&token),
        Some(json!({ "content": "lovely light" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = body["commentId"].as_str().unwrap().to_string();

    let (status, comments) = send(
        &app,
        "GET",
        &format!("/galleria/posts/{}/comments", image_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments[0]["id"], comment_id.as_str());
    assert_eq!(comments[0]["username"], "jane");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/galleria/posts/{}/like", image_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 1);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/comments/{}/like", comment_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 0);

    let (status, feed) = send(&app, "GET", "/galleria?page=0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed.as_array().unwrap().len(), 1);
    assert_eq!(feed[0]["likes"], 1);
}

#[tokio::test]
async fn unknown_and_malformed_identifiers() {
    let store = MemoryStore::new();
    let app = app(&store);
    let (_, token) = register_and_login(&app, "jane@example.com").await;
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/galleria/posts/{}", missing),
        Some(&token),
        Some(json!({ "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "image not found");

    let (status, _) = send(&app, "GET", &format!("/galleria/posts/{}/comments", missing), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/galleria/posts/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/galleria?page=-1", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_outage_is_an_opaque_500() {
    let store = MemoryStore::new();
    let app = app(&store);
    store.set_unavailable(true);

    let (status, body) = send(&app, "GET", "/galleria", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "something went wrong, please try again");
}
