#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use chrono::Utc;
use serde_json::Value;
use trashaway::api::rest::router;
use trashaway::auth::password;
use trashaway::config::Config;
use trashaway::models::user::{Role, User};
use trashaway::state::AppState;
use uuid::Uuid;

pub fn test_config() -> Config {
    Config {
        http_port: 0,
        log_level: "info".to_string(),
        jwt_secret: "test-secret".to_string(),
        token_ttl_hours: 5,
    }
}

pub fn setup() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(&test_config()));
    (router(state.clone()), state)
}

pub fn seed_user(state: &AppState, name: &str, email: &str, role: Role, plain: &str) -> User {
    let salt = password::new_salt();
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        username: User::derive_username(name),
        email: email.to_string(),
        phone: "07012345678".to_string(),
        role,
        password_digest: password::hash_password(plain, &salt),
        salt,
        created_at: Utc::now(),
    };
    state.users.insert(user.id, user.clone());
    user
}

pub fn token_for(state: &AppState, user: &User) -> String {
    state.issue_token(user).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
