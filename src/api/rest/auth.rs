use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::password;
use crate::error::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/reset-password", put(reset_password))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "please enter both email and password".to_string(),
        ));
    }
    if state.user_by_email(&payload.email).is_some() {
        return Err(AppError::BadRequest(
            "user with same email already exists".to_string(),
        ));
    }

    let salt = password::new_salt();
    let user = User {
        id: Uuid::new_v4(),
        username: User::derive_username(&payload.name),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        role: Role::User,
        password_digest: password::hash_password(&payload.password, &salt),
        salt,
        created_at: Utc::now(),
    };

    state.users.insert(user.id, user.clone());
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "please enter both email and password".to_string(),
        ));
    }

    let user = state
        .user_by_email(&payload.email)
        .ok_or_else(|| AppError::BadRequest("invalid email or password".to_string()))?;

    if !password::verify_password(&payload.password, &user.salt, &user.password_digest) {
        return Err(AppError::BadRequest("invalid email or password".to_string()));
    }

    let token = state.issue_token(&user)?;

    Ok(Json(json!({
        "token": token,
        "user": user,
    })))
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .user_by_email(&payload.email)
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let new_password = password::generated_password();
    let salt = password::new_salt();
    let digest = password::hash_password(&new_password, &salt);

    {
        let mut entry = state
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
        entry.password_digest = digest;
        entry.salt = salt;
    }

    state.mailer.send(
        &user.email,
        "Password Reset Successful",
        &format!(
            "Your password has been reset to {new_password}. This is not a secure \
             password, kindly log into your dashboard and change it."
        ),
    );

    Ok(Json(json!({ "success": "password reset successfully" })))
}
