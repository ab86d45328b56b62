use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{password, Authenticated};
use crate::error::AppError;
use crate::models::audit::ContactMessage;
use crate::models::pickup::{PickupRequest, PickupStatus, WasteCategory};
use crate::state::AppState;

use super::PickupView;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user/request-pickup/:user_id", post(request_pickup))
        .route("/user/search-pickup", post(search_pickup))
        .route("/user/delete-pickup/:user_id/:order_id", delete(delete_pickup))
        .route("/users/:user_id", patch(update_profile))
        .route("/users/:user_id/password", put(update_password))
        .route("/user/completed-pickup/:user_id", get(completed_pickups))
        .route("/user/pending-pickup/:user_id", get(pending_pickups))
        .route("/user/all-user-pickups/:user_id", get(all_user_pickups))
        .route("/user/get-in-touch", post(get_in_touch))
}

#[derive(Deserialize)]
pub struct RequestPickupRequest {
    pub capacity: u32,
    pub location: String,
    pub time: DateTime<Utc>,
    pub category: WasteCategory,
}

#[derive(Deserialize)]
pub struct SearchPickupRequest {
    pub search_code: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: String,
}

async fn request_pickup(
    State(state): State<Arc<AppState>>,
    Authenticated(_claims): Authenticated,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<RequestPickupRequest>,
) -> Result<(StatusCode, Json<PickupRequest>), AppError> {
    let user = state
        .user_by_id(user_id)
        .ok_or_else(|| AppError::NotFound("user not found, login to continue".to_string()))?;

    let now = Utc::now();
    let request = PickupRequest {
        id: Uuid::new_v4(),
        user_id: user.id,
        user_name: user.name.clone(),
        phone: user.phone.clone(),
        capacity: payload.capacity,
        location: payload.location,
        time: payload.time,
        category: payload.category,
        status: PickupStatus::Pending,
        search_code: new_search_code(),
        created_at: now,
        updated_at: now,
    };

    let created = request.clone();
    state
        .ledger
        .transact(move |txn| {
            txn.put_request(created);
            Ok(())
        })
        .await?;

    state.metrics.pickup_requests_total.inc();
    Ok((StatusCode::CREATED, Json(request)))
}

async fn search_pickup(
    State(state): State<Arc<AppState>>,
    Authenticated(_claims): Authenticated,
    Json(payload): Json<SearchPickupRequest>,
) -> Result<Json<PickupView>, AppError> {
    let request = state
        .ledger
        .read(|shelves| {
            shelves
                .requests
                .values()
                .find(|request| request.search_code == payload.search_code)
                .cloned()
        })
        .await
        .ok_or_else(|| AppError::NotFound("pick up request not found".to_string()))?;

    Ok(Json(PickupView::from(request)))
}

async fn delete_pickup(
    State(state): State<Arc<AppState>>,
    Authenticated(_claims): Authenticated,
    Path((user_id, order_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    state
        .ledger
        .transact(|txn| {
            let request = txn
                .request(order_id)
                .filter(|request| request.user_id == user_id)
                .ok_or_else(|| AppError::NotFound("pick up request not found".to_string()))?;

            // An allocated request still has a live collection point; it
            // must be rejected by the driver before the user can delete it.
            if request.status == PickupStatus::DriverAllocated {
                return Err(AppError::Conflict(
                    "pick up request has an active allocation".to_string(),
                ));
            }

            txn.delete_request(request.id);
            Ok(())
        })
        .await?;

    Ok(Json(json!({ "success": "pick up request deleted" })))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Authenticated(_claims): Authenticated,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.name.is_none()
        && payload.email.is_none()
        && payload.phone.is_none()
        && payload.username.is_none()
    {
        return Err(AppError::BadRequest("no fields to update".to_string()));
    }

    if let Some(email) = payload.email.as_deref() {
        if !valid_email(email) {
            return Err(AppError::BadRequest("invalid email format".to_string()));
        }
    }
    if let Some(phone) = payload.phone.as_deref() {
        if !valid_phone(phone) {
            return Err(AppError::BadRequest(
                "invalid phone number format (e.g. +2347012345678 or 07012345678)".to_string(),
            ));
        }
    }

    let user = {
        let mut entry = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        if let Some(name) = payload.name {
            entry.name = name;
        }
        if let Some(email) = payload.email {
            entry.email = email;
        }
        if let Some(phone) = payload.phone {
            entry.phone = phone;
        }
        if let Some(username) = payload.username {
            entry.username = username;
        }
        entry.clone()
    };

    Ok(Json(json!({
        "success": "user profile updated successfully",
        "user": user,
    })))
}

async fn update_password(
    State(state): State<Arc<AppState>>,
    Authenticated(_claims): Authenticated,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(AppError::BadRequest(
            "please provide both current and new passwords".to_string(),
        ));
    }

    let mut entry = state
        .users
        .get_mut(&user_id)
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    if !password::verify_password(&payload.current_password, &entry.salt, &entry.password_digest) {
        return Err(AppError::BadRequest(
            "current password is incorrect".to_string(),
        ));
    }

    let salt = password::new_salt();
    entry.password_digest = password::hash_password(&payload.new_password, &salt);
    entry.salt = salt;

    Ok(Json(json!({ "success": "password updated successfully" })))
}

async fn completed_pickups(
    State(state): State<Arc<AppState>>,
    Authenticated(_claims): Authenticated,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let completed = user_pickups_with_status(&state, user_id, Some(PickupStatus::Completed)).await;
    Ok(Json(json!({ "completed_pickups": completed })))
}

async fn pending_pickups(
    State(state): State<Arc<AppState>>,
    Authenticated(_claims): Authenticated,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let pending = user_pickups_with_status(&state, user_id, Some(PickupStatus::Pending)).await;
    Ok(Json(json!({ "pending_pickups": pending })))
}

async fn all_user_pickups(
    State(state): State<Arc<AppState>>,
    Authenticated(_claims): Authenticated,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .user_by_id(user_id)
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let pickups = user_pickups_with_status(&state, user_id, None).await;
    let pickups: Vec<PickupView> = pickups.into_iter().map(PickupView::from).collect();

    Ok(Json(json!({
        "pickups": pickups,
        "name": user.name,
        "email": user.email,
        "username": user.username,
        "phone_number": user.phone,
    })))
}

async fn get_in_touch(
    State(state): State<Arc<AppState>>,
    Authenticated(_claims): Authenticated,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.name.is_empty() && payload.email.is_empty() && payload.message.is_empty() {
        return Err(AppError::BadRequest("nothing to submit".to_string()));
    }

    let submission = ContactMessage {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        phone_number: payload.phone_number,
        message: payload.message,
        created_at: Utc::now(),
    };
    state.contacts.insert(submission.id, submission.clone());

    Ok(Json(json!({
        "success": "we've received your message, we'll get in touch shortly",
        "submission": submission,
    })))
}

async fn user_pickups_with_status(
    state: &AppState,
    user_id: Uuid,
    status: Option<PickupStatus>,
) -> Vec<PickupRequest> {
    let mut requests = state
        .ledger
        .read(|shelves| {
            shelves
                .requests
                .values()
                .filter(|request| {
                    request.user_id == user_id
                        && status.is_none_or(|wanted| request.status == wanted)
                })
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    requests
}

fn new_search_code() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_uppercase()
}

fn valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

// Matches the accepted formats +234XXXXXXXXXX and 0XXXXXXXXXX where the
// first significant digit is 7, 8 or 9.
fn valid_phone(phone: &str) -> bool {
    let rest = phone
        .strip_prefix("+234")
        .or_else(|| phone.strip_prefix('0'));

    match rest {
        Some(digits) => {
            digits.len() == 10
                && digits.as_bytes().first().is_some_and(|&d| matches!(d, b'7' | b'8' | b'9'))
                && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}
