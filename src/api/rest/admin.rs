use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{password, Authenticated};
use crate::error::AppError;
use crate::models::audit::StaffRemoval;
use crate::models::collection::CollectionPoint;
use crate::models::pickup::{PickupStatus, WasteCategory};
use crate::models::user::{Role, User};
use crate::state::AppState;
use crate::workflow::{self, AllocationDetails};

use super::PickupView;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/create-new-staff", post(create_new_staff))
        .route("/admin/update-pickup-request/:id", patch(allocate_driver))
        .route("/admin/all-users", get(all_users))
        .route("/admin/all-staff", get(all_staff))
        .route("/admin/all-pickup", get(all_pickups))
        .route("/admin/completed-pickup", get(completed_pickups))
        .route("/admin/pending-pickup", get(pending_pickups))
        .route(
            "/admin/delete-staff/:admin_id/:driver_id",
            delete(delete_staff),
        )
}

#[derive(Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct DeleteStaffRequest {
    pub reason: Option<String>,
}

async fn create_new_staff(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    claims.require(Role::Admin)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    if state.user_by_email(&payload.email).is_some() {
        return Err(AppError::BadRequest(
            "user with same email already exists".to_string(),
        ));
    }

    let default_password = password::generated_password();
    let salt = password::new_salt();

    let staff = User {
        id: Uuid::new_v4(),
        username: User::derive_username(&payload.name),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        role: Role::Staff,
        password_digest: password::hash_password(&default_password, &salt),
        salt,
        created_at: Utc::now(),
    };

    state.mailer.send(
        &staff.email,
        "Welcome to Trashaway Pickup",
        &format!(
            "Dear {}, your account has been created. Your default password is \
             {default_password}. Please log into your dashboard and change it.",
            staff.name
        ),
    );

    state.users.insert(staff.id, staff.clone());
    Ok((StatusCode::CREATED, Json(staff)))
}

async fn allocate_driver(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
    Path(id): Path<Uuid>,
    Json(payload): Json<AllocationDetails>,
) -> Result<Json<CollectionPoint>, AppError> {
    claims.require(Role::Admin)?;
    let point = workflow::allocate(&state, id, payload).await?;
    Ok(Json(point))
}

async fn all_users(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
) -> Result<Json<Value>, AppError> {
    claims.require(Role::Admin)?;
    let users = state.users_with_role(Role::User);
    let total = users.len();
    Ok(Json(json!({ "users": users, "total_users": total })))
}

async fn all_staff(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
) -> Result<Json<Value>, AppError> {
    claims.require(Role::Admin)?;
    let staff = state.users_with_role(Role::Staff);
    let total = staff.len();
    Ok(Json(json!({ "staff": staff, "total_staff": total })))
}

async fn all_pickups(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
) -> Result<Json<Value>, AppError> {
    claims.require(Role::Admin)?;

    let mut requests = state
        .ledger
        .read(|shelves| shelves.requests.values().cloned().collect::<Vec<_>>())
        .await;
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let count_category = |category: WasteCategory| {
        requests
            .iter()
            .filter(|request| request.category == category)
            .count()
    };
    let orders_count = json!({
        "organic": count_category(WasteCategory::Organic),
        "recyclable": count_category(WasteCategory::Recyclable),
        "hazardous": count_category(WasteCategory::Hazardous),
    });

    let role_counts = json!({
        "users": state.users_with_role(Role::User).len(),
        "staff": state.users_with_role(Role::Staff).len(),
    });

    let requests: Vec<PickupView> = requests.into_iter().map(PickupView::from).collect();

    Ok(Json(json!({
        "requests": requests,
        "orders_count": orders_count,
        "role_counts": role_counts,
    })))
}

async fn completed_pickups(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
) -> Result<Json<Value>, AppError> {
    claims.require(Role::Admin)?;
    let completed = pickups_with_status(&state, PickupStatus::Completed).await;
    Ok(Json(json!({ "completed_pickups": completed })))
}

async fn pending_pickups(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
) -> Result<Json<Value>, AppError> {
    claims.require(Role::Admin)?;
    let pending = pickups_with_status(&state, PickupStatus::Pending).await;
    Ok(Json(json!({ "pending_pickups": pending })))
}

async fn delete_staff(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
    Path((admin_id, driver_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<DeleteStaffRequest>,
) -> Result<Json<Value>, AppError> {
    claims.require(Role::Admin)?;

    let driver = state
        .staff_by_id(driver_id)
        .ok_or_else(|| AppError::NotFound("driver not found".to_string()))?;
    state
        .user_by_id(admin_id)
        .filter(|user| user.role == Role::Admin)
        .ok_or_else(|| AppError::NotFound("admin not found".to_string()))?;

    state.users.remove(&driver.id);

    let removal = StaffRemoval {
        id: Uuid::new_v4(),
        admin_id,
        driver_id,
        reason: payload.reason,
        created_at: Utc::now(),
    };
    state.staff_removals.insert(removal.id, removal.clone());

    Ok(Json(json!({
        "success": "staff deleted successfully",
        "removal": removal,
        "staff": driver,
    })))
}

async fn pickups_with_status(
    state: &AppState,
    status: PickupStatus,
) -> Vec<crate::models::pickup::PickupRequest> {
    let mut requests = state
        .ledger
        .read(|shelves| {
            shelves
                .requests
                .values()
                .filter(|request| request.status == status)
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    requests
}
