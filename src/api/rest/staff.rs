use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::Authenticated;
use crate::error::AppError;
use crate::models::audit::{ConfirmedPickup, RejectedPickup};
use crate::models::user::Role;
use crate::state::AppState;
use crate::workflow::{self, CompletionDetails};

use super::CollectionPointView;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/staff/complete-order/:order_id/:driver_id",
            post(complete_order),
        )
        .route(
            "/staff/reject-order/:order_id/:driver_id",
            post(reject_order),
        )
        .route("/staff/search-order", post(search_order))
        .route("/staff/all-orders/:driver_id", get(all_orders))
}

#[derive(Deserialize)]
pub struct RejectOrderRequest {
    pub reject_reason: String,
}

#[derive(Deserialize)]
pub struct SearchOrderRequest {
    pub collection_code: String,
}

async fn complete_order(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
    Path((order_id, driver_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CompletionDetails>,
) -> Result<Json<ConfirmedPickup>, AppError> {
    claims.require(Role::Staff)?;
    claims.require_subject(driver_id)?;

    let record = workflow::complete_order(&state, order_id, driver_id, payload).await?;
    Ok(Json(record))
}

async fn reject_order(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
    Path((order_id, driver_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<RejectOrderRequest>,
) -> Result<Json<RejectedPickup>, AppError> {
    claims.require(Role::Staff)?;
    claims.require_subject(driver_id)?;

    let record = workflow::reject_order(&state, order_id, driver_id, payload.reject_reason).await?;
    Ok(Json(record))
}

async fn search_order(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
    Json(payload): Json<SearchOrderRequest>,
) -> Result<Json<CollectionPointView>, AppError> {
    claims.require(Role::Staff)?;

    let point = workflow::search_by_code(&state, &payload.collection_code).await?;
    Ok(Json(CollectionPointView::from(point)))
}

async fn all_orders(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
    Path(driver_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    claims.require(Role::Staff)?;

    let driver = state
        .staff_by_id(driver_id)
        .ok_or_else(|| AppError::NotFound("driver not found".to_string()))?;

    let mut points = state
        .ledger
        .read(|shelves| {
            shelves
                .collection_points
                .values()
                .filter(|point| point.driver_id == driver.id)
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;
    points.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let orders: Vec<CollectionPointView> =
        points.into_iter().map(CollectionPointView::from).collect();
    let total = orders.len();

    Ok(Json(json!({ "orders": orders, "total": total })))
}
