pub mod admin;
pub mod auth;
pub mod staff;
pub mod users;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;

use crate::models::collection::CollectionPoint;
use crate::models::format_display_date;
use crate::models::pickup::PickupRequest;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(admin::router())
        .merge(staff::router())
        .merge(users::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Pickup request with a display-formatted scheduled time alongside
/// the raw timestamp.
#[derive(Serialize)]
pub struct PickupView {
    #[serde(flatten)]
    pub request: PickupRequest,
    pub scheduled_for: String,
}

impl From<PickupRequest> for PickupView {
    fn from(request: PickupRequest) -> Self {
        let scheduled_for = format_display_date(request.time);
        Self {
            request,
            scheduled_for,
        }
    }
}

#[derive(Serialize)]
pub struct CollectionPointView {
    #[serde(flatten)]
    pub point: CollectionPoint,
    pub scheduled_for: String,
}

impl From<CollectionPoint> for CollectionPointView {
    fn from(point: CollectionPoint) -> Self {
        let scheduled_for = format_display_date(point.time);
        Self {
            point,
            scheduled_for,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    users: usize,
    requests: usize,
    collection_points: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (requests, collection_points) = state
        .ledger
        .read(|shelves| (shelves.requests.len(), shelves.collection_points.len()))
        .await;

    Json(HealthResponse {
        status: "ok",
        users: state.users.len(),
        requests,
        collection_points,
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
