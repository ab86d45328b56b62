//! The allocation workflow: the only writer of status fields on pickup
//! requests and collection points. Every operation here runs as one
//! all-or-nothing unit over the ledger.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::ledger::Txn;
use crate::models::audit::{ConfirmedPickup, RejectedPickup};
use crate::models::collection::{CollectionPoint, CollectionStatus};
use crate::models::pickup::{PickupStatus, WasteCategory};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct AllocationDetails {
    pub driver_name: String,
    pub capacity: u32,
    pub location: String,
    pub category: WasteCategory,
    pub user_phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionDetails {
    pub location: String,
    pub items: u32,
    pub category: WasteCategory,
    pub time_arrived: String,
    pub time_left: String,
    pub picture_proof: String,
}

/// Admin allocates a driver to a pending pickup request. The request
/// must still be `Pending`; allocating an already-allocated request is
/// a conflict, which keeps at most one active collection point per
/// request.
pub async fn allocate(
    state: &AppState,
    request_id: Uuid,
    details: AllocationDetails,
) -> Result<CollectionPoint, AppError> {
    let driver = state
        .staff_by_name(&details.driver_name)
        .ok_or_else(|| AppError::NotFound("driver not found".to_string()))?;

    let outcome = state
        .ledger
        .transact(|txn| {
            let mut request = txn
                .request(request_id)
                .ok_or_else(|| AppError::NotFound("pick up request not found".to_string()))?;

            if request.status != PickupStatus::Pending {
                return Err(AppError::Conflict(
                    "pick up request already has an active allocation".to_string(),
                ));
            }

            let now = Utc::now();
            let scheduled = request.time;
            request.status = PickupStatus::DriverAllocated;
            request.updated_at = now;
            txn.put_request(request);

            let point = CollectionPoint {
                id: Uuid::new_v4(),
                driver_id: driver.id,
                request_id,
                driver_name: driver.name.clone(),
                collection_code: fresh_collection_code(txn),
                capacity: details.capacity,
                location: details.location.clone(),
                time: scheduled,
                category: details.category,
                user_phone: details.user_phone.clone(),
                status: CollectionStatus::Pending,
                created_at: now,
                updated_at: now,
            };
            txn.put_collection_point(point.clone());

            Ok(point)
        })
        .await;

    match &outcome {
        Ok(point) => {
            state
                .metrics
                .allocations_total
                .with_label_values(&["success"])
                .inc();
            state.metrics.active_collection_points.inc();
            info!(
                request_id = %request_id,
                driver_id = %driver.id,
                collection_code = %point.collection_code,
                "driver allocated"
            );
        }
        Err(_) => {
            state
                .metrics
                .allocations_total
                .with_label_values(&["error"])
                .inc();
        }
    }

    outcome
}

/// Driver completes an order. The collection point is found by the
/// request it was created for and must match the driver on both id and
/// name snapshot. Request update, collection-point update and audit
/// record land in one unit.
pub async fn complete_order(
    state: &AppState,
    order_id: Uuid,
    driver_id: Uuid,
    details: CompletionDetails,
) -> Result<ConfirmedPickup, AppError> {
    let driver = state
        .staff_by_id(driver_id)
        .ok_or_else(|| AppError::NotFound("driver not found".to_string()))?;

    let record = state
        .ledger
        .transact(|txn| {
            let mut point = assigned_collection_point(txn, order_id, driver.id, &driver.name)?;

            let mut request = txn
                .request(point.request_id)
                .ok_or_else(|| AppError::NotFound("pick up request not found".to_string()))?;

            let now = Utc::now();
            request.status = PickupStatus::Completed;
            request.updated_at = now;
            txn.put_request(request);

            point.status = CollectionStatus::Completed;
            point.updated_at = now;
            let collection_code = point.collection_code.clone();
            txn.put_collection_point(point);

            let record = ConfirmedPickup {
                id: Uuid::new_v4(),
                driver_id: driver.id,
                order_id,
                collection_code,
                driver_name: driver.name.clone(),
                driver_phone: driver.phone.clone(),
                location: details.location.clone(),
                items: details.items,
                category: details.category,
                time_arrived: details.time_arrived.clone(),
                time_left: details.time_left.clone(),
                picture_proof: details.picture_proof.clone(),
                created_at: now,
            };
            txn.put_confirmed(record.clone());

            Ok(record)
        })
        .await?;

    state.metrics.completions_total.inc();
    state.metrics.active_collection_points.dec();
    info!(order_id = %order_id, driver_id = %driver_id, "order completed");

    Ok(record)
}

/// Driver rejects an order. The request becomes re-allocatable and the
/// collection point is deleted in the same unit that appends the
/// rejection record, so a stale collection point can never survive a
/// reverted request.
pub async fn reject_order(
    state: &AppState,
    order_id: Uuid,
    driver_id: Uuid,
    reject_reason: String,
) -> Result<RejectedPickup, AppError> {
    let driver = state
        .staff_by_id(driver_id)
        .ok_or_else(|| AppError::NotFound("driver not found".to_string()))?;

    let record = state
        .ledger
        .transact(|txn| {
            let point = assigned_collection_point(txn, order_id, driver.id, &driver.name)?;

            let mut request = txn
                .request(point.request_id)
                .ok_or_else(|| AppError::NotFound("pick up request not found".to_string()))?;

            let now = Utc::now();
            request.status = PickupStatus::Pending;
            request.updated_at = now;
            txn.put_request(request);

            txn.delete_collection_point(point.id);

            let record = RejectedPickup {
                id: Uuid::new_v4(),
                driver_id: driver.id,
                order_id,
                collection_code: point.collection_code.clone(),
                driver_name: driver.name.clone(),
                driver_phone: driver.phone.clone(),
                reject_reason: reject_reason.clone(),
                created_at: now,
            };
            txn.put_rejected(record.clone());

            Ok(record)
        })
        .await?;

    state.metrics.rejections_total.inc();
    state.metrics.active_collection_points.dec();
    info!(order_id = %order_id, driver_id = %driver_id, "order rejected");

    Ok(record)
}

/// Read-only lookup of a collection point by its human-searchable code.
pub async fn search_by_code(state: &AppState, code: &str) -> Result<CollectionPoint, AppError> {
    state
        .ledger
        .read(|shelves| {
            shelves
                .collection_points
                .values()
                .find(|point| point.collection_code == code)
                .cloned()
        })
        .await
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))
}

fn assigned_collection_point(
    txn: &Txn<'_>,
    order_id: Uuid,
    driver_id: Uuid,
    driver_name: &str,
) -> Result<CollectionPoint, AppError> {
    let point = txn
        .collection_point_for_request(order_id)
        .filter(|point| point.driver_id == driver_id && point.driver_name == driver_name)
        .ok_or_else(|| AppError::NotFound("pickup not available".to_string()))?;

    if point.status == CollectionStatus::Completed {
        return Err(AppError::Conflict("order already completed".to_string()));
    }

    Ok(point)
}

fn fresh_collection_code(txn: &Txn<'_>) -> String {
    loop {
        let tag = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
        let code = format!("CP-{tag}");
        if !txn.collection_code_in_use(&code) {
            return code;
        }
    }
}
