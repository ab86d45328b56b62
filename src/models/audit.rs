use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pickup::WasteCategory;

/// Immutable snapshot written when a driver completes an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedPickup {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub order_id: Uuid,
    pub collection_code: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub location: String,
    pub items: u32,
    pub category: WasteCategory,
    pub time_arrived: String,
    pub time_left: String,
    pub picture_proof: String,
    pub created_at: DateTime<Utc>,
}

/// Immutable snapshot written when a driver rejects an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedPickup {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub order_id: Uuid,
    pub collection_code: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub reject_reason: String,
    pub created_at: DateTime<Utc>,
}

/// Audit trail entry for an admin removing a staff account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRemoval {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub driver_id: Uuid,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
