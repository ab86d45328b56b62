use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CollectionStatus {
    Pending,
    Completed,
}

/// The allocation record created when an admin assigns a driver to a
/// pickup request. Capacity, location, time, category and the user's
/// phone are snapshots of the request at allocation time; the driver
/// name is a snapshot of the staff record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionPoint {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub request_id: Uuid,
    pub driver_name: String,
    pub collection_code: String,
    pub capacity: u32,
    pub location: String,
    pub time: DateTime<Utc>,
    pub category: super::pickup::WasteCategory,
    pub user_phone: String,
    pub status: CollectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
