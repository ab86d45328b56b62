use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WasteCategory {
    Organic,
    Recyclable,
    Hazardous,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickupStatus {
    Pending,
    #[serde(rename = "Driver Allocated")]
    DriverAllocated,
    Completed,
}

/// A user's request for a waste collection. Status is owned by the
/// allocation workflow once the request exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub phone: String,
    pub capacity: u32,
    pub location: String,
    pub time: DateTime<Utc>,
    pub category: WasteCategory,
    pub status: PickupStatus,
    pub search_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
