//! Courier Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::approval::ApprovalStatus;

/// Courier vehicle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum VehicleType {
    Motorcycle,
    Bicycle,
    Car,
    Foot,
}

/// Independent courier (骑手)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Courier {
    pub id: i64,
    /// Identity-provider user id
    pub user_id: String,
    pub full_name: String,
    pub phone: String,
    pub vehicle_type: VehicleType,
    pub license_number: Option<String>,
    pub document_url: Option<String>,
    pub status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Courier {
    /// Approved and currently taking deliveries
    pub fn can_deliver(&self) -> bool {
        self.status == ApprovalStatus::Approved && self.is_available
    }
}

/// Courier registration payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CourierCreate {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(length(min = 1, max = 100))]
    pub phone: String,
    pub vehicle_type: VehicleType,
    #[validate(length(min = 1, max = 100))]
    pub license_number: Option<String>,
    #[validate(length(max = 2048))]
    pub document_url: Option<String>,
}

/// Availability toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierAvailabilityUpdate {
    pub is_available: bool,
}
