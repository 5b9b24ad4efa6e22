//! Company Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::approval::ApprovalStatus;
use super::plan::{DeliveryType, Plan};

/// Company entity (restaurant / shop)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Company {
    pub id: i64,
    /// Identity-provider user id of the owner
    pub owner_id: String,
    pub name: String,
    /// Tax identification number
    pub nif: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// ISO country code, e.g. "AO"
    pub country: String,
    pub city: Option<String>,
    pub plan: Plan,
    /// Accepted delivery types (JSON array)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub delivery_types: Vec<DeliveryType>,
    /// Flat delivery fee; server default when absent
    pub delivery_fee: Option<f64>,
    pub logo_url: Option<String>,
    pub document_url: Option<String>,
    pub status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Company {
    pub fn accepts(&self, delivery_type: DeliveryType) -> bool {
        self.delivery_types.contains(&delivery_type)
    }

    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }
}

/// Company registration payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompanyCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub nif: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub phone: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 2, max = 100))]
    pub country: String,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    pub plan: Option<Plan>,
    #[validate(length(min = 1))]
    pub delivery_types: Vec<DeliveryType>,
    #[validate(range(min = 0.0))]
    pub delivery_fee: Option<f64>,
    #[validate(length(max = 2048))]
    pub logo_url: Option<String>,
    #[validate(length(max = 2048))]
    pub document_url: Option<String>,
}

/// Company profile update payload (owner)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CompanyUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1))]
    pub delivery_types: Option<Vec<DeliveryType>>,
    #[validate(range(min = 0.0))]
    pub delivery_fee: Option<f64>,
    #[validate(length(max = 2048))]
    pub logo_url: Option<String>,
    #[validate(length(max = 2048))]
    pub document_url: Option<String>,
}

/// Admin-only plan change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyPlanUpdate {
    pub plan: Plan,
}
