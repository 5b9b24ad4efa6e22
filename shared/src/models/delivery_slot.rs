//! Delivery Slot Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Capacity-limited delivery window of a company (配送时段)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DeliverySlot {
    pub id: i64,
    pub company_id: i64,
    /// Window start (Unix millis)
    pub starts_at: i64,
    /// Window end (Unix millis)
    pub ends_at: i64,
    pub max_orders: i64,
    pub current_orders: i64,
    pub is_active: bool,
    pub created_at: i64,
}

impl DeliverySlot {
    /// Whether another order fits in this slot
    pub fn has_capacity(&self) -> bool {
        self.current_orders < self.max_orders
    }

    /// Whether the slot can be offered to customers at `now_millis`
    pub fn is_offerable(&self, now_millis: i64) -> bool {
        self.is_active && self.has_capacity() && self.starts_at > now_millis
    }

    pub fn remaining(&self) -> i64 {
        (self.max_orders - self.current_orders).max(0)
    }
}

/// Create delivery slot payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeliverySlotCreate {
    pub starts_at: i64,
    pub ends_at: i64,
    #[validate(range(min = 1, max = 10_000))]
    pub max_orders: i64,
}
