//! Order Model
//!
//! Money fields are stored as `f64` and computed with `rust_decimal` on the
//! server. `commission_rate`/`commission_amount` are written once when the
//! order is created and never updated.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::commission::CommissionSource;
use super::plan::DeliveryType;

/// Maximum quantity per order line
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    InDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::InDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Lifecycle graph:
    ///
    /// ```text
    /// pending ─▶ confirmed ─▶ preparing ─▶ ready ─▶ in_delivery ─▶ delivered
    ///    │           │                       └──────(pickup)──────────▲
    ///    └───────────┴─▶ cancelled
    /// ```
    pub fn can_transition_to(&self, next: OrderStatus, delivery_type: DeliveryType) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed) | (Pending, Cancelled) => true,
            (Confirmed, Preparing) | (Confirmed, Cancelled) => true,
            (Preparing, Ready) => true,
            (Ready, InDelivery) => delivery_type.is_delivered(),
            (Ready, Delivered) => !delivery_type.is_delivered(),
            (InDelivery, Delivered) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::InDelivery => "in_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Identity-provider user id of the customer
    pub customer_id: String,
    pub company_id: i64,
    pub courier_id: Option<i64>,
    pub slot_id: Option<i64>,
    pub delivery_type: DeliveryType,
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount_amount: f64,
    pub coupon_code: Option<String>,
    pub commission_rate: f64,
    pub commission_amount: f64,
    pub commission_source: CommissionSource,
    pub total: f64,
    pub cancel_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
    pub note: Option<String>,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order line input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Place order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub company_id: i64,
    pub delivery_type: DeliveryType,
    #[validate(nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(length(min = 1, max = 500))]
    pub delivery_address: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub coupon_code: Option<String>,
    pub slot_id: Option<i64>,
}

/// Price an order without placing it
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderQuoteRequest {
    pub company_id: i64,
    pub delivery_type: DeliveryType,
    #[validate(nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(length(min = 1, max = 32))]
    pub coupon_code: Option<String>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Courier assignment payload (admin may name a courier, couriers assign themselves)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderAssign {
    pub courier_id: Option<i64>,
}

/// Cancel payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderCancel {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Computed money of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderEconomics {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount_amount: f64,
    pub free_shipping: bool,
    pub total: f64,
    pub commission_rate: f64,
    pub commission_amount: f64,
    pub commission_source: CommissionSource,
}

/// List filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub company_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_delivery() {
        use OrderStatus::*;
        let dt = DeliveryType::PlatformDelivery;
        let path = [Pending, Confirmed, Preparing, Ready, InDelivery, Delivered];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1], dt), "{:?}", pair);
        }
        assert!(!Ready.can_transition_to(Delivered, dt));
    }

    #[test]
    fn test_pickup_skips_in_delivery() {
        use OrderStatus::*;
        let dt = DeliveryType::Pickup;
        assert!(Ready.can_transition_to(Delivered, dt));
        assert!(!Ready.can_transition_to(InDelivery, dt));
    }

    #[test]
    fn test_cancel_only_before_preparing() {
        use OrderStatus::*;
        let dt = DeliveryType::SelfDelivery;
        assert!(Pending.can_transition_to(Cancelled, dt));
        assert!(Confirmed.can_transition_to(Cancelled, dt));
        assert!(!Preparing.can_transition_to(Cancelled, dt));
        assert!(!Delivered.can_transition_to(Cancelled, dt));
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        for next in OrderStatus::ALL {
            for dt in DeliveryType::ALL {
                assert!(!OrderStatus::Delivered.can_transition_to(next, dt));
                assert!(!OrderStatus::Cancelled.can_transition_to(next, dt));
            }
        }
    }
}
