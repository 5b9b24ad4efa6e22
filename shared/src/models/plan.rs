//! Subscription plans and delivery types
//!
//! Every company is on a plan; the plan carries a fixed table of default
//! commission percentages keyed by delivery type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Company subscription plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum Plan {
    Basic,
    Premium,
}

/// How an order reaches the customer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum DeliveryType {
    /// Delivered by a platform courier
    PlatformDelivery,
    /// Delivered by the company's own staff
    SelfDelivery,
    /// Collected by the customer
    Pickup,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::Basic, Plan::Premium];

    /// Default commission percentage for a delivery type.
    ///
    /// | plan | platform | self | pickup |
    /// |------|----------|------|--------|
    /// | basic | 15 | 8 | 5 |
    /// | premium | 20 | 12 | 8 |
    pub const fn default_commission_percentage(&self, delivery_type: DeliveryType) -> f64 {
        match (self, delivery_type) {
            (Plan::Basic, DeliveryType::PlatformDelivery) => 15.0,
            (Plan::Basic, DeliveryType::SelfDelivery) => 8.0,
            (Plan::Basic, DeliveryType::Pickup) => 5.0,
            (Plan::Premium, DeliveryType::PlatformDelivery) => 20.0,
            (Plan::Premium, DeliveryType::SelfDelivery) => 12.0,
            (Plan::Premium, DeliveryType::Pickup) => 8.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Basic => "basic",
            Plan::Premium => "premium",
        }
    }
}

impl DeliveryType {
    pub const ALL: [DeliveryType; 3] = [
        DeliveryType::PlatformDelivery,
        DeliveryType::SelfDelivery,
        DeliveryType::Pickup,
    ];

    /// Whether the order travels to an address (and so carries a delivery fee)
    pub const fn is_delivered(&self) -> bool {
        !matches!(self, DeliveryType::Pickup)
    }

    /// Whether a platform courier is involved
    pub const fn needs_courier(&self) -> bool {
        matches!(self, DeliveryType::PlatformDelivery)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::PlatformDelivery => "platform_delivery",
            DeliveryType::SelfDelivery => "self_delivery",
            DeliveryType::Pickup => "pickup",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_tables() {
        let basic: Vec<f64> = DeliveryType::ALL
            .iter()
            .map(|dt| Plan::Basic.default_commission_percentage(*dt))
            .collect();
        let premium: Vec<f64> = DeliveryType::ALL
            .iter()
            .map(|dt| Plan::Premium.default_commission_percentage(*dt))
            .collect();

        assert_eq!(basic, vec![15.0, 8.0, 5.0]);
        assert_eq!(premium, vec![20.0, 12.0, 8.0]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&DeliveryType::PlatformDelivery).unwrap(),
            "\"platform_delivery\""
        );
        let plan: Plan = serde_json::from_str("\"premium\"").unwrap();
        assert_eq!(plan, Plan::Premium);
    }

    #[test]
    fn test_pickup_has_no_delivery() {
        assert!(!DeliveryType::Pickup.is_delivered());
        assert!(DeliveryType::SelfDelivery.is_delivered());
        assert!(!DeliveryType::SelfDelivery.needs_courier());
    }
}
