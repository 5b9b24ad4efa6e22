//! Commission Config Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::plan::{DeliveryType, Plan};

/// Commission percentage override (佣金配置)
///
/// Keyed by (country, city, plan, delivery_type). A row with `city = None`
/// applies country-wide; a row with a city only applies there and wins over
/// the country-wide row. At most one active row may exist per key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CommissionConfig {
    pub id: i64,
    pub country: String,
    pub city: Option<String>,
    pub plan: Plan,
    pub delivery_type: DeliveryType,
    /// Percentage (15 = 15%)
    pub commission_percentage: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create commission config payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommissionConfigCreate {
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    pub plan: Plan,
    pub delivery_type: DeliveryType,
    #[validate(range(min = 0.0, max = 100.0))]
    pub commission_percentage: f64,
}

/// Update commission config payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommissionConfigUpdate {
    #[validate(range(min = 0.0, max = 100.0))]
    pub commission_percentage: Option<f64>,
    pub is_active: Option<bool>,
}

/// Where the commission rate of an order came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum CommissionSource {
    /// Active override for the company's city
    CityOverride,
    /// Active country-wide override
    CountryOverride,
    /// No override, plan default used
    PlanDefault,
    /// Override lookup failed, plan default used
    Degraded,
}

impl CommissionSource {
    pub fn is_override(&self) -> bool {
        matches!(self, Self::CityOverride | Self::CountryOverride)
    }
}

/// Resolved commission for an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommissionQuote {
    /// Percentage used (15 = 15%)
    pub rate: f64,
    /// Rounded to the nearest whole currency unit
    pub amount: f64,
    pub source: CommissionSource,
    /// Matching override row, if any
    pub config_id: Option<i64>,
}

/// Ad-hoc commission preview (admin tooling)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommissionPreviewRequest {
    #[validate(range(min = 0.0))]
    pub subtotal: f64,
    pub plan: Plan,
    pub delivery_type: DeliveryType,
    pub country: Option<String>,
    pub city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_out_of_range_percentage() {
        let payload = CommissionConfigCreate {
            country: "AO".to_string(),
            city: None,
            plan: Plan::Basic,
            delivery_type: DeliveryType::Pickup,
            commission_percentage: 120.0,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&CommissionSource::CityOverride).unwrap();
        assert_eq!(json, "\"city_override\"");
        assert!(CommissionSource::CountryOverride.is_override());
        assert!(!CommissionSource::Degraded.is_override());
    }
}
