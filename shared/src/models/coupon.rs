//! Coupon Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Coupon discount type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum CouponType {
    /// value is a percentage of the subtotal (10 = 10%)
    Percentage,
    /// value is a fixed amount off the subtotal
    Fixed,
    /// waives the delivery fee, value is ignored
    FreeShipping,
}

/// Coupon entity (优惠券)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: i64,
    /// Unique, stored upper-case
    pub code: String,
    pub coupon_type: CouponType,
    pub value: f64,
    pub min_order_value: Option<f64>,
    pub max_uses: Option<i64>,
    pub used_count: i64,
    /// Expiry (Unix millis)
    pub expires_at: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Coupon {
    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|max| self.used_count >= max)
    }

    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at.is_some_and(|exp| now_millis >= exp)
    }
}

/// Create coupon payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponCreate {
    #[validate(length(min = 3, max = 32))]
    pub code: String,
    pub coupon_type: CouponType,
    #[validate(range(min = 0.0))]
    pub value: f64,
    #[validate(range(min = 0.0))]
    pub min_order_value: Option<f64>,
    #[validate(range(min = 1))]
    pub max_uses: Option<i64>,
    pub expires_at: Option<i64>,
}

/// Update coupon payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CouponUpdate {
    #[validate(range(min = 0.0))]
    pub value: Option<f64>,
    #[validate(range(min = 0.0))]
    pub min_order_value: Option<f64>,
    #[validate(range(min = 1))]
    pub max_uses: Option<i64>,
    pub expires_at: Option<i64>,
    pub is_active: Option<bool>,
}

/// Check a code against an order before placing it
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponValidateRequest {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    #[validate(range(min = 0.0))]
    pub subtotal: f64,
}

/// Discount a coupon yields for a given subtotal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponQuote {
    pub coupon_id: i64,
    pub code: String,
    pub coupon_type: CouponType,
    pub discount_amount: f64,
    /// Caller must zero the delivery fee
    pub free_shipping: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(max_uses: Option<i64>, used_count: i64, expires_at: Option<i64>) -> Coupon {
        Coupon {
            id: 1,
            code: "WELCOME".to_string(),
            coupon_type: CouponType::Fixed,
            value: 100.0,
            min_order_value: None,
            max_uses,
            used_count,
            expires_at,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_exhausted() {
        assert!(!coupon(None, 1_000, None).is_exhausted());
        assert!(!coupon(Some(3), 2, None).is_exhausted());
        assert!(coupon(Some(3), 3, None).is_exhausted());
    }

    #[test]
    fn test_expired_at_boundary() {
        let c = coupon(None, 0, Some(1_000));
        assert!(!c.is_expired(999));
        assert!(c.is_expired(1_000));
    }
}
