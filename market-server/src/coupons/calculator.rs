//! Coupon discount calculator

use rust_decimal::prelude::*;
use shared::models::CouponType;

use crate::order_money::{to_decimal, to_f64};

/// Discount for a subtotal; never negative and never above the subtotal.
///
/// Free shipping yields 0 here, the delivery fee is waived by the caller.
pub fn calculate_discount(coupon_type: CouponType, value: f64, subtotal: f64) -> f64 {
    let subtotal = to_decimal(subtotal).max(Decimal::ZERO);
    let value = to_decimal(value).max(Decimal::ZERO);

    let discount = match coupon_type {
        CouponType::Percentage => subtotal * value / Decimal::ONE_HUNDRED,
        CouponType::Fixed => value,
        CouponType::FreeShipping => Decimal::ZERO,
    };

    to_f64(discount.min(subtotal))
}
