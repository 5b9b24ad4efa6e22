//! Coupon applicability checks
//!
//! Checked in order: active, not expired, minimum order value, usage limit.
//! Each failure has its own error code. The usage check here is advisory;
//! the conditional UPDATE at redemption is what actually holds the limit.

use shared::models::Coupon;

use crate::utils::{AppError, AppResult, ErrorCode};

pub fn check_applicable(coupon: &Coupon, subtotal: f64, now: i64) -> AppResult<()> {
    if !coupon.is_active {
        return Err(AppError::new(ErrorCode::CouponInactive).with_detail("code", coupon.code.clone()));
    }

    if coupon.is_expired(now) {
        return Err(AppError::new(ErrorCode::CouponExpired)
            .with_detail("code", coupon.code.clone())
            .with_detail("expires_at", coupon.expires_at));
    }

    if let Some(min) = coupon.min_order_value
        && subtotal < min
    {
        return Err(AppError::with_message(
            ErrorCode::CouponMinimumNotMet,
            format!("Order subtotal {:.2} is below the coupon minimum {:.2}", subtotal, min),
        )
        .with_detail("min_order_value", min)
        .with_detail("subtotal", subtotal));
    }

    if coupon.is_exhausted() {
        return Err(AppError::new(ErrorCode::CouponExhausted).with_detail("code", coupon.code.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CouponType;

    const NOW: i64 = 1_700_000_000_000;

    fn coupon() -> Coupon {
        Coupon {
            id: 1,
            code: "BEMVINDO".to_string(),
            coupon_type: CouponType::Percentage,
            value: 10.0,
            min_order_value: None,
            max_uses: None,
            used_count: 0,
            expires_at: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn code_of(c: &Coupon, subtotal: f64) -> Option<ErrorCode> {
        check_applicable(c, subtotal, NOW).err().map(|e| e.code)
    }

    #[test]
    fn test_valid_coupon() {
        assert_eq!(code_of(&coupon(), 100.0), None);
    }

    #[test]
    fn test_inactive() {
        let mut c = coupon();
        c.is_active = false;
        assert_eq!(code_of(&c, 100.0), Some(ErrorCode::CouponInactive));
    }

    #[test]
    fn test_expired() {
        let mut c = coupon();
        c.expires_at = Some(NOW);
        assert_eq!(code_of(&c, 100.0), Some(ErrorCode::CouponExpired));
        c.expires_at = Some(NOW + 1);
        assert_eq!(code_of(&c, 100.0), None);
    }

    #[test]
    fn test_below_minimum() {
        let mut c = coupon();
        c.min_order_value = Some(500.0);
        assert_eq!(code_of(&c, 300.0), Some(ErrorCode::CouponMinimumNotMet));
        assert_eq!(code_of(&c, 500.0), None);
    }

    #[test]
    fn test_exhausted() {
        let mut c = coupon();
        c.max_uses = Some(5);
        c.used_count = 5;
        assert_eq!(code_of(&c, 100.0), Some(ErrorCode::CouponExhausted));
    }

    #[test]
    fn test_inactive_reported_before_other_failures() {
        let mut c = coupon();
        c.is_active = false;
        c.expires_at = Some(0);
        c.min_order_value = Some(1_000.0);
        assert_eq!(code_of(&c, 1.0), Some(ErrorCode::CouponInactive));
    }
}
