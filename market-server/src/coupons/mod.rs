//! Coupon application
//!
//! Look up a code, check it is applicable, and compute the discount.
//! Redemption itself (the usage counter) happens inside the order
//! transaction through [`coupon::redeem`](crate::db::repository::coupon::redeem).

mod calculator;
mod validator;

pub use calculator::calculate_discount;
pub use validator::check_applicable;

use shared::models::{Coupon, CouponQuote, CouponType};
use sqlx::SqliteExecutor;

use crate::db::repository::coupon;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Build the quote for an applicable coupon
pub fn quote(coupon: &Coupon, subtotal: f64) -> CouponQuote {
    CouponQuote {
        coupon_id: coupon.id,
        code: coupon.code.clone(),
        coupon_type: coupon.coupon_type,
        discount_amount: calculate_discount(coupon.coupon_type, coupon.value, subtotal),
        free_shipping: coupon.coupon_type == CouponType::FreeShipping,
    }
}

/// Look up `code` and validate it against `subtotal` at `now`
pub async fn validate_code<'e>(
    exec: impl SqliteExecutor<'e>,
    code: &str,
    subtotal: f64,
    now: i64,
) -> AppResult<(Coupon, CouponQuote)> {
    let normalized = shared::util::normalize_code(code);
    let found = coupon::find_by_code(exec, &normalized)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CouponNotFound,
                format!("Coupon {} not found", normalized),
            )
            .with_detail("code", normalized.clone())
        })?;

    check_applicable(&found, subtotal, now)?;
    let q = quote(&found, subtotal);
    Ok((found, q))
}
