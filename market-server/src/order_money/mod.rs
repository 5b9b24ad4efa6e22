//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic happens on `Decimal`; values are converted back to `f64`
//! (2 decimal places, midpoint away from zero) only for storage and
//! serialization.

use rust_decimal::prelude::*;
use shared::models::{
    CommissionQuote, CouponQuote, MAX_ITEM_QUANTITY, OrderEconomics, OrderItemInput,
};

use crate::utils::validation::{MAX_MONEY, MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{} must be a finite number, got {}", field_name, value),
        ));
    }
    Ok(())
}

/// Validate one line item before pricing
pub fn validate_item(item: &OrderItemInput) -> AppResult<()> {
    require_finite(item.unit_price, "unit_price")?;
    if item.unit_price < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("unit_price must be non-negative, got {}", item.unit_price),
        ));
    }
    if item.unit_price > MAX_MONEY {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!(
                "unit_price exceeds maximum allowed ({}), got {}",
                MAX_MONEY, item.unit_price
            ),
        ));
    }

    if item.quantity < 1 || item.quantity > MAX_ITEM_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!(
                "quantity must be between 1 and {}, got {}",
                MAX_ITEM_QUANTITY, item.quantity
            ),
        ));
    }

    if item.product_name.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "product_name must not be empty",
        ));
    }
    validate_optional_text(&item.note, "note", MAX_NOTE_LEN)?;
    Ok(())
}

/// Validate a whole basket: non-empty, every line valid
pub fn validate_items(items: &[OrderItemInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for item in items {
        validate_item(item)?;
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// unit_price × quantity
pub fn line_total(item: &OrderItemInput) -> Decimal {
    to_decimal(item.unit_price) * Decimal::from(item.quantity)
}

/// Sum of all line totals
pub fn calculate_subtotal(items: &[OrderItemInput]) -> f64 {
    to_f64(items.iter().map(line_total).sum())
}

/// Assemble the economics of an order.
///
/// `delivery_fee` is the company's flat fee for delivered orders (the caller
/// passes 0 for pickup). A free-shipping coupon waives it. The discount is
/// capped at the subtotal here as well as in the coupon calculator.
pub fn compute_economics(
    subtotal: f64,
    delivery_fee: f64,
    coupon: Option<&CouponQuote>,
    commission: &CommissionQuote,
) -> OrderEconomics {
    let subtotal_dec = to_decimal(subtotal);
    let free_shipping = coupon.is_some_and(|c| c.free_shipping);

    let fee = if free_shipping {
        Decimal::ZERO
    } else {
        to_decimal(delivery_fee).max(Decimal::ZERO)
    };

    let discount = coupon
        .map(|c| to_decimal(c.discount_amount))
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, subtotal_dec);

    let total = (subtotal_dec + fee - discount).max(Decimal::ZERO);

    OrderEconomics {
        subtotal: to_f64(subtotal_dec),
        delivery_fee: to_f64(fee),
        discount_amount: to_f64(discount),
        free_shipping,
        total: to_f64(total),
        commission_rate: commission.rate,
        commission_amount: commission.amount,
        commission_source: commission.source,
    }
}

/// Check if two monetary amounts are equal within tolerance
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() < MONEY_TOLERANCE
}
