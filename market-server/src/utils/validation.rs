//! Input validation helpers
//!
//! Bridges `validator` derive errors into [`AppError`] and holds the numeric
//! checks that derive attributes cannot express (finite money values).

use serde_json::json;
use validator::{Validate, ValidationErrors};

use crate::utils::{AppError, ErrorCode};

/// Maximum accepted unit price / coupon value
pub const MAX_MONEY: f64 = 1_000_000.0;

/// Notes, reasons, comments
pub const MAX_NOTE_LEN: usize = 500;

/// Run `validator` rules on a payload
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

/// Convert `ValidationErrors` into a ValidationFailed error with per-field details
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
    fields.sort();

    AppError::with_message(
        ErrorCode::ValidationFailed,
        format!("Invalid fields: {}", fields.join(", ")),
    )
    .with_detail("fields", json!(fields))
}

/// Money must be finite, non-negative and below [`MAX_MONEY`]
pub fn validate_money(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be a finite number"),
        )
        .with_detail("field", field));
    }
    if value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be non-negative, got {value}"),
        )
        .with_detail("field", field));
    }
    if value > MAX_MONEY {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} exceeds maximum allowed ({MAX_MONEY})"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CouponValidateRequest;

    #[test]
    fn test_validate_payload_reports_fields() {
        let req = CouponValidateRequest {
            code: String::new(),
            subtotal: -1.0,
        };
        let err = validate_payload(&req).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Invalid fields: code, subtotal");
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money(0.0, "price").is_ok());
        assert!(validate_money(12.5, "price").is_ok());
        assert_eq!(
            validate_money(f64::NAN, "price").unwrap_err().code,
            ErrorCode::InvalidAmount
        );
        assert!(validate_money(-0.01, "price").is_err());
        assert!(validate_money(MAX_MONEY + 1.0, "price").is_err());
    }

    #[test]
    fn test_validate_optional_text() {
        assert!(validate_optional_text(&None, "note", 3).is_ok());
        assert!(validate_optional_text(&Some("abc".into()), "note", 3).is_ok());
        assert!(validate_optional_text(&Some("abcd".into()), "note", 3).is_err());
    }
}
