//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Registration errors
/// - 4xxx: Order errors
/// - 5xxx: Coupon errors
/// - 6xxx: Delivery slot / upload errors
/// - 7xxx: Commission errors
/// - 8xxx: Notification errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Registration errors (3xxx)
    Registration,
    /// Order errors (4xxx)
    Order,
    /// Coupon errors (5xxx)
    Coupon,
    /// Delivery slot and upload errors (6xxx)
    Delivery,
    /// Commission errors (7xxx)
    Commission,
    /// Notification errors (8xxx)
    Notification,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Registration,
            4000..5000 => Self::Order,
            5000..6000 => Self::Coupon,
            6000..7000 => Self::Delivery,
            7000..8000 => Self::Commission,
            8000..9000 => Self::Notification,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Registration => "registration",
            Self::Order => "order",
            Self::Coupon => "coupon",
            Self::Delivery => "delivery",
            Self::Commission => "commission",
            Self::Notification => "notification",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
