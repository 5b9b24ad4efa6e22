//! Unified error codes for the marketplace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Registration errors (customers, companies, couriers)
//! - 4xxx: Order errors
//! - 5xxx: Coupon errors
//! - 6xxx: Delivery slot / upload errors
//! - 7xxx: Commission errors
//! - 8xxx: Notification / rating errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Caller does not own the resource
    NotOwner = 2004,

    // ==================== 3xxx: Registration ====================
    /// Company not found
    CompanyNotFound = 3001,
    /// Courier not found
    CourierNotFound = 3002,
    /// Customer profile not found
    CustomerNotFound = 3003,
    /// Profile already registered for this user
    AlreadyRegistered = 3004,
    /// Company is not approved
    CompanyNotApproved = 3005,
    /// Courier is not approved
    CourierNotApproved = 3006,
    /// Approval status cannot move that way
    InvalidApprovalTransition = 3007,
    /// Courier is not available for deliveries
    CourierUnavailable = 3008,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Status transition not allowed
    InvalidStatusTransition = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Order has already been delivered
    OrderAlreadyDelivered = 4005,
    /// Company does not offer the delivery type
    DeliveryTypeNotSupported = 4006,
    /// A courier is already assigned
    CourierAlreadyAssigned = 4007,
    /// Order already rated by this user for this target
    RatingAlreadyExists = 4008,
    /// Order is not delivered yet
    OrderNotDelivered = 4009,
    /// Invalid quantity
    InvalidQuantity = 4010,
    /// Invalid amount
    InvalidAmount = 4011,

    // ==================== 5xxx: Coupon ====================
    /// Coupon code not found
    CouponNotFound = 5001,
    /// Coupon is not active
    CouponInactive = 5002,
    /// Coupon has expired
    CouponExpired = 5003,
    /// Coupon usage limit reached
    CouponExhausted = 5004,
    /// Order is below the coupon minimum
    CouponMinimumNotMet = 5005,
    /// Coupon code already exists
    CouponCodeExists = 5006,

    // ==================== 6xxx: Delivery slot ====================
    /// Delivery slot not found
    SlotNotFound = 6001,
    /// Delivery slot is full
    SlotFull = 6002,
    /// Delivery slot is not active
    SlotInactive = 6003,
    /// Slot belongs to another company
    SlotCompanyMismatch = 6004,
    /// Slot window is invalid
    SlotInvalidWindow = 6005,
    /// Slot still holds reservations
    SlotHasReservations = 6006,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// File storage failed
    FileStorageFailed = 6509,
    /// Unknown storage bucket
    UnknownBucket = 6510,

    // ==================== 7xxx: Commission ====================
    /// Commission config not found
    CommissionConfigNotFound = 7001,
    /// An active config already exists for the key
    CommissionConfigDuplicate = 7002,
    /// Commission percentage outside 0..=100
    InvalidCommissionRate = 7003,

    // ==================== 8xxx: Notification ====================
    /// Notification not found
    NotificationNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::NotOwner => "Resource belongs to another user",

            // Registration
            ErrorCode::CompanyNotFound => "Company not found",
            ErrorCode::CourierNotFound => "Courier not found",
            ErrorCode::CustomerNotFound => "Customer profile not found",
            ErrorCode::AlreadyRegistered => "Profile already registered",
            ErrorCode::CompanyNotApproved => "Company is not approved",
            ErrorCode::CourierNotApproved => "Courier is not approved",
            ErrorCode::InvalidApprovalTransition => "Approval status change not allowed",
            ErrorCode::CourierUnavailable => "Courier is not available",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::InvalidStatusTransition => "Order status change not allowed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderAlreadyDelivered => "Order has already been delivered",
            ErrorCode::DeliveryTypeNotSupported => "Delivery type not offered by company",
            ErrorCode::CourierAlreadyAssigned => "A courier is already assigned",
            ErrorCode::RatingAlreadyExists => "Rating already submitted",
            ErrorCode::OrderNotDelivered => "Order has not been delivered",
            ErrorCode::InvalidQuantity => "Invalid quantity",
            ErrorCode::InvalidAmount => "Invalid amount",

            // Coupon
            ErrorCode::CouponNotFound => "Coupon not found",
            ErrorCode::CouponInactive => "Coupon is not active",
            ErrorCode::CouponExpired => "Coupon has expired",
            ErrorCode::CouponExhausted => "Coupon usage limit reached",
            ErrorCode::CouponMinimumNotMet => "Order value below coupon minimum",
            ErrorCode::CouponCodeExists => "Coupon code already exists",

            // Delivery slot
            ErrorCode::SlotNotFound => "Delivery slot not found",
            ErrorCode::SlotFull => "Delivery slot is full",
            ErrorCode::SlotInactive => "Delivery slot is not active",
            ErrorCode::SlotCompanyMismatch => "Delivery slot belongs to another company",
            ErrorCode::SlotInvalidWindow => "Delivery slot window is invalid",
            ErrorCode::SlotHasReservations => "Delivery slot has reservations",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::FileStorageFailed => "File storage failed",
            ErrorCode::UnknownBucket => "Unknown storage bucket",

            // Commission
            ErrorCode::CommissionConfigNotFound => "Commission config not found",
            ErrorCode::CommissionConfigDuplicate => {
                "An active commission config already exists for this key"
            }
            ErrorCode::InvalidCommissionRate => "Commission percentage must be between 0 and 100",

            // Notification
            ErrorCode::NotificationNotFound => "Notification not found",

            // System
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::NotOwner),

            // Registration
            3001 => Ok(ErrorCode::CompanyNotFound),
            3002 => Ok(ErrorCode::CourierNotFound),
            3003 => Ok(ErrorCode::CustomerNotFound),
            3004 => Ok(ErrorCode::AlreadyRegistered),
            3005 => Ok(ErrorCode::CompanyNotApproved),
            3006 => Ok(ErrorCode::CourierNotApproved),
            3007 => Ok(ErrorCode::InvalidApprovalTransition),
            3008 => Ok(ErrorCode::CourierUnavailable),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4005 => Ok(ErrorCode::OrderAlreadyDelivered),
            4006 => Ok(ErrorCode::DeliveryTypeNotSupported),
            4007 => Ok(ErrorCode::CourierAlreadyAssigned),
            4008 => Ok(ErrorCode::RatingAlreadyExists),
            4009 => Ok(ErrorCode::OrderNotDelivered),
            4010 => Ok(ErrorCode::InvalidQuantity),
            4011 => Ok(ErrorCode::InvalidAmount),

            // Coupon
            5001 => Ok(ErrorCode::CouponNotFound),
            5002 => Ok(ErrorCode::CouponInactive),
            5003 => Ok(ErrorCode::CouponExpired),
            5004 => Ok(ErrorCode::CouponExhausted),
            5005 => Ok(ErrorCode::CouponMinimumNotMet),
            5006 => Ok(ErrorCode::CouponCodeExists),

            // Delivery slot
            6001 => Ok(ErrorCode::SlotNotFound),
            6002 => Ok(ErrorCode::SlotFull),
            6003 => Ok(ErrorCode::SlotInactive),
            6004 => Ok(ErrorCode::SlotCompanyMismatch),
            6005 => Ok(ErrorCode::SlotInvalidWindow),
            6006 => Ok(ErrorCode::SlotHasReservations),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6509 => Ok(ErrorCode::FileStorageFailed),
            6510 => Ok(ErrorCode::UnknownBucket),

            // Commission
            7001 => Ok(ErrorCode::CommissionConfigNotFound),
            7002 => Ok(ErrorCode::CommissionConfigDuplicate),
            7003 => Ok(ErrorCode::InvalidCommissionRate),

            // Notification
            8001 => Ok(ErrorCode::NotificationNotFound),

            // System
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
