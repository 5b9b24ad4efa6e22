//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CompanyNotFound
            | Self::CourierNotFound
            | Self::CustomerNotFound
            | Self::OrderNotFound
            | Self::CouponNotFound
            | Self::SlotNotFound
            | Self::CommissionConfigNotFound
            | Self::NotificationNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::AlreadyRegistered
            | Self::OrderAlreadyCancelled
            | Self::OrderAlreadyDelivered
            | Self::CourierAlreadyAssigned
            | Self::RatingAlreadyExists
            | Self::CouponCodeExists
            | Self::CouponExhausted
            | Self::SlotFull
            | Self::SlotHasReservations
            | Self::CommissionConfigDuplicate => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::RoleRequired | Self::AdminRequired | Self::NotOwner => {
                StatusCode::FORBIDDEN
            }

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 422 Unprocessable (business rules on otherwise valid input)
            Self::CompanyNotApproved
            | Self::CourierNotApproved
            | Self::CourierUnavailable
            | Self::InvalidApprovalTransition
            | Self::InvalidStatusTransition
            | Self::DeliveryTypeNotSupported
            | Self::OrderNotDelivered
            | Self::CouponInactive
            | Self::CouponExpired
            | Self::CouponMinimumNotMet
            | Self::SlotInactive
            | Self::SlotCompanyMismatch => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::DatabaseError | Self::ConfigError | Self::FileStorageFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
