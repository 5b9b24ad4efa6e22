//! JWT Extractor
//!
//! Lets handlers take `CurrentUser` as an argument. Reuses the user injected
//! by [`require_auth`](super::require_auth) when present.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::unauthorized());
            }
        };

        match state.get_jwt_service().authenticate(token) {
            Ok(user) => {
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{}", e),
                    uri = format!("{:?}", parts.uri)
                );
                Err(jwt_rejection(e))
            }
        }
    }
}

/// Map a token failure to the client-facing error
pub(crate) fn jwt_rejection(err: JwtError) -> AppError {
    match err {
        JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid token"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_jwt_rejection_codes() {
        assert_eq!(jwt_rejection(JwtError::ExpiredToken).code, ErrorCode::TokenExpired);
        assert_eq!(
            jwt_rejection(JwtError::InvalidSignature).code,
            ErrorCode::TokenInvalid
        );
        assert_eq!(
            jwt_rejection(JwtError::InvalidToken("garbage".into())).code,
            ErrorCode::TokenInvalid
        );
    }
}
