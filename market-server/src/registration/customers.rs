//! Customer registration

use shared::models::{Customer, CustomerCreate};

use super::registration_error;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::customer;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

pub async fn register(
    state: &ServerState,
    user: &CurrentUser,
    payload: CustomerCreate,
) -> AppResult<Customer> {
    validate_payload(&payload)?;

    if customer::find_by_user(&state.pool, &user.id).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::AlreadyRegistered,
            "Customer profile already registered",
        ));
    }

    let created = customer::create(&state.pool, &user.id, payload)
        .await
        .map_err(|e| registration_error(e, "Customer profile"))?;

    tracing::info!(customer_id = created.id, user_id = %user.id, "Customer registered");
    Ok(created)
}

pub async fn me(state: &ServerState, user: &CurrentUser) -> AppResult<Customer> {
    customer::find_by_user(&state.pool, &user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))
}
