//! Courier registration and availability

use shared::message::{Audience, ChangeAction, ChangeEvent, ChangeTable};
use shared::models::{ApprovalStatus, Courier, CourierCreate};

use super::registration_error;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::courier;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

pub(crate) fn courier_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CourierNotFound, format!("Courier {} not found", id))
}

pub async fn load(state: &ServerState, id: i64) -> AppResult<Courier> {
    courier::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| courier_not_found(id))
}

/// The courier profile of the calling user
pub async fn load_mine(state: &ServerState, user: &CurrentUser) -> AppResult<Courier> {
    courier::find_by_user(&state.pool, &user.id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::CourierNotFound, "No courier profile for this account")
        })
}

pub async fn register(
    state: &ServerState,
    user: &CurrentUser,
    payload: CourierCreate,
) -> AppResult<Courier> {
    validate_payload(&payload)?;

    if courier::find_by_user(&state.pool, &user.id).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::AlreadyRegistered,
            "Courier profile already registered",
        ));
    }

    let created = courier::create(&state.pool, &user.id, payload)
        .await
        .map_err(|e| registration_error(e, "Courier profile"))?;

    tracing::info!(courier_id = created.id, user_id = %user.id, "Courier registered, pending approval");
    state.publish(
        ChangeEvent::new(ChangeTable::Couriers, ChangeAction::Created, created.id)
            .with_payload(&created)
            .to(Audience::Admins),
    );
    Ok(created)
}

pub async fn list(state: &ServerState, status: Option<ApprovalStatus>) -> AppResult<Vec<Courier>> {
    Ok(courier::find_all(&state.pool, status).await?)
}

/// Self or admin
pub async fn get(state: &ServerState, user: &CurrentUser, id: i64) -> AppResult<Courier> {
    let c = load(state, id).await?;
    if user.is_admin() || c.user_id == user.id {
        Ok(c)
    } else {
        Err(AppError::not_owner(format!("Courier {}", id)))
    }
}

/// Toggle availability; only approved couriers can go online
pub async fn set_availability(
    state: &ServerState,
    user: &CurrentUser,
    id: i64,
    available: bool,
) -> AppResult<Courier> {
    let c = get(state, user, id).await?;
    if available && c.status != ApprovalStatus::Approved {
        return Err(AppError::new(ErrorCode::CourierNotApproved).with_detail("courier_id", id));
    }

    let updated = courier::set_availability(&state.pool, id, available).await?;
    tracing::info!(courier_id = id, available, "Courier availability changed");
    state.publish(
        ChangeEvent::new(ChangeTable::Couriers, ChangeAction::Updated, id)
            .with_payload(&updated)
            .to(Audience::users([updated.user_id.clone()])),
    );
    Ok(updated)
}
