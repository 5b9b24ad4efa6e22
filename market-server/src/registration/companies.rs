//! Company registration and profile

use shared::message::{Audience, ChangeAction, ChangeEvent, ChangeTable};
use shared::models::{ApprovalStatus, Company, CompanyCreate, CompanyUpdate, Plan};

use super::registration_error;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::company;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

pub(crate) fn company_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CompanyNotFound, format!("Company {} not found", id))
}

/// Load a company or fail with CompanyNotFound
pub async fn load(state: &ServerState, id: i64) -> AppResult<Company> {
    company::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| company_not_found(id))
}

/// Owner or admin only
pub fn ensure_owner(user: &CurrentUser, company: &Company) -> AppResult<()> {
    if user.is_admin() || company.owner_id == user.id {
        Ok(())
    } else {
        Err(AppError::not_owner(format!("Company {}", company.id)))
    }
}

/// Load a company the caller owns (admins pass)
pub async fn load_owned(state: &ServerState, user: &CurrentUser, id: i64) -> AppResult<Company> {
    let c = load(state, id).await?;
    ensure_owner(user, &c)?;
    Ok(c)
}

pub async fn register(
    state: &ServerState,
    user: &CurrentUser,
    payload: CompanyCreate,
) -> AppResult<Company> {
    validate_payload(&payload)?;

    if company::find_by_owner(&state.pool, &user.id).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::AlreadyRegistered,
            "This account already has a company",
        ));
    }

    let created = company::create(&state.pool, &user.id, payload)
        .await
        .map_err(|e| registration_error(e, "Company (tax id)"))?;

    tracing::info!(company_id = created.id, owner_id = %user.id, "Company registered, pending approval");
    state.publish(
        ChangeEvent::new(ChangeTable::Companies, ChangeAction::Created, created.id)
            .with_payload(&created)
            .to(Audience::Admins),
    );
    Ok(created)
}

/// Admins see everything (optionally filtered); others only approved companies
pub async fn list(
    state: &ServerState,
    user: &CurrentUser,
    status: Option<ApprovalStatus>,
) -> AppResult<Vec<Company>> {
    let status = if user.is_admin() {
        status
    } else {
        Some(ApprovalStatus::Approved)
    };
    Ok(company::find_all(&state.pool, status).await?)
}

/// Unapproved companies are visible to their owner and admins only
pub async fn get(state: &ServerState, user: &CurrentUser, id: i64) -> AppResult<Company> {
    let c = load(state, id).await?;
    if c.is_approved() || user.is_admin() || c.owner_id == user.id {
        Ok(c)
    } else {
        Err(company_not_found(id))
    }
}

pub async fn update(
    state: &ServerState,
    user: &CurrentUser,
    id: i64,
    payload: CompanyUpdate,
) -> AppResult<Company> {
    validate_payload(&payload)?;
    load_owned(state, user, id).await?;

    let updated = company::update(&state.pool, id, payload).await?;
    state.publish(
        ChangeEvent::new(ChangeTable::Companies, ChangeAction::Updated, id)
            .with_payload(&updated)
            .to(Audience::users([updated.owner_id.clone()])),
    );
    Ok(updated)
}

/// Change the commission plan (admin). Existing orders keep their rate.
pub async fn change_plan(state: &ServerState, id: i64, plan: Plan) -> AppResult<Company> {
    load(state, id).await?;
    let updated = company::update_plan(&state.pool, id, plan).await?;
    tracing::info!(company_id = id, plan = %plan, "Company plan changed");
    state.publish(
        ChangeEvent::new(ChangeTable::Companies, ChangeAction::Updated, id)
            .with_payload(&updated)
            .to(Audience::users([updated.owner_id.clone()])),
    );
    Ok(updated)
}
