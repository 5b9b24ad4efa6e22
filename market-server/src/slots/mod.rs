//! Delivery slot scheduling
//!
//! Slots are capacity-limited windows a company offers. A slot is offerable
//! while it is active, has room and has not started. Reservation and release
//! are single conditional UPDATEs; the checks before them are advisory.

use shared::message::{Audience, ChangeAction, ChangeEvent, ChangeTable};
use shared::models::{DeliverySlot, DeliverySlotCreate};
use sqlx::SqliteConnection;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::delivery_slot;
use crate::registration::companies;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};

fn slot_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::SlotNotFound, format!("Delivery slot {} not found", id))
}

/// Check the window of a new slot
pub fn check_window(payload: &DeliverySlotCreate, now: i64) -> AppResult<()> {
    if payload.ends_at <= payload.starts_at {
        return Err(AppError::with_message(
            ErrorCode::SlotInvalidWindow,
            "Slot must end after it starts",
        ));
    }
    if payload.starts_at <= now {
        return Err(AppError::with_message(
            ErrorCode::SlotInvalidWindow,
            "Slot must start in the future",
        ));
    }
    Ok(())
}

/// Offerable slots of a company (customer view)
pub async fn list_offerable(state: &ServerState, company_id: i64) -> AppResult<Vec<DeliverySlot>> {
    companies::load(state, company_id).await?;
    let now = shared::util::now_millis();
    Ok(delivery_slot::find_offerable(&state.pool, company_id, now).await?)
}

/// All active slots of a company, full ones included (owner view)
pub async fn list_for_owner(
    state: &ServerState,
    user: &CurrentUser,
    company_id: i64,
) -> AppResult<Vec<DeliverySlot>> {
    companies::load_owned(state, user, company_id).await?;
    Ok(delivery_slot::find_by_company(&state.pool, company_id).await?)
}

pub async fn create(
    state: &ServerState,
    user: &CurrentUser,
    company_id: i64,
    payload: DeliverySlotCreate,
) -> AppResult<DeliverySlot> {
    validate_payload(&payload)?;
    let company = companies::load_owned(state, user, company_id).await?;
    check_window(&payload, shared::util::now_millis())?;

    let slot = delivery_slot::create(&state.pool, company_id, payload).await?;
    tracing::info!(slot_id = slot.id, company_id, max_orders = slot.max_orders, "Delivery slot created");
    state.publish(
        ChangeEvent::new(ChangeTable::DeliverySlots, ChangeAction::Created, slot.id)
            .with_payload(&slot)
            .to(Audience::users([company.owner_id])),
    );
    Ok(slot)
}

/// Deactivate a slot; refused while it holds reservations
pub async fn delete(state: &ServerState, user: &CurrentUser, slot_id: i64) -> AppResult<()> {
    let slot = delivery_slot::find_by_id(&state.pool, slot_id)
        .await?
        .ok_or_else(|| slot_not_found(slot_id))?;
    let company = companies::load_owned(state, user, slot.company_id).await?;

    if !delivery_slot::deactivate(&state.pool, slot_id).await? {
        let current = delivery_slot::find_by_id(&state.pool, slot_id)
            .await?
            .ok_or_else(|| slot_not_found(slot_id))?;
        if !current.is_active {
            return Err(slot_not_found(slot_id));
        }
        return Err(AppError::new(ErrorCode::SlotHasReservations)
            .with_detail("current_orders", current.current_orders));
    }

    tracing::info!(slot_id, company_id = slot.company_id, "Delivery slot deactivated");
    state.publish(
        ChangeEvent::new(ChangeTable::DeliverySlots, ChangeAction::Deleted, slot_id)
            .to(Audience::users([company.owner_id])),
    );
    Ok(())
}

/// Reserve one place inside an order transaction
pub async fn reserve(
    conn: &mut SqliteConnection,
    slot_id: i64,
    company_id: i64,
    now: i64,
) -> AppResult<DeliverySlot> {
    let slot = delivery_slot::find_by_id(&mut *conn, slot_id)
        .await?
        .ok_or_else(|| slot_not_found(slot_id))?;

    if slot.company_id != company_id {
        return Err(AppError::new(ErrorCode::SlotCompanyMismatch)
            .with_detail("slot_id", slot_id)
            .with_detail("company_id", company_id));
    }
    if !slot.is_active || slot.starts_at <= now {
        return Err(AppError::new(ErrorCode::SlotInactive).with_detail("slot_id", slot_id));
    }
    if !slot.has_capacity() || !delivery_slot::reserve(&mut *conn, slot_id).await? {
        return Err(AppError::new(ErrorCode::SlotFull).with_detail("slot_id", slot_id));
    }
    Ok(slot)
}

/// Give a place back (floored at zero)
pub async fn release(conn: &mut SqliteConnection, slot_id: i64) -> AppResult<()> {
    if !delivery_slot::release(&mut *conn, slot_id).await? {
        tracing::warn!(slot_id, "Slot release found no reservation to free");
    }
    Ok(())
}
