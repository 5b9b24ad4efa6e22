//! Order reads, status changes, courier assignment

use shared::message::{Audience, ChangeAction, ChangeEvent, ChangeTable};
use shared::models::{
    ApprovalStatus, NotificationKind, Order, OrderAssign, OrderDetail, OrderFilter, OrderStatus,
};

use super::lifecycle::{Actor, check_move};
use crate::auth::{CurrentUser, UserRole};
use crate::core::ServerState;
use crate::db::repository::order::{self as order_repo, OrderScope};
use crate::db::repository::{company, courier};
use crate::notifications;
use crate::registration::couriers;
use crate::slots;
use crate::utils::{AppError, AppResult, ErrorCode, error::db_error};

fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
}

pub async fn load(state: &ServerState, id: i64) -> AppResult<Order> {
    order_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))
}

/// User ids with a stake in an order: customer, company owner, assigned courier
pub async fn participants(state: &ServerState, order: &Order) -> AppResult<Vec<String>> {
    let mut ids = vec![order.customer_id.clone()];
    if let Some(c) = company::find_by_id(&state.pool, order.company_id).await? {
        ids.push(c.owner_id);
    }
    if let Some(courier_id) = order.courier_id
        && let Some(c) = courier::find_by_id(&state.pool, courier_id).await?
    {
        ids.push(c.user_id);
    }
    Ok(ids)
}

/// The caller's relation to the order, if any
async fn actor_for(state: &ServerState, user: &CurrentUser, order: &Order) -> AppResult<Option<Actor>> {
    let actor = match user.role {
        UserRole::Admin => Some(Actor::Admin),
        UserRole::Customer => (order.customer_id == user.id).then_some(Actor::Customer),
        UserRole::Company => company::find_by_id(&state.pool, order.company_id)
            .await?
            .filter(|c| c.owner_id == user.id)
            .map(|_| Actor::Company),
        UserRole::Courier => match order.courier_id {
            Some(courier_id) => courier::find_by_id(&state.pool, courier_id)
                .await?
                .filter(|c| c.user_id == user.id)
                .map(|_| Actor::Courier),
            None => None,
        },
    };
    Ok(actor)
}

/// Unassigned platform orders are open to approved couriers for pickup
fn open_for_couriers(order: &Order) -> bool {
    order.courier_id.is_none()
        && order.delivery_type.needs_courier()
        && matches!(
            order.status,
            OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready
        )
}

pub async fn get(state: &ServerState, user: &CurrentUser, id: i64) -> AppResult<OrderDetail> {
    let order = load(state, id).await?;

    if actor_for(state, user, &order).await?.is_none() {
        let courier_may_peek = user.role == UserRole::Courier
            && open_for_couriers(&order)
            && couriers::load_mine(state, user).await.is_ok_and(|c| c.can_deliver());
        if !courier_may_peek {
            return Err(order_not_found(id));
        }
    }

    let items = order_repo::find_items(&state.pool, id).await?;
    Ok(OrderDetail { order, items })
}

/// Orders visible to the caller
pub async fn list(state: &ServerState, user: &CurrentUser, filter: &OrderFilter) -> AppResult<Vec<Order>> {
    let scope = match user.role {
        UserRole::Admin => OrderScope::All,
        UserRole::Customer => OrderScope::Customer(user.id.clone()),
        UserRole::Company => match company::find_by_owner(&state.pool, &user.id).await? {
            Some(c) => OrderScope::Company(c.id),
            None => return Ok(vec![]),
        },
        UserRole::Courier => match courier::find_by_user(&state.pool, &user.id).await? {
            Some(c) => OrderScope::Courier(c.id),
            None => return Ok(vec![]),
        },
    };
    Ok(order_repo::list(&state.pool, &scope, filter).await?)
}

/// Unassigned platform-delivery orders (couriers)
pub async fn available(state: &ServerState, user: &CurrentUser, filter: &OrderFilter) -> AppResult<Vec<Order>> {
    if !user.is_admin() {
        let me = couriers::load_mine(state, user).await?;
        if !me.can_deliver() {
            return Ok(vec![]);
        }
    }
    Ok(order_repo::list(&state.pool, &OrderScope::Unassigned, filter).await?)
}

fn status_text(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "is waiting for confirmation",
        OrderStatus::Confirmed => "was confirmed",
        OrderStatus::Preparing => "is being prepared",
        OrderStatus::Ready => "is ready",
        OrderStatus::InDelivery => "is on its way",
        OrderStatus::Delivered => "was delivered",
        OrderStatus::Cancelled => "was cancelled",
    }
}

/// Move an order to `to`. Cancelling gives the slot place back.
pub async fn update_status(
    state: &ServerState,
    user: &CurrentUser,
    id: i64,
    to: OrderStatus,
    reason: Option<&str>,
) -> AppResult<Order> {
    let order = load(state, id).await?;
    let actor = actor_for(state, user, &order)
        .await?
        .ok_or_else(|| AppError::not_owner(format!("Order {}", id)))?;
    check_move(actor, &order, to)?;

    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    let cancel_reason = if to == OrderStatus::Cancelled { reason } else { None };

    let mut tx = state.pool.begin().await.map_err(db_error)?;
    if !order_repo::update_status(&mut *tx, id, order.status, to, cancel_reason).await? {
        return Err(AppError::conflict(format!(
            "Order {} was modified concurrently, reload and retry",
            id
        )));
    }
    if to == OrderStatus::Cancelled
        && let Some(slot_id) = order.slot_id
    {
        slots::release(&mut *tx, slot_id).await?;
    }
    tx.commit().await.map_err(db_error)?;

    let updated = load(state, id).await?;
    tracing::info!(
        order_id = id,
        from = %order.status,
        to = %to,
        actor = ?actor,
        "Order status changed"
    );

    let audience = participants(state, &updated).await?;
    state.publish(
        ChangeEvent::new(ChangeTable::Orders, ChangeAction::Updated, id)
            .with_payload(&updated)
            .to(Audience::users(audience)),
    );
    if to == OrderStatus::Cancelled
        && let Some(slot_id) = updated.slot_id
    {
        state.publish(ChangeEvent::new(ChangeTable::DeliverySlots, ChangeAction::Updated, slot_id));
    }

    let body = match cancel_reason {
        Some(r) => format!("Order #{} {}: {}", id, status_text(to), r),
        None => format!("Order #{} {}", id, status_text(to)),
    };
    if actor != Actor::Customer {
        notifications::notify(
            state,
            notifications::message(
                updated.customer_id.clone(),
                NotificationKind::OrderStatusChanged,
                format!("Order {}", to),
                body.clone(),
                Some(id),
            ),
        )
        .await;
    } else if let Some(owner) = company::find_by_id(&state.pool, updated.company_id).await? {
        notifications::notify(
            state,
            notifications::message(
                owner.owner_id,
                NotificationKind::OrderStatusChanged,
                format!("Order {}", to),
                body,
                Some(id),
            ),
        )
        .await;
    }

    Ok(updated)
}

pub async fn cancel(
    state: &ServerState,
    user: &CurrentUser,
    id: i64,
    reason: Option<&str>,
) -> AppResult<Order> {
    update_status(state, user, id, OrderStatus::Cancelled, reason).await
}

/// Attach a courier to a platform-delivery order.
///
/// Couriers assign themselves; admins name the courier.
pub async fn assign(
    state: &ServerState,
    user: &CurrentUser,
    id: i64,
    payload: OrderAssign,
) -> AppResult<Order> {
    let order = load(state, id).await?;
    if order.status.is_terminal() {
        return Err(match order.status {
            OrderStatus::Cancelled => AppError::new(ErrorCode::OrderAlreadyCancelled),
            _ => AppError::new(ErrorCode::OrderAlreadyDelivered),
        });
    }
    if !order.delivery_type.needs_courier() {
        return Err(AppError::with_message(
            ErrorCode::DeliveryTypeNotSupported,
            format!("{} orders do not take a courier", order.delivery_type),
        ));
    }
    if !matches!(
        order.status,
        OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready
    ) {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Order {} is {} and cannot take a courier yet", id, order.status),
        )
        .with_detail("status", order.status.to_string()));
    }

    let target = if user.is_admin() {
        let courier_id = payload
            .courier_id
            .ok_or_else(|| AppError::with_message(ErrorCode::RequiredField, "courier_id is required"))?;
        couriers::load(state, courier_id).await?
    } else {
        let me = couriers::load_mine(state, user).await?;
        if payload.courier_id.is_some_and(|cid| cid != me.id) {
            return Err(AppError::permission_denied("Couriers can only assign themselves"));
        }
        me
    };

    if !target.can_deliver() {
        let code = if target.status != ApprovalStatus::Approved {
            ErrorCode::CourierNotApproved
        } else {
            ErrorCode::CourierUnavailable
        };
        return Err(AppError::new(code).with_detail("courier_id", target.id));
    }

    if !order_repo::assign_courier(&state.pool, id, target.id).await? {
        let current = load(state, id).await?;
        return Err(match current.courier_id {
            Some(existing) => {
                AppError::new(ErrorCode::CourierAlreadyAssigned).with_detail("courier_id", existing)
            }
            None => AppError::conflict(format!("Order {} can no longer be assigned", id)),
        });
    }

    let updated = load(state, id).await?;
    tracing::info!(order_id = id, courier_id = target.id, assigned_by = %user.id, "Courier assigned");

    let audience = participants(state, &updated).await?;
    state.publish(
        ChangeEvent::new(ChangeTable::Orders, ChangeAction::Updated, id)
            .with_payload(&updated)
            .to(Audience::users(audience)),
    );
    notifications::notify(
        state,
        notifications::message(
            updated.customer_id.clone(),
            NotificationKind::CourierAssigned,
            "Courier assigned",
            format!("{} will deliver order #{}", target.full_name, id),
            Some(id),
        ),
    )
    .await;
    if user.is_admin() {
        notifications::notify(
            state,
            notifications::message(
                target.user_id.clone(),
                NotificationKind::CourierAssigned,
                "New delivery",
                format!("You were assigned order #{}", id),
                Some(id),
            ),
        )
        .await;
    }

    Ok(updated)
}
