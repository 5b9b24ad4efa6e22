//! Status transition rules
//!
//! The status graph itself lives on [`OrderStatus::can_transition_to`]; this
//! module adds who is allowed to make each move.

use shared::models::{DeliveryType, Order, OrderStatus};

use crate::utils::{AppError, AppResult, ErrorCode};

/// The caller's relation to an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Admin,
    Customer,
    Company,
    /// The courier assigned to the order
    Courier,
}

/// Whether `actor` may perform `from → to` on an order of `delivery_type`
pub fn actor_may_move(
    actor: Actor,
    from: OrderStatus,
    to: OrderStatus,
    delivery_type: DeliveryType,
) -> bool {
    use OrderStatus::*;
    match actor {
        Actor::Admin => true,
        Actor::Customer => from == Pending && to == Cancelled,
        Actor::Company => match to {
            Confirmed | Preparing | Ready | Cancelled => true,
            InDelivery | Delivered => !delivery_type.needs_courier(),
            Pending => false,
        },
        Actor::Courier => delivery_type.needs_courier() && matches!(to, InDelivery | Delivered),
    }
}

/// Validate a status change for an order
pub fn check_move(actor: Actor, order: &Order, to: OrderStatus) -> AppResult<()> {
    match order.status {
        OrderStatus::Cancelled => return Err(AppError::new(ErrorCode::OrderAlreadyCancelled)),
        OrderStatus::Delivered => return Err(AppError::new(ErrorCode::OrderAlreadyDelivered)),
        _ => {}
    }

    if !order.status.can_transition_to(to, order.delivery_type) {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot move order from {} to {}", order.status, to),
        )
        .with_detail("from", order.status.as_str())
        .with_detail("to", to.as_str()));
    }

    if !actor_may_move(actor, order.status, to, order.delivery_type) {
        return Err(AppError::permission_denied(format!(
            "Not allowed to move order from {} to {}",
            order.status, to
        )));
    }

    if to == OrderStatus::InDelivery && order.delivery_type.needs_courier() && order.courier_id.is_none()
    {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            "Order has no courier assigned yet",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CommissionSource;
    use OrderStatus::*;

    fn order(status: OrderStatus, delivery_type: DeliveryType, courier_id: Option<i64>) -> Order {
        Order {
            id: 1,
            customer_id: "cust-1".to_string(),
            company_id: 10,
            courier_id,
            slot_id: None,
            delivery_type,
            status,
            delivery_address: Some("Rua 1".to_string()),
            notes: None,
            subtotal: 1000.0,
            delivery_fee: 500.0,
            discount_amount: 0.0,
            coupon_code: None,
            commission_rate: 15.0,
            commission_amount: 150.0,
            commission_source: CommissionSource::PlanDefault,
            total: 1500.0,
            cancel_reason: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn code(r: AppResult<()>) -> Option<ErrorCode> {
        r.err().map(|e| e.code)
    }

    #[test]
    fn test_company_drives_kitchen_steps() {
        let o = order(Pending, DeliveryType::PlatformDelivery, None);
        assert_eq!(code(check_move(Actor::Company, &o, Confirmed)), None);
        let o = order(Confirmed, DeliveryType::PlatformDelivery, None);
        assert_eq!(code(check_move(Actor::Company, &o, Preparing)), None);
        let o = order(Preparing, DeliveryType::PlatformDelivery, None);
        assert_eq!(code(check_move(Actor::Company, &o, Ready)), None);
    }

    #[test]
    fn test_platform_delivery_belongs_to_courier() {
        let o = order(Ready, DeliveryType::PlatformDelivery, Some(7));
        assert_eq!(
            code(check_move(Actor::Company, &o, InDelivery)),
            Some(ErrorCode::PermissionDenied)
        );
        assert_eq!(code(check_move(Actor::Courier, &o, InDelivery)), None);

        let o = order(InDelivery, DeliveryType::PlatformDelivery, Some(7));
        assert_eq!(code(check_move(Actor::Courier, &o, Delivered)), None);
    }

    #[test]
    fn test_in_delivery_needs_assigned_courier() {
        let o = order(Ready, DeliveryType::PlatformDelivery, None);
        assert_eq!(
            code(check_move(Actor::Admin, &o, InDelivery)),
            Some(ErrorCode::InvalidStatusTransition)
        );
    }

    #[test]
    fn test_self_delivery_and_pickup_belong_to_company() {
        let o = order(Ready, DeliveryType::SelfDelivery, None);
        assert_eq!(code(check_move(Actor::Company, &o, InDelivery)), None);
        let o = order(Ready, DeliveryType::Pickup, None);
        assert_eq!(code(check_move(Actor::Company, &o, Delivered)), None);
        assert_eq!(
            code(check_move(Actor::Courier, &o, Delivered)),
            Some(ErrorCode::PermissionDenied)
        );
    }

    #[test]
    fn test_customer_cancels_only_pending() {
        let o = order(Pending, DeliveryType::Pickup, None);
        assert_eq!(code(check_move(Actor::Customer, &o, Cancelled)), None);
        let o = order(Confirmed, DeliveryType::Pickup, None);
        assert_eq!(
            code(check_move(Actor::Customer, &o, Cancelled)),
            Some(ErrorCode::PermissionDenied)
        );
        assert_eq!(code(check_move(Actor::Company, &o, Cancelled)), None);
    }

    #[test]
    fn test_terminal_orders() {
        let o = order(Cancelled, DeliveryType::Pickup, None);
        assert_eq!(
            code(check_move(Actor::Admin, &o, Confirmed)),
            Some(ErrorCode::OrderAlreadyCancelled)
        );
        let o = order(Delivered, DeliveryType::Pickup, None);
        assert_eq!(
            code(check_move(Actor::Admin, &o, Cancelled)),
            Some(ErrorCode::OrderAlreadyDelivered)
        );
    }

    #[test]
    fn test_graph_still_applies_to_admin() {
        let o = order(Preparing, DeliveryType::SelfDelivery, None);
        assert_eq!(
            code(check_move(Actor::Admin, &o, Cancelled)),
            Some(ErrorCode::InvalidStatusTransition)
        );
    }
}
