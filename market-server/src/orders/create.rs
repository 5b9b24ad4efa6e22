//! Order quoting and placement

use shared::message::{Audience, ChangeAction, ChangeEvent, ChangeTable};
use shared::models::{
    CommissionQuote, Company, CouponQuote, DeliveryType, NotificationKind, Order, OrderCreate,
    OrderDetail, OrderEconomics, OrderItem, OrderItemInput, OrderQuoteRequest, OrderStatus,
};
use sqlx::SqliteConnection;

use crate::auth::CurrentUser;
use crate::commission::{self, CommissionRequest};
use crate::core::ServerState;
use crate::coupons;
use crate::db::repository::{coupon, customer, order as order_repo};
use crate::notifications;
use crate::order_money::{self, calculate_subtotal, compute_economics, line_total, to_f64};
use crate::registration::companies;
use crate::slots;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text, validate_payload};
use crate::utils::{AppError, AppResult, ErrorCode, error::db_error};

/// Everything known before touching coupon or slot counters
struct Priced {
    company: Company,
    subtotal: f64,
    delivery_fee: f64,
    commission: CommissionQuote,
}

async fn price(
    state: &ServerState,
    company_id: i64,
    delivery_type: DeliveryType,
    items: &[OrderItemInput],
) -> AppResult<Priced> {
    order_money::validate_items(items)?;

    let company = companies::load(state, company_id).await?;
    if !company.is_approved() {
        return Err(AppError::new(ErrorCode::CompanyNotApproved).with_detail("company_id", company_id));
    }
    if !company.accepts(delivery_type) {
        return Err(AppError::with_message(
            ErrorCode::DeliveryTypeNotSupported,
            format!("Company {} does not offer {}", company_id, delivery_type),
        ));
    }

    let subtotal = calculate_subtotal(items);
    let commission = commission::resolve(
        &state.pool,
        &CommissionRequest {
            subtotal,
            plan: company.plan,
            delivery_type,
            country: Some(company.country.as_str()),
            city: company.city.as_deref(),
        },
    )
    .await;

    let delivery_fee = if delivery_type.is_delivered() {
        company.delivery_fee.unwrap_or(state.config.default_delivery_fee)
    } else {
        0.0
    };

    Ok(Priced {
        company,
        subtotal,
        delivery_fee,
        commission,
    })
}

/// Economics preview; nothing is reserved or written
pub async fn quote(state: &ServerState, payload: OrderQuoteRequest) -> AppResult<OrderEconomics> {
    validate_payload(&payload)?;
    let priced = price(state, payload.company_id, payload.delivery_type, &payload.items).await?;

    let coupon_quote = match payload.coupon_code.as_deref() {
        Some(code) => {
            let now = shared::util::now_millis();
            let (_, q) = coupons::validate_code(&state.pool, code, priced.subtotal, now).await?;
            Some(q)
        }
        None => None,
    };

    Ok(compute_economics(
        priced.subtotal,
        priced.delivery_fee,
        coupon_quote.as_ref(),
        &priced.commission,
    ))
}

/// Place an order.
///
/// Coupon redemption, slot reservation and the inserts share one
/// transaction: if any step fails the whole write rolls back, which also
/// returns the coupon use and the slot place taken by earlier steps.
pub async fn place(
    state: &ServerState,
    user: &CurrentUser,
    payload: OrderCreate,
) -> AppResult<OrderDetail> {
    validate_payload(&payload)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let priced = price(state, payload.company_id, payload.delivery_type, &payload.items).await?;

    let delivery_address = match payload.delivery_address.clone() {
        Some(addr) if !addr.trim().is_empty() => Some(addr.trim().to_string()),
        _ => customer::find_by_user(&state.pool, &user.id)
            .await?
            .and_then(|c| c.default_address),
    };
    if payload.delivery_type.is_delivered() && delivery_address.is_none() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "delivery_address is required for delivered orders",
        )
        .with_detail("field", "delivery_address"));
    }

    let mut tx = state.pool.begin().await.map_err(db_error)?;
    let written = write_order(&mut *tx, user, &payload, &priced, delivery_address).await;
    let (order, items, coupon_quote) = match written {
        Ok(w) => {
            tx.commit().await.map_err(db_error)?;
            w
        }
        Err(e) => {
            if let Err(rb) = tx.rollback().await {
                tracing::error!(error = %rb, "Order transaction rollback failed");
            }
            tracing::warn!(
                company_id = payload.company_id,
                customer_id = %user.id,
                error = %e,
                "Order placement rolled back"
            );
            return Err(e);
        }
    };

    tracing::info!(
        order_id = order.id,
        company_id = order.company_id,
        total = order.total,
        commission = order.commission_amount,
        commission_source = ?order.commission_source,
        "Order placed"
    );

    let owner_id = priced.company.owner_id.clone();
    state.publish(
        ChangeEvent::new(ChangeTable::Orders, ChangeAction::Created, order.id)
            .with_payload(&order)
            .to(Audience::users([order.customer_id.clone(), owner_id.clone()])),
    );
    if let Some(slot_id) = order.slot_id {
        state.publish(
            ChangeEvent::new(ChangeTable::DeliverySlots, ChangeAction::Updated, slot_id)
                .to(Audience::users([owner_id.clone()])),
        );
    }
    if let Some(q) = &coupon_quote {
        state.publish(ChangeEvent::new(ChangeTable::Coupons, ChangeAction::Updated, q.coupon_id));
    }
    notifications::notify(
        state,
        notifications::message(
            owner_id,
            NotificationKind::OrderCreated,
            format!("New order #{}", order.id),
            format!("{} item(s), total {:.2}", items.len(), order.total),
            Some(order.id),
        ),
    )
    .await;

    Ok(OrderDetail { order, items })
}

async fn write_order(
    conn: &mut SqliteConnection,
    user: &CurrentUser,
    payload: &OrderCreate,
    priced: &Priced,
    delivery_address: Option<String>,
) -> AppResult<(Order, Vec<OrderItem>, Option<CouponQuote>)> {
    let now = shared::util::now_millis();

    let coupon_quote = match payload.coupon_code.as_deref() {
        Some(code) => {
            let (found, q) = coupons::validate_code(&mut *conn, code, priced.subtotal, now).await?;
            if !coupon::redeem(&mut *conn, found.id).await? {
                return Err(AppError::new(ErrorCode::CouponExhausted).with_detail("code", found.code));
            }
            Some(q)
        }
        None => None,
    };

    if let Some(slot_id) = payload.slot_id {
        slots::reserve(conn, slot_id, priced.company.id, now).await?;
    }

    let econ = compute_economics(
        priced.subtotal,
        priced.delivery_fee,
        coupon_quote.as_ref(),
        &priced.commission,
    );

    let order = Order {
        id: shared::util::snowflake_id(),
        customer_id: user.id.clone(),
        company_id: priced.company.id,
        courier_id: None,
        slot_id: payload.slot_id,
        delivery_type: payload.delivery_type,
        status: OrderStatus::Pending,
        delivery_address,
        notes: payload.notes.clone(),
        subtotal: econ.subtotal,
        delivery_fee: econ.delivery_fee,
        discount_amount: econ.discount_amount,
        coupon_code: coupon_quote.as_ref().map(|q| q.code.clone()),
        commission_rate: econ.commission_rate,
        commission_amount: econ.commission_amount,
        commission_source: econ.commission_source,
        total: econ.total,
        cancel_reason: None,
        created_at: now,
        updated_at: now,
    };
    order_repo::insert(&mut *conn, &order).await?;

    let mut items = Vec::with_capacity(payload.items.len());
    for input in &payload.items {
        let item = OrderItem {
            id: shared::util::snowflake_id(),
            order_id: order.id,
            product_name: input.product_name.trim().to_string(),
            unit_price: input.unit_price,
            quantity: input.quantity,
            line_total: to_f64(line_total(input)),
            note: input.note.clone(),
        };
        order_repo::insert_item(&mut *conn, &item).await?;
        items.push(item);
    }

    Ok((order, items, coupon_quote))
}
