//! Order Repository
//!
//! Economics columns (`commission_rate`, `commission_amount`,
//! `commission_source`, `subtotal`, `total`...) are written by [`insert`] and
//! no statement here updates them afterwards.

use super::{RepoResult, page_limit};
use shared::models::{Order, OrderFilter, OrderItem, OrderStatus};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, customer_id, company_id, courier_id, slot_id, delivery_type, status, delivery_address, notes, subtotal, delivery_fee, discount_amount, coupon_code, commission_rate, commission_amount, commission_source, total, cancel_reason, created_at, updated_at";

/// Whose orders to list
#[derive(Debug, Clone)]
pub enum OrderScope {
    Customer(String),
    Company(i64),
    Courier(i64),
    /// Platform-delivery orders waiting for a courier
    Unassigned,
    All,
}

pub async fn find_by_id<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_name, unit_price, quantity, line_total, note FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list(
    pool: &SqlitePool,
    scope: &OrderScope,
    filter: &OrderFilter,
) -> RepoResult<Vec<Order>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM orders WHERE 1 = 1"));

    match scope {
        OrderScope::Customer(user_id) => {
            qb.push(" AND customer_id = ").push_bind(user_id.clone());
        }
        OrderScope::Company(company_id) => {
            qb.push(" AND company_id = ").push_bind(*company_id);
        }
        OrderScope::Courier(courier_id) => {
            qb.push(" AND courier_id = ").push_bind(*courier_id);
        }
        OrderScope::Unassigned => {
            qb.push(
                " AND courier_id IS NULL AND delivery_type = 'platform_delivery' \
                 AND status IN ('confirmed', 'preparing', 'ready')",
            );
        }
        OrderScope::All => {}
    }

    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(company_id) = filter.company_id {
        qb.push(" AND company_id = ").push_bind(company_id);
    }

    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(page_limit(filter.limit))
        .push(" OFFSET ")
        .push_bind(filter.offset.unwrap_or(0).max(0));

    let rows = qb.build_query_as::<Order>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn insert<'e>(exec: impl SqliteExecutor<'e>, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, customer_id, company_id, courier_id, slot_id, delivery_type, status, delivery_address, notes, subtotal, delivery_fee, discount_amount, coupon_code, commission_rate, commission_amount, commission_source, total, cancel_reason, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
    )
    .bind(order.id)
    .bind(&order.customer_id)
    .bind(order.company_id)
    .bind(order.courier_id)
    .bind(order.slot_id)
    .bind(order.delivery_type)
    .bind(order.status)
    .bind(&order.delivery_address)
    .bind(&order.notes)
    .bind(order.subtotal)
    .bind(order.delivery_fee)
    .bind(order.discount_amount)
    .bind(&order.coupon_code)
    .bind(order.commission_rate)
    .bind(order.commission_amount)
    .bind(order.commission_source)
    .bind(order.total)
    .bind(&order.cancel_reason)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn insert_item<'e>(exec: impl SqliteExecutor<'e>, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, product_name, unit_price, quantity, line_total, note) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(&item.product_name)
    .bind(item.unit_price)
    .bind(item.quantity)
    .bind(item.line_total)
    .bind(&item.note)
    .execute(exec)
    .await?;
    Ok(())
}

/// Move status, guarded by the expected current status.
///
/// Returns `false` if the order changed in between.
pub async fn update_status<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
    cancel_reason: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, cancel_reason = COALESCE(?2, cancel_reason), updated_at = ?3 WHERE id = ?4 AND status = ?5",
    )
    .bind(to)
    .bind(cancel_reason)
    .bind(now)
    .bind(id)
    .bind(from)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Assign a courier to an unassigned platform-delivery order the company has confirmed
pub async fn assign_courier(pool: &SqlitePool, id: i64, courier_id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET courier_id = ?1, updated_at = ?2 \
         WHERE id = ?3 AND courier_id IS NULL AND delivery_type = 'platform_delivery' \
         AND status IN ('confirmed', 'preparing', 'ready')",
    )
    .bind(courier_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
