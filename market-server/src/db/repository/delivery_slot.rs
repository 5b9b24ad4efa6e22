//! Delivery Slot Repository
//!
//! Capacity changes are single conditional updates; callers never
//! read-then-write `current_orders`.

use super::{RepoError, RepoResult};
use shared::models::{DeliverySlot, DeliverySlotCreate};
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str =
    "id, company_id, starts_at, ends_at, max_orders, current_orders, is_active, created_at";

pub async fn find_by_id<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<DeliverySlot>> {
    let sql = format!("SELECT {COLUMNS} FROM delivery_slot WHERE id = ?");
    let row = sqlx::query_as::<_, DeliverySlot>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

/// Slots a customer can book: active, not full, starting after `now`
pub async fn find_offerable(
    pool: &SqlitePool,
    company_id: i64,
    now: i64,
) -> RepoResult<Vec<DeliverySlot>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM delivery_slot \
         WHERE company_id = ?1 AND is_active = 1 AND current_orders < max_orders AND starts_at > ?2 \
         ORDER BY starts_at"
    );
    let rows = sqlx::query_as::<_, DeliverySlot>(&sql)
        .bind(company_id)
        .bind(now)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// All active slots of a company (owner view, includes full and past ones)
pub async fn find_by_company(pool: &SqlitePool, company_id: i64) -> RepoResult<Vec<DeliverySlot>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM delivery_slot WHERE company_id = ? AND is_active = 1 ORDER BY starts_at"
    );
    let rows = sqlx::query_as::<_, DeliverySlot>(&sql)
        .bind(company_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    company_id: i64,
    data: DeliverySlotCreate,
) -> RepoResult<DeliverySlot> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO delivery_slot (id, company_id, starts_at, ends_at, max_orders, current_orders, is_active, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 0, 1, ?6)",
    )
    .bind(id)
    .bind(company_id)
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(data.max_orders)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create delivery slot".into()))
}

/// Deactivate a slot that holds no reservations.
///
/// Returns `false` if the slot is inactive or still has reservations.
pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE delivery_slot SET is_active = 0 WHERE id = ? AND is_active = 1 AND current_orders = 0",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Atomically take one unit of capacity
pub async fn reserve<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE delivery_slot SET current_orders = current_orders + 1 \
         WHERE id = ? AND is_active = 1 AND current_orders < max_orders",
    )
    .bind(id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Give one unit back, floored at zero
pub async fn release<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE delivery_slot SET current_orders = current_orders - 1 WHERE id = ? AND current_orders > 0",
    )
    .bind(id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() > 0)
}
