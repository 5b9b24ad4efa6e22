//! Coupon Repository

use super::{RepoError, RepoResult};
use shared::models::{Coupon, CouponCreate, CouponUpdate};
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, code, coupon_type, value, min_order_value, max_uses, used_count, expires_at, is_active, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Coupon>> {
    let sql = format!("SELECT {COLUMNS} FROM coupon ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Coupon>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Coupon>> {
    let sql = format!("SELECT {COLUMNS} FROM coupon WHERE id = ?");
    let row = sqlx::query_as::<_, Coupon>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Look up by (normalized) code
pub async fn find_by_code<'e>(
    exec: impl SqliteExecutor<'e>,
    code: &str,
) -> RepoResult<Option<Coupon>> {
    let sql = format!("SELECT {COLUMNS} FROM coupon WHERE code = ?");
    let row = sqlx::query_as::<_, Coupon>(&sql)
        .bind(code)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CouponCreate) -> RepoResult<Coupon> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let code = shared::util::normalize_code(&data.code);
    sqlx::query(
        "INSERT INTO coupon (id, code, coupon_type, value, min_order_value, max_uses, used_count, expires_at, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, 1, ?8, ?8)",
    )
    .bind(id)
    .bind(&code)
    .bind(data.coupon_type)
    .bind(data.value)
    .bind(data.min_order_value)
    .bind(data.max_uses)
    .bind(data.expires_at)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Coupon code {code} already exists")),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create coupon".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CouponUpdate) -> RepoResult<Coupon> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE coupon SET value = COALESCE(?1, value), min_order_value = COALESCE(?2, min_order_value), max_uses = COALESCE(?3, max_uses), expires_at = COALESCE(?4, expires_at), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(data.value)
    .bind(data.min_order_value)
    .bind(data.max_uses)
    .bind(data.expires_at)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Coupon {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Coupon {id} not found")))
}

/// Soft delete (deactivate)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE coupon SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Atomically take one use of the coupon.
///
/// Single conditional update: succeeds only while the coupon is active and
/// `used_count < max_uses` (or unlimited). Returns `false` when the last use
/// was taken by someone else.
pub async fn redeem<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE coupon SET used_count = used_count + 1, updated_at = ?1 \
         WHERE id = ?2 AND is_active = 1 AND (max_uses IS NULL OR used_count < max_uses)",
    )
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() > 0)
}
