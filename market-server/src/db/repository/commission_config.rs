//! Commission Config Repository
//!
//! At most one active row per (country, city, plan, delivery_type); the
//! partial unique index turns a second active row into `RepoError::Duplicate`.

use super::{RepoError, RepoResult};
use shared::models::{
    CommissionConfig, CommissionConfigCreate, CommissionConfigUpdate, DeliveryType, Plan,
};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, country, city, plan, delivery_type, commission_percentage, is_active, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<CommissionConfig>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM commission_config ORDER BY country, city, plan, delivery_type, id"
    );
    let rows = sqlx::query_as::<_, CommissionConfig>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CommissionConfig>> {
    let sql = format!("SELECT {COLUMNS} FROM commission_config WHERE id = ?");
    let row = sqlx::query_as::<_, CommissionConfig>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Active rows for (country, plan, delivery_type): the city row (if any) and
/// the country-wide row (if any), in id order.
pub async fn find_active_candidates(
    pool: &SqlitePool,
    country: &str,
    city: Option<&str>,
    plan: Plan,
    delivery_type: DeliveryType,
) -> RepoResult<Vec<CommissionConfig>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM commission_config \
         WHERE is_active = 1 AND country = ?1 AND plan = ?2 AND delivery_type = ?3 \
         AND (city IS NULL OR city = ?4) ORDER BY id"
    );
    let rows = sqlx::query_as::<_, CommissionConfig>(&sql)
        .bind(country)
        .bind(plan)
        .bind(delivery_type)
        .bind(city)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    data: CommissionConfigCreate,
) -> RepoResult<CommissionConfig> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO commission_config (id, country, city, plan, delivery_type, commission_percentage, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.country)
    .bind(&data.city)
    .bind(data.plan)
    .bind(data.delivery_type)
    .bind(data.commission_percentage)
    .bind(now)
    .execute(pool)
    .await
    .map_err(duplicate_key)?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create commission config".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: CommissionConfigUpdate,
) -> RepoResult<CommissionConfig> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE commission_config SET commission_percentage = COALESCE(?1, commission_percentage), is_active = COALESCE(?2, is_active), updated_at = ?3 WHERE id = ?4",
    )
    .bind(data.commission_percentage)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(duplicate_key)?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Commission config {id} not found"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Commission config {id} not found")))
}

/// Soft delete (deactivate)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE commission_config SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

fn duplicate_key(err: sqlx::Error) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => RepoError::Duplicate(
            "An active commission config already exists for this country, city, plan and delivery type"
                .into(),
        ),
        other => other,
    }
}
