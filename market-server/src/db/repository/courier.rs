//! Courier Repository

use super::{RepoError, RepoResult};
use shared::models::{ApprovalStatus, Courier, CourierCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, user_id, full_name, phone, vehicle_type, license_number, document_url, status, rejection_reason, is_available, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Courier>> {
    let sql = format!("SELECT {COLUMNS} FROM courier WHERE id = ?");
    let row = sqlx::query_as::<_, Courier>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Option<Courier>> {
    let sql = format!("SELECT {COLUMNS} FROM courier WHERE user_id = ?");
    let row = sqlx::query_as::<_, Courier>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all(
    pool: &SqlitePool,
    status: Option<ApprovalStatus>,
) -> RepoResult<Vec<Courier>> {
    let rows = match status {
        Some(status) => {
            let sql =
                format!("SELECT {COLUMNS} FROM courier WHERE status = ? ORDER BY created_at");
            sqlx::query_as::<_, Courier>(&sql)
                .bind(status)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("SELECT {COLUMNS} FROM courier ORDER BY created_at");
            sqlx::query_as::<_, Courier>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

/// Insert a new courier in `pending` status, unavailable
pub async fn create(pool: &SqlitePool, user_id: &str, data: CourierCreate) -> RepoResult<Courier> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO courier (id, user_id, full_name, phone, vehicle_type, license_number, document_url, status, is_available, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', 0, ?8, ?8)",
    )
    .bind(id)
    .bind(user_id)
    .bind(&data.full_name)
    .bind(&data.phone)
    .bind(data.vehicle_type)
    .bind(&data.license_number)
    .bind(&data.document_url)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create courier".into()))
}

pub async fn set_availability(pool: &SqlitePool, id: i64, available: bool) -> RepoResult<Courier> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE courier SET is_available = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(available)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Courier {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Courier {id} not found")))
}

/// Move approval status, guarded by the expected current status
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    from: ApprovalStatus,
    to: ApprovalStatus,
    reason: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    // A courier that leaves `approved` also stops being available
    let rows = sqlx::query(
        "UPDATE courier SET status = ?1, rejection_reason = ?2, is_available = CASE WHEN ?1 = 'approved' THEN is_available ELSE 0 END, updated_at = ?3 WHERE id = ?4 AND status = ?5",
    )
    .bind(to)
    .bind(reason)
    .bind(now)
    .bind(id)
    .bind(from)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count_by_status(pool: &SqlitePool, status: ApprovalStatus) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courier WHERE status = ?")
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
