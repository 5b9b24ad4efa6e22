//! Company Repository

use super::{RepoError, RepoResult};
use shared::models::{ApprovalStatus, Company, CompanyCreate, CompanyUpdate, Plan};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, owner_id, name, nif, email, phone, address, country, city, plan, delivery_types, delivery_fee, logo_url, document_url, status, rejection_reason, created_at, updated_at";

fn encode_delivery_types(types: &[shared::models::DeliveryType]) -> RepoResult<String> {
    serde_json::to_string(types).map_err(|e| RepoError::Validation(e.to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Company>> {
    let sql = format!("SELECT {COLUMNS} FROM company WHERE id = ?");
    let row = sqlx::query_as::<_, Company>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_owner(pool: &SqlitePool, owner_id: &str) -> RepoResult<Option<Company>> {
    let sql = format!("SELECT {COLUMNS} FROM company WHERE owner_id = ?");
    let row = sqlx::query_as::<_, Company>(&sql)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// List companies, optionally filtered by approval status
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<ApprovalStatus>,
) -> RepoResult<Vec<Company>> {
    let rows = match status {
        Some(status) => {
            let sql = format!("SELECT {COLUMNS} FROM company WHERE status = ? ORDER BY name");
            sqlx::query_as::<_, Company>(&sql)
                .bind(status)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("SELECT {COLUMNS} FROM company ORDER BY name");
            sqlx::query_as::<_, Company>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

/// Insert a new company in `pending` status
pub async fn create(pool: &SqlitePool, owner_id: &str, data: CompanyCreate) -> RepoResult<Company> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let plan = data.plan.unwrap_or(Plan::Basic);
    let delivery_types = encode_delivery_types(&data.delivery_types)?;

    sqlx::query(
        "INSERT INTO company (id, owner_id, name, nif, email, phone, address, country, city, plan, delivery_types, delivery_fee, logo_url, document_url, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 'pending', ?15, ?15)",
    )
    .bind(id)
    .bind(owner_id)
    .bind(&data.name)
    .bind(&data.nif)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.country)
    .bind(&data.city)
    .bind(plan)
    .bind(delivery_types)
    .bind(data.delivery_fee)
    .bind(&data.logo_url)
    .bind(&data.document_url)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create company".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CompanyUpdate) -> RepoResult<Company> {
    let now = shared::util::now_millis();
    let delivery_types = data
        .delivery_types
        .as_deref()
        .map(encode_delivery_types)
        .transpose()?;

    let rows = sqlx::query(
        "UPDATE company SET name = COALESCE(?1, name), email = COALESCE(?2, email), phone = COALESCE(?3, phone), address = COALESCE(?4, address), city = COALESCE(?5, city), delivery_types = COALESCE(?6, delivery_types), delivery_fee = COALESCE(?7, delivery_fee), logo_url = COALESCE(?8, logo_url), document_url = COALESCE(?9, document_url), updated_at = ?10 WHERE id = ?11",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.city)
    .bind(delivery_types)
    .bind(data.delivery_fee)
    .bind(&data.logo_url)
    .bind(&data.document_url)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Company {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Company {id} not found")))
}

pub async fn update_plan(pool: &SqlitePool, id: i64, plan: Plan) -> RepoResult<Company> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE company SET plan = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(plan)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Company {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Company {id} not found")))
}

/// Move approval status, guarded by the expected current status.
///
/// Returns `false` when the row is not (or no longer) in `from`.
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    from: ApprovalStatus,
    to: ApprovalStatus,
    reason: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE company SET status = ?1, rejection_reason = ?2, updated_at = ?3 WHERE id = ?4 AND status = ?5",
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
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM company WHERE status = ?")
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
