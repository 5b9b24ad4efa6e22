//! Customer Repository

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, user_id, full_name, email, phone, default_address, created_at";

pub async fn find_by_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Option<Customer>> {
    let sql = format!("SELECT {COLUMNS} FROM customer WHERE user_id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("SELECT {COLUMNS} FROM customer WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, user_id: &str, data: CustomerCreate) -> RepoResult<Customer> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO customer (id, user_id, full_name, email, phone, default_address, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(user_id)
    .bind(&data.full_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.default_address)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}
