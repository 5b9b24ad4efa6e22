//! Rating Repository

use super::{RepoError, RepoResult};
use shared::models::{Rating, RatingTarget};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, order_id, rater_id, target_type, target_id, stars, comment, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Rating>> {
    let sql = format!("SELECT {COLUMNS} FROM rating WHERE id = ?");
    let row = sqlx::query_as::<_, Rating>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<Rating>> {
    let sql = format!("SELECT {COLUMNS} FROM rating WHERE order_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, Rating>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Insert; the (order, rater, target_type) unique key yields `Duplicate`
pub async fn create(
    pool: &SqlitePool,
    order_id: i64,
    rater_id: &str,
    target_type: RatingTarget,
    target_id: i64,
    stars: i64,
    comment: Option<&str>,
) -> RepoResult<Rating> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO rating (id, order_id, rater_id, target_type, target_id, stars, comment, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(order_id)
    .bind(rater_id)
    .bind(target_type)
    .bind(target_id)
    .bind(stars)
    .bind(comment)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create rating".into()))
}

/// (stars, count) pairs for one target
pub async fn star_counts(
    pool: &SqlitePool,
    target_type: RatingTarget,
    target_id: i64,
) -> RepoResult<Vec<(i64, i64)>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT stars, COUNT(*) FROM rating WHERE target_type = ? AND target_id = ? GROUP BY stars",
    )
    .bind(target_type)
    .bind(target_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
