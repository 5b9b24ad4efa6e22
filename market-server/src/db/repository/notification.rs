//! Notification Repository

use super::{RepoError, RepoResult, page_limit};
use shared::models::{Notification, NotificationCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, user_id, kind, title, body, order_id, is_read, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let sql = format!("SELECT {COLUMNS} FROM notification WHERE id = ?");
    let row = sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_user(
    pool: &SqlitePool,
    user_id: &str,
    unread_only: bool,
    limit: Option<i64>,
) -> RepoResult<Vec<Notification>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM notification WHERE user_id = ?1 AND (?2 = 0 OR is_read = 0) \
         ORDER BY created_at DESC, id DESC LIMIT ?3"
    );
    let rows = sqlx::query_as::<_, Notification>(&sql)
        .bind(user_id)
        .bind(unread_only)
        .bind(page_limit(limit))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &NotificationCreate) -> RepoResult<Notification> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO notification (id, user_id, kind, title, body, order_id, is_read, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
    )
    .bind(id)
    .bind(&data.user_id)
    .bind(data.kind)
    .bind(&data.title)
    .bind(&data.body)
    .bind(data.order_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create notification".into()))
}

/// Mark one notification of `user_id` as read
pub async fn mark_read(pool: &SqlitePool, id: i64, user_id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE notification SET is_read = 1 WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn mark_all_read(pool: &SqlitePool, user_id: &str) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE notification SET is_read = 1 WHERE user_id = ? AND is_read = 0")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn count_unread(pool: &SqlitePool, user_id: &str) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notification WHERE user_id = ? AND is_read = 0",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
