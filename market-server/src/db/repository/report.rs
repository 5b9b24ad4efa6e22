//! Report Repository (aggregate queries)

use super::RepoResult;
use shared::models::ReportRange;
use sqlx::SqlitePool;

/// Sums over delivered orders of a company
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct EarningsRow {
    pub delivered_orders: i64,
    pub gross_sales: f64,
    pub delivery_fees: f64,
    pub discounts: f64,
    pub commission_total: f64,
}

pub async fn company_earnings(
    pool: &SqlitePool,
    company_id: i64,
    range: &ReportRange,
) -> RepoResult<EarningsRow> {
    let row = sqlx::query_as::<_, EarningsRow>(
        "SELECT COUNT(*) AS delivered_orders, \
                COALESCE(SUM(subtotal), 0.0) AS gross_sales, \
                COALESCE(SUM(delivery_fee), 0.0) AS delivery_fees, \
                COALESCE(SUM(discount_amount), 0.0) AS discounts, \
                COALESCE(SUM(commission_amount), 0.0) AS commission_total \
         FROM orders \
         WHERE company_id = ?1 AND status = 'delivered' \
           AND (?2 IS NULL OR created_at >= ?2) AND (?3 IS NULL OR created_at < ?3)",
    )
    .bind(company_id)
    .bind(range.from)
    .bind(range.to)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Order counts grouped by status
pub async fn orders_by_status(
    pool: &SqlitePool,
    range: &ReportRange,
) -> RepoResult<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM orders \
         WHERE (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2) \
         GROUP BY status",
    )
    .bind(range.from)
    .bind(range.to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Commission of delivered orders across the platform
pub async fn commission_total(pool: &SqlitePool, range: &ReportRange) -> RepoResult<f64> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(commission_amount), 0.0) FROM orders \
         WHERE status = 'delivered' \
           AND (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2)",
    )
    .bind(range.from)
    .bind(range.to)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
