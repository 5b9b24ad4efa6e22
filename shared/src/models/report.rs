//! Aggregated reports

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Earnings of a company over its delivered orders
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyEarnings {
    pub company_id: i64,
    pub delivered_orders: i64,
    /// Sum of subtotals
    pub gross_sales: f64,
    pub delivery_fees: f64,
    pub discounts: f64,
    pub commission_total: f64,
    /// gross_sales - discounts - commission_total (floored at 0)
    pub net_earnings: f64,
}

/// Platform-wide summary for administrators
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlatformSummary {
    pub orders_by_status: BTreeMap<String, i64>,
    /// Commission of delivered orders
    pub commission_total: f64,
    pub pending_companies: i64,
    pub pending_couriers: i64,
}

/// Optional time window (Unix millis)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}
