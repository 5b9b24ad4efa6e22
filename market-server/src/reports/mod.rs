//! 经营报表
//!
//! 只统计已送达 (`delivered`) 的订单。商家净收入 = 商品小计 − 优惠 − 平台佣金；
//! 配送费单独列出，不计入商家净收入。

use rust_decimal::Decimal;
use shared::models::{
    ApprovalStatus, CompanyEarnings, OrderStatus, PlatformSummary, ReportRange,
};
use std::collections::BTreeMap;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::report::{self, EarningsRow};
use crate::db::repository::{company, courier};
use crate::order_money::{to_decimal, to_f64};
use crate::registration::companies;
use crate::utils::{AppError, AppResult};

fn check_range(range: &ReportRange) -> AppResult<()> {
    if let (Some(from), Some(to)) = (range.from, range.to)
        && from >= to
    {
        return Err(AppError::validation("Report range must have from < to"));
    }
    Ok(())
}

/// Assemble earnings from the aggregate row
pub fn earnings_from(company_id: i64, row: &EarningsRow) -> CompanyEarnings {
    let net = to_decimal(row.gross_sales) - to_decimal(row.discounts) - to_decimal(row.commission_total);
    CompanyEarnings {
        company_id,
        delivered_orders: row.delivered_orders,
        gross_sales: to_f64(to_decimal(row.gross_sales)),
        delivery_fees: to_f64(to_decimal(row.delivery_fees)),
        discounts: to_f64(to_decimal(row.discounts)),
        commission_total: to_f64(to_decimal(row.commission_total)),
        net_earnings: to_f64(net.max(Decimal::ZERO)),
    }
}

/// 商家收入 (商家本人或管理员)
pub async fn company_earnings(
    state: &ServerState,
    user: &CurrentUser,
    company_id: i64,
    range: &ReportRange,
) -> AppResult<CompanyEarnings> {
    check_range(range)?;
    companies::load_owned(state, user, company_id).await?;
    let row = report::company_earnings(&state.pool, company_id, range).await?;
    Ok(earnings_from(company_id, &row))
}

/// 平台汇总 (管理员)
pub async fn platform_summary(state: &ServerState, range: &ReportRange) -> AppResult<PlatformSummary> {
    check_range(range)?;

    let mut orders_by_status: BTreeMap<String, i64> = OrderStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    for (status, count) in report::orders_by_status(&state.pool, range).await? {
        orders_by_status.insert(status, count);
    }

    let commission_total = report::commission_total(&state.pool, range).await?;
    let pending_companies = company::count_by_status(&state.pool, ApprovalStatus::Pending).await?;
    let pending_couriers = courier::count_by_status(&state.pool, ApprovalStatus::Pending).await?;

    Ok(PlatformSummary {
        orders_by_status,
        commission_total: to_f64(to_decimal(commission_total)),
        pending_companies,
        pending_couriers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_earnings() {
        let row = EarningsRow {
            delivered_orders: 2,
            gross_sales: 8000.0,
            delivery_fees: 1000.0,
            discounts: 550.0,
            commission_total: 1200.0,
        };
        let e = earnings_from(3, &row);
        assert_eq!(e.net_earnings, 6250.0);
        assert_eq!(e.delivery_fees, 1000.0);
        assert_eq!(e.delivered_orders, 2);
    }

    #[test]
    fn test_range_check() {
        assert!(check_range(&ReportRange::default()).is_ok());
        assert!(check_range(&ReportRange { from: Some(10), to: Some(5) }).is_err());
        assert!(check_range(&ReportRange { from: Some(1), to: Some(5) }).is_ok());
    }
}
