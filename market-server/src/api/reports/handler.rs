//! Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use shared::models::{PlatformSummary, ReportRange};

use crate::core::ServerState;
use crate::reports;
use crate::utils::AppResult;

/// GET /api/admin/summary?from=&to= - 平台订单与佣金汇总
pub async fn summary(
    State(state): State<ServerState>,
    Query(range): Query<ReportRange>,
) -> AppResult<Json<PlatformSummary>> {
    let s = reports::platform_summary(&state, &range).await?;
    Ok(Json(s))
}
