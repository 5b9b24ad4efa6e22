//! Company API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::models::{
    ApprovalFilter, ApprovalStatus, Company, CompanyCreate, CompanyEarnings, CompanyPlanUpdate,
    CompanyUpdate, DeliverySlot, DeliverySlotCreate, RatingSummary, RatingTarget, RejectRequest,
    ReportRange,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::registration::{approval, companies};
use crate::utils::AppResult;
use crate::utils::validation::validate_payload;
use crate::{ratings, reports, slots};

/// GET /api/companies - 商家列表 (非管理员只看到已审核的)
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(filter): Query<ApprovalFilter>,
) -> AppResult<Json<Vec<Company>>> {
    let list = companies::list(&state, &current_user, filter.status).await?;
    Ok(Json(list))
}

/// GET /api/companies/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Company>> {
    let c = companies::get(&state, &current_user, id).await?;
    Ok(Json(c))
}

/// POST /api/companies - 注册商家 (待审核)
pub async fn register(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CompanyCreate>,
) -> AppResult<Json<Company>> {
    let c = companies::register(&state, &current_user, payload).await?;
    Ok(Json(c))
}

/// PUT /api/companies/:id - 更新资料 (本人)
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CompanyUpdate>,
) -> AppResult<Json<Company>> {
    let c = companies::update(&state, &current_user, id, payload).await?;
    Ok(Json(c))
}

/// PUT /api/companies/:id/plan - 修改套餐 (管理员)
pub async fn change_plan(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CompanyPlanUpdate>,
) -> AppResult<Json<Company>> {
    let c = companies::change_plan(&state, id, payload.plan).await?;
    Ok(Json(c))
}

/// POST /api/companies/:id/approve
pub async fn approve(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Company>> {
    let c = approval::decide_company(&state, &current_user, id, ApprovalStatus::Approved, None).await?;
    Ok(Json(c))
}

/// POST /api/companies/:id/reject
pub async fn reject(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RejectRequest>,
) -> AppResult<Json<Company>> {
    validate_payload(&payload)?;
    let c = approval::decide_company(
        &state,
        &current_user,
        id,
        ApprovalStatus::Rejected,
        Some(&payload.reason),
    )
    .await?;
    Ok(Json(c))
}

/// GET /api/companies/:id/slots - 可预约的配送时段
pub async fn list_slots(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<DeliverySlot>>> {
    let list = slots::list_offerable(&state, id).await?;
    Ok(Json(list))
}

/// GET /api/companies/:id/slots/all - 全部有效时段 (含已满)
pub async fn list_all_slots(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<DeliverySlot>>> {
    let list = slots::list_for_owner(&state, &current_user, id).await?;
    Ok(Json(list))
}

/// POST /api/companies/:id/slots
pub async fn create_slot(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<DeliverySlotCreate>,
) -> AppResult<Json<DeliverySlot>> {
    let slot = slots::create(&state, &current_user, id, payload).await?;
    Ok(Json(slot))
}

/// GET /api/companies/:id/ratings/summary
pub async fn rating_summary(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RatingSummary>> {
    let s = ratings::summary(&state, RatingTarget::Company, id).await?;
    Ok(Json(s))
}

/// GET /api/companies/:id/earnings?from=&to=
pub async fn earnings(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(range): Query<ReportRange>,
) -> AppResult<Json<CompanyEarnings>> {
    let e = reports::company_earnings(&state, &current_user, id, &range).await?;
    Ok(Json(e))
}
