//! Courier API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::models::{
    ApprovalFilter, ApprovalStatus, Courier, CourierAvailabilityUpdate, CourierCreate,
    RatingSummary, RatingTarget, RejectRequest,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::ratings;
use crate::registration::{approval, couriers};
use crate::utils::AppResult;
use crate::utils::validation::validate_payload;

/// GET /api/couriers - 骑手列表 (管理员)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<ApprovalFilter>,
) -> AppResult<Json<Vec<Courier>>> {
    let list = couriers::list(&state, filter.status).await?;
    Ok(Json(list))
}

/// GET /api/couriers/:id - 本人或管理员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Courier>> {
    let c = couriers::get(&state, &current_user, id).await?;
    Ok(Json(c))
}

/// POST /api/couriers - 注册骑手 (待审核)
pub async fn register(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CourierCreate>,
) -> AppResult<Json<Courier>> {
    let c = couriers::register(&state, &current_user, payload).await?;
    Ok(Json(c))
}

/// PUT /api/couriers/:id/availability
pub async fn set_availability(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CourierAvailabilityUpdate>,
) -> AppResult<Json<Courier>> {
    let c = couriers::set_availability(&state, &current_user, id, payload.is_available).await?;
    Ok(Json(c))
}

/// POST /api/couriers/:id/approve
pub async fn approve(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Courier>> {
    let c = approval::decide_courier(&state, &current_user, id, ApprovalStatus::Approved, None).await?;
    Ok(Json(c))
}

/// POST /api/couriers/:id/reject
pub async fn reject(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RejectRequest>,
) -> AppResult<Json<Courier>> {
    validate_payload(&payload)?;
    let c = approval::decide_courier(
        &state,
        &current_user,
        id,
        ApprovalStatus::Rejected,
        Some(&payload.reason),
    )
    .await?;
    Ok(Json(c))
}

/// GET /api/couriers/:id/ratings/summary
pub async fn rating_summary(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RatingSummary>> {
    let s = ratings::summary(&state, RatingTarget::Courier, id).await?;
    Ok(Json(s))
}
