//! Order API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::models::{
    Order, OrderAssign, OrderCancel, OrderCreate, OrderDetail, OrderEconomics, OrderFilter,
    OrderQuoteRequest, OrderStatusUpdate, Rating, RatingCreate,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::validate_payload;
use crate::{orders, ratings};

/// GET /api/orders - 按角色范围列出订单
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    let list = orders::list(&state, &current_user, &filter).await?;
    Ok(Json(list))
}

/// GET /api/orders/available - 待接的平台配送订单
pub async fn available(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    let list = orders::available(&state, &current_user, &filter).await?;
    Ok(Json(list))
}

/// POST /api/orders/quote - 试算 (不落库，不占用优惠券和时段)
pub async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<OrderQuoteRequest>,
) -> AppResult<Json<OrderEconomics>> {
    let economics = orders::quote(&state, payload).await?;
    Ok(Json(economics))
}

/// POST /api/orders - 下单
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::place(&state, &current_user, payload).await?;
    Ok(Json(detail))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::get(&state, &current_user, id).await?;
    Ok(Json(detail))
}

/// POST /api/orders/:id/status
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    validate_payload(&payload)?;
    let order = orders::update_status(
        &state,
        &current_user,
        id,
        payload.status,
        payload.reason.as_deref(),
    )
    .await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderCancel>,
) -> AppResult<Json<Order>> {
    validate_payload(&payload)?;
    let order = orders::cancel(&state, &current_user, id, payload.reason.as_deref()).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/assign - 骑手接单 / 管理员派单
pub async fn assign(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderAssign>,
) -> AppResult<Json<Order>> {
    let order = orders::assign(&state, &current_user, id, payload).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/ratings - 送达后评分
pub async fn rate(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RatingCreate>,
) -> AppResult<Json<Rating>> {
    let r = ratings::create(&state, &current_user, id, payload).await?;
    Ok(Json(r))
}

/// GET /api/orders/:id/ratings
pub async fn ratings(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Rating>>> {
    // 先确认调用者能看到这个订单
    orders::get(&state, &current_user, id).await?;
    let list = ratings::for_order(&state, id).await?;
    Ok(Json(list))
}
