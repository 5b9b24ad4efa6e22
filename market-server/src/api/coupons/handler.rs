//! Coupon API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::message::{ChangeAction, ChangeEvent, ChangeTable};
use shared::models::{
    Coupon, CouponCreate, CouponQuote, CouponType, CouponUpdate, CouponValidateRequest,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::coupons;
use crate::db::repository::{RepoError, coupon};
use crate::utils::validation::{validate_money, validate_payload};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok_with_message};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CouponNotFound, format!("Coupon {} not found", id))
        .with_detail("id", id)
}

/// 百分比券的面值不能超过 100
fn check_value(coupon_type: CouponType, value: f64) -> AppResult<()> {
    validate_money(value, "value")?;
    if coupon_type == CouponType::Percentage && value > 100.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            "Percentage coupon value must not exceed 100",
        )
        .with_detail("value", value));
    }
    Ok(())
}

fn publish(state: &ServerState, action: ChangeAction, c: &Coupon) {
    state.publish(ChangeEvent::new(ChangeTable::Coupons, action, c.id).with_payload(c));
}

/// GET /api/coupons
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Coupon>>> {
    let rows = coupon::find_all(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/coupons/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Coupon>> {
    let c = coupon::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(c))
}

/// POST /api/coupons
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<Coupon>> {
    validate_payload(&payload)?;
    check_value(payload.coupon_type, payload.value)?;
    if let Some(min) = payload.min_order_value {
        validate_money(min, "min_order_value")?;
    }

    let c = coupon::create(&state.pool, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::CouponCodeExists, msg),
            other => other.into(),
        })?;

    tracing::info!(
        coupon_id = c.id,
        code = %c.code,
        coupon_type = ?c.coupon_type,
        value = c.value,
        operator = %current_user.id,
        "Coupon created"
    );
    publish(&state, ChangeAction::Created, &c);
    Ok(Json(c))
}

/// PUT /api/coupons/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CouponUpdate>,
) -> AppResult<Json<Coupon>> {
    validate_payload(&payload)?;
    let existing = coupon::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(value) = payload.value {
        check_value(existing.coupon_type, value)?;
    }
    if let Some(min) = payload.min_order_value {
        validate_money(min, "min_order_value")?;
    }

    let c = coupon::update(&state.pool, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;

    tracing::info!(coupon_id = id, operator = %current_user.id, "Coupon updated");
    publish(&state, ChangeAction::Updated, &c);
    Ok(Json(c))
}

/// DELETE /api/coupons/:id - 停用
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<i64>> {
    if !coupon::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(coupon_id = id, operator = %current_user.id, "Coupon deactivated");
    state.publish(ChangeEvent::new(ChangeTable::Coupons, ChangeAction::Deleted, id));
    Ok(ok_with_message("Coupon deactivated", id))
}

/// POST /api/coupons/validate - 校验优惠码并返回折扣试算
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<CouponValidateRequest>,
) -> AppResult<Json<CouponQuote>> {
    validate_payload(&payload)?;
    validate_money(payload.subtotal, "subtotal")?;

    let now = shared::util::now_millis();
    let (_, quote) = coupons::validate_code(&state.pool, &payload.code, payload.subtotal, now).await?;
    Ok(Json(quote))
}
