//! Commission Config API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::message::{ChangeAction, ChangeEvent, ChangeTable};
use shared::models::{
    CommissionConfig, CommissionConfigCreate, CommissionConfigUpdate, CommissionPreviewRequest,
    CommissionQuote,
};

use crate::auth::CurrentUser;
use crate::commission::{self, CommissionRequest};
use crate::core::ServerState;
use crate::db::repository::{RepoError, commission_config};
use crate::utils::validation::{validate_money, validate_payload};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok_with_message};

fn config_error(err: RepoError, id: Option<i64>) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::CommissionConfigDuplicate, msg),
        RepoError::NotFound(_) => not_found(id.unwrap_or_default()),
        other => other.into(),
    }
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::CommissionConfigNotFound,
        format!("Commission config {} not found", id),
    )
    .with_detail("id", id)
}

/// 佣金百分比必须在 0..=100
fn check_rate(rate: f64) -> AppResult<()> {
    if rate.is_finite() && (0.0..=100.0).contains(&rate) {
        return Ok(());
    }
    Err(AppError::with_message(
        ErrorCode::InvalidCommissionRate,
        "commission_percentage must be between 0 and 100",
    )
    .with_detail("commission_percentage", rate))
}

fn publish(state: &ServerState, action: ChangeAction, cfg: &CommissionConfig) {
    state.publish(
        ChangeEvent::new(ChangeTable::CommissionConfigs, action, cfg.id).with_payload(cfg),
    );
}

/// GET /api/commission-configs
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<CommissionConfig>>> {
    let rows = commission_config::find_all(&state.pool).await?;
    Ok(Json(rows))
}

/// POST /api/commission-configs
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CommissionConfigCreate>,
) -> AppResult<Json<CommissionConfig>> {
    check_rate(payload.commission_percentage)?;
    validate_payload(&payload)?;

    let cfg = commission_config::create(&state.pool, payload)
        .await
        .map_err(|e| config_error(e, None))?;

    tracing::info!(
        config_id = cfg.id,
        country = %cfg.country,
        city = ?cfg.city,
        plan = %cfg.plan,
        delivery_type = %cfg.delivery_type,
        rate = cfg.commission_percentage,
        operator = %current_user.id,
        "Commission config created"
    );
    publish(&state, ChangeAction::Created, &cfg);
    Ok(Json(cfg))
}

/// PUT /api/commission-configs/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CommissionConfigUpdate>,
) -> AppResult<Json<CommissionConfig>> {
    if let Some(rate) = payload.commission_percentage {
        check_rate(rate)?;
    }
    validate_payload(&payload)?;

    let cfg = commission_config::update(&state.pool, id, payload)
        .await
        .map_err(|e| config_error(e, Some(id)))?;

    tracing::info!(
        config_id = cfg.id,
        rate = cfg.commission_percentage,
        is_active = cfg.is_active,
        operator = %current_user.id,
        "Commission config updated"
    );
    publish(&state, ChangeAction::Updated, &cfg);
    Ok(Json(cfg))
}

/// DELETE /api/commission-configs/:id - 停用
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<i64>> {
    if !commission_config::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(config_id = id, operator = %current_user.id, "Commission config deactivated");
    state.publish(ChangeEvent::new(
        ChangeTable::CommissionConfigs,
        ChangeAction::Deleted,
        id,
    ));
    Ok(ok_with_message("Commission config deactivated", id))
}

/// POST /api/commission-configs/preview - 试算某个组合的佣金
pub async fn preview(
    State(state): State<ServerState>,
    Json(payload): Json<CommissionPreviewRequest>,
) -> AppResult<Json<CommissionQuote>> {
    validate_money(payload.subtotal, "subtotal")?;

    let req = CommissionRequest {
        subtotal: payload.subtotal,
        plan: payload.plan,
        delivery_type: payload.delivery_type,
        country: payload.country.as_deref(),
        city: payload.city.as_deref(),
    };
    Ok(Json(commission::resolve(&state.pool, &req).await))
}
