//! Customer API Handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use shared::models::{Customer, CustomerCreate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::registration::customers;
use crate::utils::AppResult;

/// POST /api/customers - 注册客户资料
pub async fn register(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    let c = customers::register(&state, &current_user, payload).await?;
    Ok(Json(c))
}

/// GET /api/customers/me - 当前客户资料
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Customer>> {
    let c = customers::me(&state, &current_user).await?;
    Ok(Json(c))
}
