//! Delivery Slot API Handlers

use axum::extract::{Extension, Path, State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::slots;
use crate::utils::{ApiResponse, AppResult, ok_with_message};

/// DELETE /api/slots/:id - 停用时段 (没有预约时)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<i64>> {
    slots::delete(&state, &current_user, id).await?;
    Ok(ok_with_message("Delivery slot removed", id))
}
