//! Notification API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use shared::models::{Notification, NotificationQuery};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::notifications;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// GET /api/notifications?unread_only=&limit=
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let list = notifications::list(&state, &current_user.id, &query).await?;
    Ok(Json(list))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<UnreadCount>> {
    let unread = notifications::unread_count(&state, &current_user.id).await?;
    Ok(ok(UnreadCount { unread }))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<i64>> {
    notifications::mark_read(&state, &current_user.id, id).await?;
    Ok(ok_with_message("Notification marked as read", id))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<u64>> {
    let updated = notifications::mark_all_read(&state, &current_user.id).await?;
    Ok(ok_with_message("Notifications marked as read", updated))
}

/// GET /api/notifications/stream - 当前用户可见的变更事件 (SSE)
///
/// 事件名为 `<table>.<action>`，数据为 JSON。浏览器 EventSource 不能带
/// Authorization 头，令牌可以放在 `?access_token=` 中。
pub async fn stream(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    tracing::info!(user_id = %current_user.id, role = current_user.role.as_str(), "Change stream opened");

    let events = state
        .change_feed
        .stream_for(current_user.id.clone(), current_user.is_admin())
        .map(|ev| Event::default().event(ev.event_name()).json_data(&ev));

    Sse::new(events).keep_alive(KeepAlive::default())
}
