//! Notification API 模块
//!
//! 站内通知的读取/已读，以及 `/stream` 实时事件推送 (SSE)。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/unread-count", get(handler::unread_count))
        .route("/read-all", post(handler::mark_all_read))
        .route("/stream", get(handler::stream))
        .route("/{id}/read", post(handler::mark_read))
}
