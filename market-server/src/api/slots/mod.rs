//! Delivery Slot API 模块
//!
//! 时段的列表与创建挂在 `/api/companies/{id}/slots` 下，这里只有删除。

mod handler;

use axum::{Router, middleware, routing::delete};

use crate::auth::{UserRole, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/slots", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", delete(handler::delete))
        .route_layer(middleware::from_fn(require_role(&[UserRole::Company])))
}
