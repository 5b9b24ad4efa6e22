//! Order API 模块
//!
//! 下单 (客户)、接单 (骑手)、状态流转与评分。参与方的细粒度校验在
//! `crate::orders` 里完成，这里只做角色级别的粗筛。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{UserRole, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let shared_routes = Router::new()
        .route("/", get(handler::list))
        .route("/quote", post(handler::quote))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", post(handler::update_status))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/ratings", get(handler::ratings));

    let customer_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/ratings", post(handler::rate))
        .route_layer(middleware::from_fn(require_role(&[UserRole::Customer])));

    let courier_routes = Router::new()
        .route("/available", get(handler::available))
        .route("/{id}/assign", post(handler::assign))
        .route_layer(middleware::from_fn(require_role(&[UserRole::Courier])));

    shared_routes.merge(customer_routes).merge(courier_routes)
}
