//! Courier API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{UserRole, require_admin, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/couriers", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/{id}/ratings/summary", get(handler::rating_summary));

    let courier_routes = Router::new()
        .route("/", post(handler::register))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/availability", put(handler::set_availability))
        .route_layer(middleware::from_fn(require_role(&[UserRole::Courier])));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .route_layer(middleware::from_fn(require_admin));

    read_routes.merge(courier_routes).merge(admin_routes)
}
