//! Company API 模块
//!
//! 注册、资料、审核，以及挂在商家下的配送时段、评分汇总和收入报表。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{UserRole, require_admin, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/companies", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/slots", get(handler::list_slots))
        .route("/{id}/ratings/summary", get(handler::rating_summary));

    let owner_routes = Router::new()
        .route("/", post(handler::register))
        .route("/{id}", put(handler::update))
        .route("/{id}/slots", post(handler::create_slot))
        .route("/{id}/slots/all", get(handler::list_all_slots))
        .route("/{id}/earnings", get(handler::earnings))
        .route_layer(middleware::from_fn(require_role(&[UserRole::Company])));

    let admin_routes = Router::new()
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/plan", put(handler::change_plan))
        .route_layer(middleware::from_fn(require_admin));

    read_routes.merge(owner_routes).merge(admin_routes)
}
