//! Coupon API 模块
//!
//! 管理员维护优惠券；任何登录用户都可以在下单前校验优惠码。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/coupons", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new().route("/validate", post(handler::validate));

    let admin_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route_layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}
