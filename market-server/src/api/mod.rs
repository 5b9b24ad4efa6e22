//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`customers`] - 客户注册
//! - [`companies`] - 商家注册、审核、配送时段、评分、收入
//! - [`couriers`] - 骑手注册、审核、在线状态
//! - [`commission_configs`] - 佣金覆盖配置 (管理员)
//! - [`coupons`] - 优惠券管理与校验
//! - [`slots`] - 配送时段删除
//! - [`orders`] - 订单
//! - [`notifications`] - 通知与 SSE 事件流
//! - [`uploads`] - 文件上传与访问
//! - [`reports`] - 平台汇总 (管理员)

pub mod commission_configs;
pub mod companies;
pub mod coupons;
pub mod couriers;
pub mod customers;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod reports;
pub mod slots;
pub mod uploads;

use axum::{Router, middleware};

use crate::auth::require_auth;
use crate::core::ServerState;

/// 组装所有路由 (未绑定 state)
///
/// JWT 认证中间件在 Router 级别应用，`require_auth` 内部跳过 `/health`
/// 与 `/files` 等公共路径。
pub fn router(state: ServerState) -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(customers::router())
        .merge(companies::router())
        .merge(couriers::router())
        .merge(commission_configs::router())
        .merge(coupons::router())
        .merge(slots::router())
        .merge(orders::router())
        .merge(notifications::router())
        .merge(uploads::router())
        .merge(reports::router())
        .layer(middleware::from_fn_with_state(state, require_auth))
}
