//! 认证授权模块
//!
//! 校验身份提供方签发的令牌，提供角色检查中间件：
//! - [`JwtService`] - JWT 令牌校验
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_role`] / [`require_admin`] - 角色检查中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, UserRole};
pub use middleware::{require_admin, require_auth, require_role};
