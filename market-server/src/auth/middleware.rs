//! 认证中间件
//!
//! 为 JWT 认证和角色授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::ErrorCode;

use crate::AppError;
use crate::auth::extractor::jwt_rejection;
use crate::auth::{CurrentUser, JwtService, UserRole};
use crate::core::ServerState;
use crate::security_log;

/// SSE 路径: 浏览器 EventSource 无法设置请求头，允许 `?access_token=`
const STREAM_PATH: &str = "/api/notifications/stream";

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/health`, `/files/...`)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 / 未知角色 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let header_token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|header| {
            JwtService::extract_from_header(header)
                .map(str::to_string)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))
        })
        .transpose()?;

    let token = match header_token {
        Some(t) => t,
        None if path == STREAM_PATH => match query_token(req.uri().query()) {
            Some(t) => t,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
                return Err(AppError::unauthorized());
            }
        },
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match state.get_jwt_service().authenticate(&token) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(jwt_rejection(e))
        }
    }
}

fn query_token(query: Option<&str>) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "access_token")
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// 角色检查中间件 - 要求任一指定角色 (管理员总是放行)
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/", post(handler::create))
///     .layer(middleware::from_fn(require_role(&[UserRole::Company])));
/// ```
pub fn require_role(
    roles: &'static [UserRole],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_any_role(roles) {
                security_log!(
                    "WARN",
                    "role_required",
                    user_id = user.id.clone(),
                    user_role = user.role.as_str(),
                    required = format!("{:?}", roles)
                );
                return Err(AppError::with_message(
                    ErrorCode::RoleRequired,
                    format!("Requires role: {}", join_roles(roles)),
                ));
            }

            Ok(next.run(req).await)
        })
    }
}

fn join_roles(roles: &[UserRole]) -> String {
    roles
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// 管理员中间件 - 要求管理员角色
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            user_role = user.role.as_str()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_token() {
        assert_eq!(
            query_token(Some("a=1&access_token=xyz")),
            Some("xyz".to_string())
        );
        assert_eq!(query_token(Some("access_token=")), None);
        assert_eq!(query_token(None), None);
    }
}
