//! JWT 令牌服务
//!
//! 登录与会话签发由外部身份提供方负责，这里只校验其签发的 HS256
//! 令牌并解析出 [`CurrentUser`]。`generate_token` 仅用于测试和本地调试。

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT 配置
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// 共享密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌签发者 (身份提供方)
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
    /// 时钟偏差容忍 (秒)
    pub leeway_seconds: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl JwtConfig {
    /// 从环境变量加载
    ///
    /// | 环境变量 | 默认值 |
    /// |----------|--------|
    /// | JWT_SECRET | (开发环境随机生成) |
    /// | JWT_ISSUER | market-auth |
    /// | JWT_AUDIENCE | market-api |
    /// | JWT_LEEWAY_SECONDS | 30 |
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => {
                if secret.len() < 32 {
                    tracing::warn!("JWT_SECRET is shorter than 32 characters");
                }
                secret
            }
            Err(_) => {
                tracing::warn!(
                    "JWT_SECRET not set! Using a random key, no provider token will validate."
                );
                random_secret()
            }
        };

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "market-auth".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "market-api".to_string()),
            leeway_seconds: std::env::var("JWT_LEEWAY_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    pub fn for_tests() -> Self {
        Self {
            secret: "test-secret-key-that-is-long-enough-for-hs256".to_string(),
            issuer: "market-auth".to_string(),
            audience: "market-api".to_string(),
            leeway_seconds: 0,
        }
    }
}

/// 生成可打印的随机密钥
fn random_secret() -> String {
    use rand::Rng;
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}

/// 平台角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Company,
    Courier,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Company => "company",
            UserRole::Courier => "courier",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "company" => Ok(UserRole::Company),
            "courier" => Ok(UserRole::Courier),
            "admin" => Ok(UserRole::Admin),
            other => Err(JwtError::InvalidToken(format!("unknown role '{other}'"))),
        }
    }
}

/// 身份提供方令牌中的 Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 角色名称
    pub role: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用指定配置创建 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 签发令牌 (测试 / 本地调试)
    pub fn generate_token(
        &self,
        user_id: &str,
        email: Option<&str>,
        role: UserRole,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            role: role.as_str().to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iss", "aud"]);
        validation.leeway = self.config.leeway_seconds;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// 校验并转换为 [`CurrentUser`]
    pub fn authenticate(&self, token: &str) -> Result<CurrentUser, JwtError> {
        let claims = self.validate_token(token)?;
        CurrentUser::try_from(claims)
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求处理函数
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 身份提供方用户 ID
    pub id: String,
    pub email: Option<String>,
    pub role: UserRole,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        if claims.sub.trim().is_empty() {
            return Err(JwtError::InvalidToken("empty subject".to_string()));
        }
        Ok(Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role.parse()?,
        })
    }
}

impl CurrentUser {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }

    /// 管理员视为拥有任意角色
    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        self.is_admin() || roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::for_tests())
    }

    #[test]
    fn test_generate_and_validate() {
        let service = service();
        let token = service
            .generate_token("user-1", Some("a@b.pt"), UserRole::Courier, Duration::hours(1))
            .expect("Failed to generate test token");

        let user = service.authenticate(&token).expect("Failed to validate");
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email.as_deref(), Some("a@b.pt"));
        assert_eq!(user.role, UserRole::Courier);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let token = service
            .generate_token("user-1", None, UserRole::Customer, Duration::hours(-2))
            .unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service()
            .generate_token("user-1", None, UserRole::Admin, Duration::hours(1))
            .unwrap();
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-key-that-is-long-enough-xx".to_string(),
            ..JwtConfig::for_tests()
        });
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let token = service()
            .generate_token("user-1", None, UserRole::Admin, Duration::hours(1))
            .unwrap();
        let other = JwtService::with_config(JwtConfig {
            audience: "someone-else".to_string(),
            ..JwtConfig::for_tests()
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let claims = Claims {
            sub: "u".into(),
            email: None,
            role: "superuser".into(),
            exp: 0,
            iat: 0,
            iss: String::new(),
            aud: String::new(),
        };
        assert!(CurrentUser::try_from(claims).is_err());
    }

    #[test]
    fn test_admin_has_any_role() {
        let admin = CurrentUser {
            id: "a".into(),
            email: None,
            role: UserRole::Admin,
        };
        assert!(admin.has_any_role(&[UserRole::Company]));
        let courier = CurrentUser {
            role: UserRole::Courier,
            ..admin
        };
        assert!(!courier.has_any_role(&[UserRole::Company]));
        assert!(courier.has_any_role(&[UserRole::Company, UserRole::Courier]));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
