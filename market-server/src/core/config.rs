use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、上传文件) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite:{WORK_DIR}/market.db | SQLite 数据库 |
/// | PUBLIC_BASE_URL | http://localhost:{HTTP_PORT} | 上传文件公开 URL 前缀 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 设置后启用按天滚动的文件日志 |
/// | DEFAULT_DELIVERY_FEE | 500 | 公司未设置配送费时使用 |
/// | MAX_UPLOAD_BYTES | 5242880 | 上传大小上限 |
/// | CHANGE_FEED_CAPACITY | 1024 | 变更事件广播缓冲 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/market HTTP_PORT=8080 cargo run -p market-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 连接串
    pub database_url: String,
    /// 上传文件 URL 前缀
    pub public_base_url: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 身份提供方令牌校验配置
    pub jwt: JwtConfig,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 默认配送费
    pub default_delivery_fee: f64,
    pub max_upload_bytes: usize,
    pub change_feed_capacity: usize,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let http_port: u16 = env_or("HTTP_PORT", 3000);
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| format!("sqlite:{}/market.db", work_dir.trim_end_matches('/')));
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{http_port}"));

        Self {
            work_dir,
            http_port,
            database_url,
            public_base_url,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::from_env(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            default_delivery_fee: env_or("DEFAULT_DELIVERY_FEE", 500.0),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            change_feed_capacity: env_or("CHANGE_FEED_CAPACITY", 1024),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
        }
    }

    /// 测试用配置：内存数据库 + 指定工作目录，不读取环境变量
    pub fn for_tests(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            database_url: "sqlite::memory:".into(),
            public_base_url: "http://localhost".into(),
            environment: "test".into(),
            jwt: JwtConfig::for_tests(),
            log_level: "debug".into(),
            log_dir: None,
            default_delivery_fee: 500.0,
            max_upload_bytes: 5 * 1024 * 1024,
            change_feed_capacity: 64,
            request_timeout_ms: 30_000,
        }
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    /// 上传文件根目录
    pub fn uploads_dir(&self) -> PathBuf {
        self.work_dir().join("uploads")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
