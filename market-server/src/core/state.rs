use std::path::PathBuf;
use std::sync::Arc;

use shared::message::ChangeEvent;
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::message::ChangeFeed;
use crate::storage::FileStorage;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是廉价克隆 (连接池 / Arc / broadcast sender)，每个请求
/// 拿到的是同一组服务。进程内没有其他可变业务状态，所有业务数据
/// 都在数据库中。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | 数据库连接池 |
/// | jwt_service | Arc<JwtService> | 令牌校验 |
/// | change_feed | ChangeFeed | 变更事件广播 |
/// | storage | FileStorage | 上传文件存储 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub change_feed: ChangeFeed,
    pub storage: FileStorage,
}

impl ServerState {
    /// 使用已有连接池构造 (测试中配合内存数据库使用)
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let change_feed = ChangeFeed::new(config.change_feed_capacity);
        let storage = FileStorage::new(config.uploads_dir(), &config.public_base_url);
        Self {
            config,
            pool,
            jwt_service,
            change_feed,
            storage,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (work_dir, work_dir/uploads)
    /// 2. 数据库 (连接 + 迁移)
    /// 3. 各服务 (JWT, ChangeFeed, FileStorage)
    pub async fn initialize(config: &Config) -> Result<Self> {
        let work_dir = config.work_dir();
        std::fs::create_dir_all(&work_dir)?;
        std::fs::create_dir_all(config.uploads_dir())?;

        let db = DbService::new(&config.database_url).await?;

        tracing::info!(
            work_dir = %work_dir.display(),
            environment = %config.environment,
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), db.pool))
    }

    pub fn work_dir(&self) -> PathBuf {
        self.config.work_dir()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 发布变更事件 (写入提交之后调用)
    pub fn publish(&self, event: ChangeEvent) {
        self.change_feed.publish(event);
    }
}
