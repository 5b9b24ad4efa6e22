//! Market Server - 外卖/配送平台后端
//!
//! # 架构概述
//!
//! 顾客向商家下单，商家自配送或由平台骑手配送，平台按套餐/地区抽取佣金：
//!
//! - **注册审核** (`registration`): 客户、商家、骑手注册与管理员审核
//! - **定价** (`order_money`, `commission`, `coupons`): 金额计算、佣金解析、优惠券
//! - **配送时段** (`slots`): 容量预约与释放
//! - **订单** (`orders`): 下单事务、状态流转、骑手接单
//! - **通知** (`notifications`, `message`): 站内通知 + SSE 变更事件
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! market-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 校验、角色中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池与仓储
//! ├── registration/  # 注册与审核
//! ├── commission/    # 佣金解析
//! ├── coupons/       # 优惠券校验与折扣
//! ├── order_money/   # 金额计算 (Decimal)
//! ├── orders/        # 订单生命周期
//! ├── slots/         # 配送时段容量
//! ├── ratings/       # 评分
//! ├── reports/       # 收入与平台汇总
//! ├── notifications/ # 站内通知
//! ├── message/       # 变更事件广播
//! ├── storage/       # 上传文件存储
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod commission;
pub mod core;
pub mod coupons;
pub mod db;
pub mod message;
pub mod notifications;
pub mod order_money;
pub mod orders;
pub mod ratings;
pub mod registration;
pub mod reports;
pub mod slots;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::ChangeFeed;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

use tracing_appender::non_blocking::WorkerGuard;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 日志文件保留天数
const LOG_RETENTION_DAYS: u64 = 14;

/// 设置运行环境: 加载 .env、初始化日志
///
/// 返回的 guard 需要在 main 中一直持有，否则文件日志不会落盘。
pub fn setup_environment(config: &Config) -> Option<WorkerGuard> {
    let guard = init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );

    if let Some(dir) = config.log_dir.as_deref() {
        match cleanup_old_logs(dir, LOG_RETENTION_DAYS) {
            Ok(0) => {}
            Ok(n) => tracing::info!(removed = n, "Old log files removed"),
            Err(e) => tracing::warn!(error = %e, "Failed to clean up old logs"),
        }
    }

    guard
}

pub fn print_banner() {
    println!(
        r#"
    __  ___           __        __
   /  |/  /___ ______/ /_____  / /_
  / /|_/ / __ `/ ___/ //_/ _ \/ __/
 / /  / / /_/ / /  / ,< /  __/ /_
/_/  /_/\__,_/_/  /_/|_|\___/\__/
    "#
    );
}
