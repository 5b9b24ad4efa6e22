//! 注册与审核
//!
//! 客户注册即生效；商家与骑手注册后处于 `pending`，由管理员审核。

pub mod approval;
pub mod companies;
pub mod couriers;
pub mod customers;

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

/// 唯一约束冲突 → AlreadyRegistered，其余照常转换
pub(crate) fn registration_error(err: RepoError, what: &str) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::with_message(
            ErrorCode::AlreadyRegistered,
            format!("{} already registered", what),
        ),
        other => other.into(),
    }
}
