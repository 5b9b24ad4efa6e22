//! 统一错误处理
//!
//! 应用错误与响应结构来自 `shared::error`，这里补充服务端专用的转换：
//! - `sqlx::Error` → [`AppError`] (记录日志，不向客户端暴露细节)
//! - `MultipartError` → [`AppError`]
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Company 42"))
//!
//! // 返回成功响应
//! Ok(Json(data))
//! ```

use axum::extract::multipart::MultipartError;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Convert a raw sqlx error (outside the repository layer) into an AppError
pub fn db_error(err: sqlx::Error) -> AppError {
    tracing::error!(error = %err, "Database error");
    AppError::new(ErrorCode::DatabaseError)
}

/// Convert a multipart parse error into an AppError
pub fn multipart_error(err: MultipartError) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidRequest,
        format!("Invalid multipart request: {}", err.body_text()),
    )
}

/// 创建成功响应
pub fn ok<T>(data: T) -> ApiResponse<T> {
    ApiResponse::success(data)
}

/// 创建带消息的成功响应
pub fn ok_with_message<T>(message: impl Into<String>, data: T) -> ApiResponse<T> {
    ApiResponse::success_with_message(message, data)
}
