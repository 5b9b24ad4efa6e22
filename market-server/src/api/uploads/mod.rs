//! Upload Routes
//!
//! - `POST /api/uploads/{bucket}` 上传 (需登录)
//! - `GET /files/{bucket}/{filename}` 访问已上传文件 (公开)

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::core::ServerState;
use crate::storage::FILES_ROUTE;

pub fn router() -> Router<ServerState> {
    Router::new()
        // 大小上限由 FileStorage::store 按配置检查
        .route(
            "/api/uploads/{bucket}",
            post(handler::upload).layer(DefaultBodyLimit::disable()),
        )
        .route(
            &format!("{FILES_ROUTE}/{{bucket}}/{{filename}}"),
            get(handler::serve_file),
        )
}
