//! Upload Handlers

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Multipart, Path, State},
    response::{IntoResponse, Response},
};
use http::{StatusCode, header};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::storage::{Bucket, StoredFile};
use crate::utils::error::multipart_error;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Multipart 字段名
const FILE_FIELD: &str = "file";

/// POST /api/uploads/:bucket
pub async fn upload(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<StoredFile>> {
    let bucket: Bucket = bucket.parse()?;

    let mut file: Option<(String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::RequiredField, "No filename provided in file field")
                    .with_detail("field", FILE_FIELD)
            })?;
        let data = field.bytes().await.map_err(multipart_error)?;
        file = Some((name, data));
        break;
    }

    let (original_name, data) = file.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::NoFileProvided,
            format!("No '{}' field found", FILE_FIELD),
        )
    })?;

    let stored = state
        .storage
        .store(bucket, &original_name, &data, state.config.max_upload_bytes)
        .await?;

    tracing::info!(
        user_id = %current_user.id,
        bucket = %bucket,
        original_name = %original_name,
        filename = %stored.filename,
        size = stored.size,
        "File uploaded"
    );
    Ok(Json(stored))
}

/// 文件访问响应
pub enum FileResponse {
    Ok { content: Bytes, content_type: String },
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for FileResponse {
    fn into_response(self) -> Response {
        match self {
            FileResponse::Ok {
                content,
                content_type,
            } => (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], content).into_response(),
            FileResponse::NotFound => (StatusCode::NOT_FOUND, "File not found").into_response(),
            FileResponse::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
        }
    }
}

fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.starts_with('.')
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
}

/// GET /files/:bucket/:filename
pub async fn serve_file(
    State(state): State<ServerState>,
    Path((bucket, filename)): Path<(String, String)>,
) -> FileResponse {
    let Ok(bucket) = bucket.parse::<Bucket>() else {
        return FileResponse::NotFound;
    };
    if !is_safe_filename(&filename) {
        return FileResponse::BadRequest("Invalid filename");
    }

    let path = state.storage.root().join(bucket.as_str()).join(&filename);
    match tokio::fs::read(&path).await {
        Ok(content) => FileResponse::Ok {
            content: content.into(),
            content_type: mime_guess::from_path(&path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        },
        Err(e) => {
            tracing::debug!(bucket = %bucket, filename = %filename, error = %e, "File not found");
            FileResponse::NotFound
        }
    }
}
