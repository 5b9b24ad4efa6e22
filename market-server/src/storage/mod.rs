//! 上传文件存储
//!
//! 本地目录充当对象存储: `{uploads_dir}/{bucket}/{sha256}.{ext}`，
//! 由 `/files` 静态路由对外提供。相同内容只保存一份。

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::utils::{AppError, AppResult, ErrorCode};

/// 公开访问前缀
pub const FILES_ROUTE: &str = "/files";

/// 存储桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// 营业执照、证件等
    Documents,
    /// Logo、商品图片
    Images,
}

impl Bucket {
    pub const ALL: [Bucket; 2] = [Bucket::Documents, Bucket::Images];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Documents => "documents",
            Bucket::Images => "images",
        }
    }

    fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Bucket::Documents => &["pdf", "png", "jpg", "jpeg", "webp"],
            Bucket::Images => &["png", "jpg", "jpeg", "webp"],
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "documents" => Ok(Bucket::Documents),
            "images" => Ok(Bucket::Images),
            other => Err(AppError::with_message(
                ErrorCode::UnknownBucket,
                format!("Unknown upload bucket '{}'", other),
            )
            .with_detail("bucket", other.to_string())),
        }
    }
}

/// 上传结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredFile {
    pub bucket: Bucket,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub content_type: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    public_base_url: String,
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

impl FileStorage {
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, bucket: Bucket, filename: &str) -> String {
        format!("{}{}/{}/{}", self.public_base_url, FILES_ROUTE, bucket, filename)
    }

    /// 校验并保存文件
    pub async fn store(
        &self,
        bucket: Bucket,
        original_name: &str,
        data: &[u8],
        max_bytes: usize,
    ) -> AppResult<StoredFile> {
        if data.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyFile));
        }
        if data.len() > max_bytes {
            return Err(AppError::with_message(
                ErrorCode::FileTooLarge,
                format!("File too large. Maximum size is {} bytes", max_bytes),
            )
            .with_detail("max_bytes", max_bytes));
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::UnsupportedFileFormat,
                    format!("Invalid file extension for: {}", original_name),
                )
            })?;

        if !bucket.allowed_extensions().contains(&ext.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!(
                    "Unsupported file format '{}'. Supported: {}",
                    ext,
                    bucket.allowed_extensions().join(", ")
                ),
            ));
        }

        let content_type = mime_guess::from_ext(&ext)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        let filename = format!("{}.{}", calculate_hash(data), ext);
        let dir = self.root.join(bucket.as_str());
        let path = dir.join(&filename);

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(bucket = %bucket, filename = %filename, "Upload deduplicated");
        } else {
            tokio::fs::create_dir_all(&dir).await.map_err(storage_error)?;
            let tmp = dir.join(format!(".{}.tmp", filename));
            tokio::fs::write(&tmp, data).await.map_err(storage_error)?;
            tokio::fs::rename(&tmp, &path).await.map_err(storage_error)?;
            tracing::info!(bucket = %bucket, filename = %filename, size = data.len(), "File stored");
        }

        Ok(StoredFile {
            bucket,
            url: self.public_url(bucket, &filename),
            filename,
            original_name: original_name.to_string(),
            size: data.len(),
            content_type,
        })
    }
}

fn storage_error(err: std::io::Error) -> AppError {
    tracing::error!(error = %err, "File storage failed");
    AppError::new(ErrorCode::FileStorageFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024;

    fn storage(dir: &tempfile::TempDir) -> FileStorage {
        FileStorage::new(dir.path().to_path_buf(), "http://localhost:3000/")
    }

    #[test]
    fn test_bucket_parse() {
        assert_eq!("images".parse::<Bucket>().unwrap(), Bucket::Images);
        let err = "avatars".parse::<Bucket>().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownBucket);
    }

    #[tokio::test]
    async fn test_store_and_dedupe() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let first = storage
            .store(Bucket::Documents, "alvara.PDF", b"%PDF-1.4 test", LIMIT)
            .await
            .unwrap();
        assert!(first.filename.ends_with(".pdf"));
        assert_eq!(first.content_type, "application/pdf");
        assert_eq!(
            first.url,
            format!("http://localhost:3000/files/documents/{}", first.filename)
        );
        assert!(dir.path().join("documents").join(&first.filename).exists());

        let second = storage
            .store(Bucket::Documents, "copy.pdf", b"%PDF-1.4 test", LIMIT)
            .await
            .unwrap();
        assert_eq!(first.filename, second.filename);
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let err = storage.store(Bucket::Images, "a.png", b"", LIMIT).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);

        let big = vec![0u8; LIMIT + 1];
        let err = storage.store(Bucket::Images, "a.png", &big, LIMIT).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);

        let err = storage.store(Bucket::Images, "doc.pdf", b"x", LIMIT).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let err = storage.store(Bucket::Images, "noext", b"x", LIMIT).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
    }
}
