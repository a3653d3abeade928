/// Asset storage backends
///
/// Each upload kind is written through exactly one `AssetStore`, picked at
/// startup from `THUMBNAIL_STORAGE` / `VIDEO_STORAGE`. `put` returns the URL
/// that is persisted on the video record.
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, StorageMode};
use crate::error::{AppError, Result};

pub mod data_uri;
pub mod local;
pub mod s3;

pub use data_uri::DataUriAssetStore;
pub use local::LocalAssetStore;
pub use s3::S3AssetStore;

/// Asset contents handed to a store
#[derive(Debug, Clone)]
pub enum AssetBody {
    /// Already buffered in memory
    Bytes(Bytes),
    /// On disk; the caller keeps the file alive until `put` returns
    File(PathBuf),
}

impl AssetBody {
    /// Load the whole body into memory
    pub async fn into_bytes(self) -> Result<Bytes> {
        match self {
            AssetBody::Bytes(bytes) => Ok(bytes),
            AssetBody::File(path) => Ok(Bytes::from(tokio::fs::read(&path).await?)),
        }
    }
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    fn mode(&self) -> StorageMode;

    /// Store `body` under `key` and return its public URL
    async fn put(&self, key: &str, body: AssetBody, content_type: &str) -> Result<String>;
}

/// Build the store for one storage mode.
///
/// `s3` must be provided when `mode` is `S3`.
pub fn build_store(
    mode: StorageMode,
    config: &Config,
    s3: Option<&Arc<S3AssetStore>>,
) -> Result<Arc<dyn AssetStore>> {
    let store: Arc<dyn AssetStore> = match mode {
        StorageMode::Local => Arc::new(LocalAssetStore::new(
            config.storage.assets_root.clone(),
            &config.app.public_base_url,
        )),
        StorageMode::DataUri => Arc::new(DataUriAssetStore),
        StorageMode::S3 => {
            let s3 = s3.ok_or_else(|| {
                AppError::Internal("S3 storage selected but no S3 client configured".to_string())
            })?;
            s3.clone()
        }
    };
    Ok(store)
}

/// Check that `key` is a relative path of plain components.
///
/// Rejects empty keys, absolute paths, `.`/`..` and backslashes.
pub fn validate_key(key: &str) -> Result<()> {
    let invalid = || AppError::BadRequest(format!("Invalid asset key: {:?}", key));

    if key.is_empty() || key.contains('\\') || key.starts_with('/') {
        return Err(invalid());
    }

    let all_normal = Path::new(key)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !all_normal || key.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
        return Err(invalid());
    }

    Ok(())
}
