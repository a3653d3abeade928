/// Local filesystem asset store
///
/// Assets are written below `assets_root` and served back by the
/// `/assets/{path}` route, so the returned URL is
/// `{public_base_url}/assets/{key}`.
use async_trait::async_trait;
use std::path::PathBuf;

use super::{validate_key, AssetBody, AssetStore};
use crate::config::StorageMode;
use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetStore {
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create the assets root if it does not exist yet
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::StorageError(format!(
                "Couldn't create assets directory {}: {}",
                self.root.display(),
                e
            ))
        })
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/assets/{}", self.public_base_url, key)
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    fn mode(&self) -> StorageMode {
        StorageMode::Local
    }

    async fn put(&self, key: &str, body: AssetBody, _content_type: &str) -> Result<String> {
        validate_key(key)?;

        let dest = self.root.join(key);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::StorageError(format!("Couldn't create directory: {}", e)))?;
        }

        let written = match body {
            AssetBody::Bytes(bytes) => {
                tokio::fs::write(&dest, &bytes).await.map(|_| bytes.len() as u64)
            }
            AssetBody::File(src) => tokio::fs::copy(&src, &dest).await,
        }
        .map_err(|e| AppError::StorageError(format!("Couldn't write asset {}: {}", key, e)))?;

        tracing::debug!(key = %key, bytes = written, "asset written to local storage");

        Ok(self.url_for(key))
    }
}
