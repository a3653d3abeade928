use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{AssetBody, AssetStore};
use crate::config::StorageMode;
use crate::error::Result;

/// Inlines the asset into the URL itself; the key is ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriAssetStore;

#[async_trait]
impl AssetStore for DataUriAssetStore {
    fn mode(&self) -> StorageMode {
        StorageMode::DataUri
    }

    async fn put(&self, _key: &str, body: AssetBody, content_type: &str) -> Result<String> {
        let bytes = body.into_bytes().await?;
        Ok(format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes)))
    }
}
