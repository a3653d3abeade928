/// Serving of locally stored assets
use actix_web::{web, HttpResponse};
use bytes::Bytes;
use std::io;
use tokio::io::AsyncReadExt;

use crate::config::StorageMode;
use crate::error::{AppError, Result};
use crate::services::storage::validate_key;
use crate::state::AppState;

const CHUNK_SIZE: usize = 64 * 1024;

/// GET /assets/{path}
///
/// Streams a file from the assets root. Only available when at least one
/// upload kind uses local storage.
pub async fn serve_asset(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let key = path.into_inner();
    validate_key(&key)?;

    let not_found = || AppError::AssetNotFound(key.clone());

    let local_enabled = state.thumbnail_store.mode() == StorageMode::Local
        || state.video_store.mode() == StorageMode::Local;
    if !local_enabled {
        return Err(not_found());
    }

    let full_path = state.config.storage.assets_root.join(&key);
    let file = match tokio::fs::File::open(&full_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(AppError::StorageError(format!("Couldn't open asset: {}", e))),
    };

    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&key))
        .no_chunking(metadata.len())
        .streaming(file_stream(file)))
}

fn file_stream(
    file: tokio::fs::File,
) -> impl futures::Stream<Item = std::result::Result<Bytes, io::Error>> {
    futures::stream::unfold(Some(file), |state| async move {
        let mut file = state?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        match file.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(Bytes::from(buf)), Some(file)))
            }
            Err(e) => Some((Err(e), None)),
        }
    })
}

fn content_type_for(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}
