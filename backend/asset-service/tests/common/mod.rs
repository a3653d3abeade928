//! Shared fixtures for the handler integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use uuid::Uuid;

use asset_service::config::StorageMode;
use asset_service::db::VideoRepository;
use asset_service::error::{AppError, Result};
use asset_service::models::Video;
use asset_service::services::storage::{DataUriAssetStore, LocalAssetStore};
use asset_service::services::{AssetBody, AssetStore, MediaProcessor};
use asset_service::{AppState, Config};
use crypto_core::jwt::{self, JwtValidator};

/// Initialize the real route table around a `TestContext`
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(|cfg| asset_service::routes::configure(cfg, &$ctx.state)),
        )
        .await
    };
}

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PUBLIC_BASE_URL: &str = "http://assets.test";
pub const BOUNDARY: &str = "----asset-service-test-boundary";

/// Prefix the stub remuxer writes in front of the original bytes
pub const FASTSTART_MARKER: &[u8] = b"FASTSTART:";

// ============================================================================
// Video repository
// ============================================================================

/// Backing map plus switches that make reads or writes fail like a lost pool
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_get: AtomicBool,
    fail_update: AtomicBool,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn failing_get(&self) {
        self.fail_get.store(true, Ordering::SeqCst);
    }

    pub fn failing_update(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }
}

fn connection_lost() -> AppError {
    AppError::DatabaseError("pool timed out while waiting for an open connection".to_string())
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, video_id: Uuid) -> Result<Option<Video>> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(connection_lost());
        }
        Ok(self.get(video_id))
    }

    async fn update_video(&self, video: &Video) -> Result<Video> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(connection_lost());
        }

        let mut videos = self.videos.lock().unwrap();
        let stored = videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        let mut updated = video.clone();
        updated.updated_at = Utc::now();
        *stored = updated.clone();
        Ok(updated)
    }
}

pub fn new_video(owner: Uuid) -> Video {
    let now = Utc::now();
    Video {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        thumbnail_url: None,
        video_url: None,
        title: "Boots".to_string(),
        description: "A video about boots".to_string(),
        user_id: owner,
    }
}

// ============================================================================
// Asset store
// ============================================================================

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub data: Bytes,
    pub content_type: String,
}

/// Records every `put`; URLs look like a real bucket
pub struct RecordingAssetStore {
    objects: Mutex<Vec<StoredObject>>,
    fail: bool,
}

impl RecordingAssetStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for RecordingAssetStore {
    fn mode(&self) -> StorageMode {
        StorageMode::S3
    }

    async fn put(&self, key: &str, body: AssetBody, content_type: &str) -> Result<String> {
        if self.fail {
            return Err(AppError::StorageError("S3 upload failed: simulated".to_string()));
        }

        let data = body.into_bytes().await?;
        self.objects.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            data,
            content_type: content_type.to_string(),
        });
        Ok(format!(
            "https://tubely-test.s3.us-east-1.amazonaws.com/{}",
            key
        ))
    }
}

// ============================================================================
// Media processor
// ============================================================================

/// Fake ffmpeg/ffprobe: remux prefixes a marker, probe returns a fixed ratio
pub struct StubMediaProcessor {
    ratio: Option<String>,
    fail_remux: bool,
    probed: Mutex<Vec<PathBuf>>,
}

impl StubMediaProcessor {
    pub fn with_ratio(ratio: &str) -> Self {
        Self {
            ratio: Some(ratio.to_string()),
            fail_remux: false,
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_probe() -> Self {
        Self {
            ratio: None,
            fail_remux: false,
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_remux() -> Self {
        Self {
            ratio: Some("16:9".to_string()),
            fail_remux: true,
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProcessor for StubMediaProcessor {
    async fn fast_start(&self, input: &Path) -> Result<NamedTempFile> {
        if self.fail_remux {
            return Err(AppError::MediaToolError(
                "ffmpeg exited with exit status: 1".to_string(),
            ));
        }

        let original = tokio::fs::read(input).await?;
        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        let output = tempfile::Builder::new()
            .suffix(".mp4")
            .tempfile_in(dir)?;

        let mut remuxed = FASTSTART_MARKER.to_vec();
        remuxed.extend_from_slice(&original);
        tokio::fs::write(output.path(), remuxed).await?;
        Ok(output)
    }

    async fn probe_aspect_ratio(&self, input: &Path) -> Result<String> {
        self.probed.lock().unwrap().push(input.to_path_buf());
        self.ratio
            .clone()
            .ok_or_else(|| AppError::MediaToolError("ffprobe timed out after 300s".to_string()))
    }
}

// ============================================================================
// Application state
// ============================================================================

pub struct TestContext {
    pub state: AppState,
    pub repo: Arc<InMemoryVideoRepository>,
    pub media: Arc<StubMediaProcessor>,
    pub owner: Uuid,
    pub video: Video,
    // Keeps the local assets root alive for the duration of the test
    pub assets_dir: tempfile::TempDir,
}

impl TestContext {
    pub fn token(&self) -> String {
        token_for(self.owner)
    }

    pub fn stored_video(&self) -> Video {
        self.repo.get(self.video.id).unwrap()
    }
}

pub struct TestContextBuilder {
    env: HashMap<String, String>,
    thumbnail_store: Option<Arc<dyn AssetStore>>,
    video_store: Option<Arc<dyn AssetStore>>,
    media: Arc<StubMediaProcessor>,
}

impl TestContextBuilder {
    pub fn new() -> Self {
        let env = [
            ("JWT_SECRET", JWT_SECRET),
            ("PUBLIC_BASE_URL", PUBLIC_BASE_URL),
            ("THUMBNAIL_STORAGE", "local"),
            ("VIDEO_STORAGE", "s3"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            env,
            thumbnail_store: None,
            video_store: None,
            media: Arc::new(StubMediaProcessor::with_ratio("16:9")),
        }
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn thumbnail_store(mut self, store: Arc<dyn AssetStore>) -> Self {
        self.thumbnail_store = Some(store);
        self
    }

    pub fn video_store(mut self, store: Arc<dyn AssetStore>) -> Self {
        self.video_store = Some(store);
        self
    }

    pub fn media(mut self, media: StubMediaProcessor) -> Self {
        self.media = Arc::new(media);
        self
    }

    pub fn build(mut self) -> TestContext {
        let assets_dir = tempfile::tempdir().unwrap();
        self.env.insert(
            "ASSETS_ROOT".to_string(),
            assets_dir.path().to_string_lossy().into_owned(),
        );
        let config = Config::from_lookup(|key| self.env.get(key).cloned()).unwrap();

        let default_store = |mode: StorageMode| -> Arc<dyn AssetStore> {
            match mode {
                StorageMode::Local => Arc::new(LocalAssetStore::new(
                    config.storage.assets_root.clone(),
                    &config.app.public_base_url,
                )),
                StorageMode::DataUri => Arc::new(DataUriAssetStore),
                StorageMode::S3 => Arc::new(RecordingAssetStore::new()),
            }
        };
        let thumbnail_store = self
            .thumbnail_store
            .unwrap_or_else(|| default_store(config.storage.thumbnails));
        let video_store = self
            .video_store
            .unwrap_or_else(|| default_store(config.storage.videos));

        let owner = Uuid::new_v4();
        let video = new_video(owner);
        let repo = Arc::new(InMemoryVideoRepository::default());
        repo.insert(video.clone());

        let jwt = JwtValidator::new(&config.auth.jwt_secret, &config.auth.jwt_issuer).unwrap();

        let state = AppState {
            config: Arc::new(config),
            videos: repo.clone(),
            thumbnail_store,
            video_store,
            media: self.media.clone(),
            jwt: Arc::new(jwt),
        };

        TestContext {
            state,
            repo,
            media: self.media,
            owner,
            video,
            assets_dir,
        }
    }
}

pub fn token_for(user_id: Uuid) -> String {
    jwt::make_token(
        user_id,
        JWT_SECRET,
        jwt::DEFAULT_ISSUER,
        chrono::Duration::hours(1),
    )
    .unwrap()
}

// ============================================================================
// Multipart bodies
// ============================================================================

/// Value for the request `Content-Type` header
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Single-file `multipart/form-data` body.
///
/// `content_type: None` omits the part's Content-Type header.
pub fn multipart_body(
    field: &str,
    filename: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Minimal PNG signature followed by filler bytes
pub fn fake_png(len: usize) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.resize(len.max(8), 0xAB);
    data
}

pub fn fake_mp4(len: usize) -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.resize(len.max(12), 0x42);
    data
}
