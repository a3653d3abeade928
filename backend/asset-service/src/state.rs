/// Shared application state
///
/// Built once in `main` (or by tests with in-memory collaborators) and
/// handed to actix as `web::Data<AppState>`.
use crypto_core::jwt::JwtValidator;
use std::sync::Arc;

use crate::config::Config;
use crate::db::VideoRepository;
use crate::services::{AssetStore, MediaProcessor};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub videos: Arc<dyn VideoRepository>,
    pub thumbnail_store: Arc<dyn AssetStore>,
    pub video_store: Arc<dyn AssetStore>,
    pub media: Arc<dyn MediaProcessor>,
    pub jwt: Arc<JwtValidator>,
}
