/// HTTP handlers for asset-service
///
/// - thumbnails: thumbnail image upload
/// - videos: video upload and owner read
/// - assets: serving locally stored assets
use actix_web::ResponseError;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::metrics::{record_upload, UploadOutcome};
use crate::models::{UploadKind, Video};
use crate::state::AppState;

pub mod assets;
pub mod thumbnails;
pub mod videos;

pub use assets::serve_asset;
pub use thumbnails::upload_thumbnail;
pub use videos::{get_video, upload_video};

pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid video ID".to_string()))
}

/// Fetch `video_id` and check that `user_id` owns it
pub(crate) async fn load_owned_video(
    state: &AppState,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Video> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        tracing::warn!(
            video_id = %video_id,
            user_id = %user_id,
            owner_id = %video.user_id,
            "video accessed by non-owner"
        );
        return Err(AppError::Forbidden("Video belongs to another user".to_string()));
    }

    Ok(video)
}

/// Count an upload attempt and log server-side failures
pub(crate) fn finish_upload(
    kind: UploadKind,
    video_id: &str,
    result: &Result<(Video, u64)>,
) {
    match result {
        Ok((_, bytes)) => record_upload(kind, UploadOutcome::Success, Some(*bytes)),
        Err(e) if e.status_code().is_server_error() => {
            tracing::error!(kind = kind.as_str(), video_id = %video_id, error = %e, "upload failed");
            record_upload(kind, UploadOutcome::Failed, None);
        }
        Err(e) => {
            tracing::debug!(kind = kind.as_str(), video_id = %video_id, error = %e, "upload rejected");
            record_upload(kind, UploadOutcome::Rejected, None);
        }
    }
}
