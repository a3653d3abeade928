/// Video handlers - upload and owner read
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use crypto_core::{random_url_safe_id, OBJECT_ID_BYTES};

use super::{finish_upload, load_owned_video, parse_video_id};
use crate::error::{AppError, Result};
use crate::middleware::authenticated_user;
use crate::models::{UploadKind, Video};
use crate::services::media_tools::classify_aspect;
use crate::services::multipart::spool_field_to_tempfile;
use crate::services::AssetBody;
use crate::state::AppState;

const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// POST /api/video_upload/{video_id}
///
/// Multipart field `video`, `video/mp4` only. The upload is spooled to disk,
/// remuxed for fast start, classified by aspect ratio and stored under
/// `{aspect}/{random}.mp4`.
pub async fn upload_video(
    req: HttpRequest,
    state: web::Data<AppState>,
    video_id: web::Path<String>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let result = store_video(&req, &state, &video_id, &mut payload).await;
    finish_upload(UploadKind::Video, &video_id, &result);

    let (video, _) = result?;
    Ok(HttpResponse::Ok().json(video))
}

async fn store_video(
    req: &HttpRequest,
    state: &AppState,
    raw_video_id: &str,
    payload: &mut Multipart,
) -> Result<(Video, u64)> {
    let video_id = parse_video_id(raw_video_id)?;
    let user_id = authenticated_user(req)?;
    let mut video = load_owned_video(state, video_id, user_id).await?;

    let kind = UploadKind::Video;
    let upload = spool_field_to_tempfile(
        payload,
        kind.form_field(),
        kind.accepted_media_types(),
        state.config.limits.max_video_bytes,
        state.config.media.temp_dir.as_deref(),
    )
    .await?;

    tracing::debug!(video_id = %video_id, bytes = upload.size, "video received, remuxing");

    let processed = state.media.fast_start(upload.path()).await?;
    drop(upload);

    let aspect = classify_aspect(state.media.as_ref(), processed.path()).await;
    let key = format!(
        "{}/{}.mp4",
        aspect.as_str(),
        random_url_safe_id(OBJECT_ID_BYTES)
    );

    let size = tokio::fs::metadata(processed.path())
        .await
        .map_err(|e| AppError::MediaToolError(format!("Remuxed file unreadable: {}", e)))?
        .len();

    let url = state
        .video_store
        .put(
            &key,
            AssetBody::File(processed.path().to_path_buf()),
            VIDEO_CONTENT_TYPE,
        )
        .await?;

    video.video_url = Some(url);
    let video = state.videos.update_video(&video).await?;

    tracing::info!(
        video_id = %video_id,
        user_id = %user_id,
        key = %key,
        bytes = size,
        aspect = aspect.as_str(),
        storage = %state.video_store.mode(),
        "video stored"
    );
    Ok((video, size))
}

/// GET /api/videos/{video_id}
pub async fn get_video(
    req: HttpRequest,
    state: web::Data<AppState>,
    video_id: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_video_id(&video_id)?;
    let user_id = authenticated_user(&req)?;
    let video = load_owned_video(&state, video_id, user_id).await?;

    Ok(HttpResponse::Ok().json(video))
}
