/// Thumbnail upload handler
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use crypto_core::{random_url_safe_id, OBJECT_ID_BYTES};

use super::{finish_upload, load_owned_video, parse_video_id};
use crate::error::Result;
use crate::middleware::authenticated_user;
use crate::models::{UploadKind, Video};
use crate::services::multipart::read_field_to_memory;
use crate::services::AssetBody;
use crate::state::AppState;

/// POST /api/thumbnail_upload/{video_id}
///
/// Multipart field `thumbnail`, `image/jpeg` or `image/png`.
pub async fn upload_thumbnail(
    req: HttpRequest,
    state: web::Data<AppState>,
    video_id: web::Path<String>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let result = store_thumbnail(&req, &state, &video_id, &mut payload).await;
    finish_upload(UploadKind::Thumbnail, &video_id, &result);

    let (video, _) = result?;
    Ok(HttpResponse::Ok().json(video))
}

async fn store_thumbnail(
    req: &HttpRequest,
    state: &AppState,
    raw_video_id: &str,
    payload: &mut Multipart,
) -> Result<(Video, u64)> {
    let video_id = parse_video_id(raw_video_id)?;
    let user_id = authenticated_user(req)?;
    let mut video = load_owned_video(state, video_id, user_id).await?;

    let kind = UploadKind::Thumbnail;
    let upload = read_field_to_memory(
        payload,
        kind.form_field(),
        kind.accepted_media_types(),
        state.config.limits.max_thumbnail_bytes,
    )
    .await?;

    let size = upload.data.len() as u64;
    let key = format!(
        "{}.{}",
        random_url_safe_id(OBJECT_ID_BYTES),
        upload.media_type.extension
    );

    let url = state
        .thumbnail_store
        .put(&key, AssetBody::Bytes(upload.data), &upload.media_type.essence)
        .await?;

    video.thumbnail_url = Some(url);
    let video = state.videos.update_video(&video).await?;

    tracing::info!(
        video_id = %video_id,
        user_id = %user_id,
        key = %key,
        bytes = size,
        storage = %state.thumbnail_store.mode(),
        "thumbnail stored"
    );
    Ok((video, size))
}
