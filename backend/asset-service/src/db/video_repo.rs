/// Video repository - database operations for videos
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Video;

/// Read/update access to video records
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// `Ok(None)` when no record with this id exists
    async fn get_video(&self, video_id: Uuid) -> Result<Option<Video>>;

    /// Persist the asset URLs of `video` and return the stored row
    async fn update_video(&self, video: &Video) -> Result<Video>;
}

/// Postgres-backed repository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn get_video(&self, video_id: Uuid) -> Result<Option<Video>> {
        sqlx::query_as::<_, Video>(
            "SELECT id, created_at, updated_at, thumbnail_url, video_url, \
             title, description, user_id \
             FROM videos WHERE id = $1",
        )
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn update_video(&self, video: &Video) -> Result<Video> {
        sqlx::query_as::<_, Video>(
            "UPDATE videos SET thumbnail_url = $2, video_url = $3, title = $4, \
             description = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, created_at, updated_at, thumbnail_url, video_url, \
             title, description, user_id",
        )
        .bind(video.id)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(&video.title)
        .bind(&video.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }
}
