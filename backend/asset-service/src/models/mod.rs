/// Data models for asset-service
///
/// - Video: the record an upload is attached to
/// - UploadKind: thumbnail vs. video endpoint parameters
/// - AspectRatio: classification of a probed video
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::media_type::{IMAGE_MEDIA_TYPES, VIDEO_MEDIA_TYPES};

// ========================================
// Video Models
// ========================================

/// Video database entity, also the JSON body returned by the upload endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

// ========================================
// Upload Models
// ========================================

/// Which asset an upload carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Thumbnail,
    Video,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Video => "video",
        }
    }

    /// Multipart form field the file is expected under
    pub fn form_field(&self) -> &'static str {
        self.as_str()
    }

    pub fn accepted_media_types(&self) -> &'static [&'static str] {
        match self {
            Self::Thumbnail => IMAGE_MEDIA_TYPES,
            Self::Video => VIDEO_MEDIA_TYPES,
        }
    }
}

// ========================================
// Aspect Ratio
// ========================================

/// Orientation bucket of a video, used as the storage key prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Landscape,
    Portrait,
    Other,
}

impl AspectRatio {
    /// Classify a `W:H` ratio string. Only exact `16:9` and `9:16` match.
    pub fn from_ratio(ratio: &str) -> Self {
        match ratio {
            "16:9" => Self::Landscape,
            "9:16" => Self::Portrait,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Other => "other",
        }
    }
}
