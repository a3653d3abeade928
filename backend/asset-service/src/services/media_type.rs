/// Content-type validation for uploaded files
use mime::Mime;

use crate::error::{AppError, Result};

pub const IMAGE_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png"];
pub const VIDEO_MEDIA_TYPES: &[&str] = &["video/mp4"];

/// A declared content type that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedMediaType {
    /// `type/subtype` without parameters, e.g. `image/png`
    pub essence: String,
    /// File extension derived from the subtype, e.g. `png`
    pub extension: String,
}

/// Validate an already parsed content type against `allowed`.
///
/// Parameters such as `charset` are ignored; matching is on the essence only.
pub fn validate_media_type(declared: Option<&Mime>, allowed: &[&str]) -> Result<AcceptedMediaType> {
    let mime = declared.ok_or_else(|| {
        AppError::UnsupportedMediaType("Content-Type header not provided".to_string())
    })?;

    let essence = mime.essence_str().to_ascii_lowercase();
    if !allowed.contains(&essence.as_str()) {
        return Err(AppError::UnsupportedMediaType(format!(
            "Illegal Content-Type '{}', expected one of: {}",
            essence,
            allowed.join(", ")
        )));
    }

    Ok(AcceptedMediaType {
        extension: mime.subtype().as_str().to_ascii_lowercase(),
        essence,
    })
}
