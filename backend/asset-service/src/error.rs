/// Error types for Asset Service
///
/// This module defines all error types that can occur in the asset-service.
/// Errors are converted to JSON HTTP responses for API clients.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use crypto_core::jwt::JwtError;
use error_types::{error_codes, ErrorResponse};

/// Result type for asset-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed path parameter, body or form field
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Declared content type is missing or not accepted by the endpoint
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not the owner of the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Video record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// No stored file under the requested asset path
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Upload exceeded its byte ceiling
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Asset storage backend failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// ffmpeg / ffprobe failed or timed out
    #[error("Media processing error: {0}")]
    MediaToolError(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn kind(&self) -> (&'static str, &'static str) {
        match self {
            AppError::BadRequest(_) => ("validation_error", error_codes::INVALID_REQUEST),
            AppError::UnsupportedMediaType(_) => {
                ("validation_error", error_codes::UNSUPPORTED_MEDIA_TYPE)
            }
            AppError::Unauthorized(_) => {
                ("authentication_error", error_codes::INVALID_CREDENTIALS)
            }
            AppError::Forbidden(_) => ("authorization_error", error_codes::NOT_VIDEO_OWNER),
            AppError::NotFound(_) => ("not_found_error", error_codes::VIDEO_NOT_FOUND),
            AppError::AssetNotFound(_) => ("not_found_error", error_codes::ASSET_NOT_FOUND),
            AppError::PayloadTooLarge(_) => ("validation_error", error_codes::PAYLOAD_TOO_LARGE),
            AppError::DatabaseError(_) => ("server_error", error_codes::DATABASE_ERROR),
            AppError::StorageError(_) => ("server_error", error_codes::STORAGE_ERROR),
            AppError::MediaToolError(_) => ("server_error", error_codes::MEDIA_PROCESSING_ERROR),
            AppError::Internal(_) => ("server_error", error_codes::INTERNAL_SERVER_ERROR),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::UnsupportedMediaType(_) => StatusCode::BAD_REQUEST,
            // Ownership failures are reported as 401 to match the public API contract
            AppError::Unauthorized(_) | AppError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) | AppError::AssetNotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::DatabaseError(_)
            | AppError::StorageError(_)
            | AppError::MediaToolError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let (error_type, code) = self.kind();

        let message = self.to_string();
        let response = ErrorResponse::new(
            status.canonical_reason().unwrap_or("Error"),
            &message,
            status.as_u16(),
            error_type,
            code,
        );

        HttpResponse::build(status).json(response)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::MissingAuthorization | JwtError::InvalidScheme => {
                AppError::Unauthorized("Couldn't find JWT".to_string())
            }
            JwtError::EmptySecret | JwtError::Encode(_) => AppError::Internal(err.to_string()),
            _ => AppError::Unauthorized("Couldn't validate JWT".to_string()),
        }
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed multipart body: {}", err))
    }
}
