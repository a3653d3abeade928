//! Shared error response body and error codes for HTTP services.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Canonical status text ("Bad Request", "Not Found", ...)
    pub error: String,
    /// Human readable detail
    pub message: String,
    pub status: u16,
    #[serde(rename = "type")]
    pub error_type: String,
    /// Stable machine readable code, see [`error_codes`]
    pub code: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str, status: u16, error_type: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status,
            error_type: error_type.to_string(),
            code: code.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

pub mod error_codes {
    // Request validation
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const UNSUPPORTED_MEDIA_TYPE: &str = "UNSUPPORTED_MEDIA_TYPE";
    pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";

    // Auth
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const NOT_VIDEO_OWNER: &str = "NOT_VIDEO_OWNER";

    // Lookup
    pub const VIDEO_NOT_FOUND: &str = "VIDEO_NOT_FOUND";
    pub const ASSET_NOT_FOUND: &str = "ASSET_NOT_FOUND";

    // Server side
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const MEDIA_PROCESSING_ERROR: &str = "MEDIA_PROCESSING_ERROR";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
}
