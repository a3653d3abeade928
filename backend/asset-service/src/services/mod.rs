/// Service layer for asset uploads
///
/// - media_type: accepted content types per endpoint
/// - multipart: reading one file field with a byte ceiling
/// - storage: local / data URI / S3 asset stores
/// - media_tools: ffmpeg fast-start remux and ffprobe aspect probing
pub mod media_tools;
pub mod media_type;
pub mod multipart;
pub mod storage;

pub use media_tools::{FfmpegProcessor, MediaProcessor};
pub use storage::{AssetBody, AssetStore};
