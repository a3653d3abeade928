/// Database access layer
///
/// Video records are created and listed by other parts of the platform;
/// this service only reads a record and writes asset URLs back to it.
pub mod video_repo;

pub use video_repo::{PgVideoRepository, VideoRepository};
