/// Multipart form extraction for single-file uploads
///
/// The file field is located by name, its declared content type validated
/// before any data is read, and then the data is either buffered in memory
/// or spooled to a temporary file. Both paths stop reading as soon as the
/// byte ceiling is crossed.
use actix_multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::services::media_type::{validate_media_type, AcceptedMediaType};

/// File field read fully into memory
#[derive(Debug)]
pub struct InMemoryUpload {
    pub data: Bytes,
    pub media_type: AcceptedMediaType,
}

/// File field written to a temporary file, removed when dropped
#[derive(Debug)]
pub struct SpooledUpload {
    pub file: NamedTempFile,
    pub size: u64,
    pub media_type: AcceptedMediaType,
}

impl SpooledUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Read the file field `field_name` into memory
pub async fn read_field_to_memory(
    payload: &mut Multipart,
    field_name: &str,
    allowed: &[&str],
    max_bytes: u64,
) -> Result<InMemoryUpload> {
    let (mut field, media_type) = next_file_field(payload, field_name, allowed).await?;

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        ensure_within_limit(buf.len() as u64 + chunk.len() as u64, max_bytes)?;
        buf.extend_from_slice(&chunk);
    }

    Ok(InMemoryUpload {
        data: buf.freeze(),
        media_type,
    })
}

/// Stream the file field `field_name` into a temporary file.
///
/// The temp file is created in `temp_dir` (system temp dir when `None`) with
/// the extension of the declared media type.
pub async fn spool_field_to_tempfile(
    payload: &mut Multipart,
    field_name: &str,
    allowed: &[&str],
    max_bytes: u64,
    temp_dir: Option<&Path>,
) -> Result<SpooledUpload> {
    let (mut field, media_type) = next_file_field(payload, field_name, allowed).await?;

    let suffix = format!(".{}", media_type.extension);
    let mut builder = tempfile::Builder::new();
    builder.prefix("asset-upload-").suffix(&suffix);
    let file = match temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| AppError::Internal(format!("Error creating temp file: {}", e)))?;

    let mut writer = tokio::fs::File::from_std(file.reopen()?);
    let mut size: u64 = 0;
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        size += chunk.len() as u64;
        ensure_within_limit(size, max_bytes)?;
        writer.write_all(&chunk).await?;
    }
    writer.flush().await?;
    drop(writer);

    tracing::debug!(path = %file.path().display(), bytes = size, "upload spooled to disk");

    Ok(SpooledUpload {
        file,
        size,
        media_type,
    })
}

/// Advance to the field named `field_name` and validate its content type.
///
/// Fields with other names are skipped.
async fn next_file_field(
    payload: &mut Multipart,
    field_name: &str,
    allowed: &[&str],
) -> Result<(Field, AcceptedMediaType)> {
    while let Some(field) = payload.next().await {
        let field = field?;
        if field.name() != Some(field_name) {
            continue;
        }

        let media_type = validate_media_type(field.content_type(), allowed)?;
        return Ok((field, media_type));
    }

    Err(AppError::BadRequest(format!(
        "Missing '{}' form field",
        field_name
    )))
}

fn ensure_within_limit(size: u64, max_bytes: u64) -> Result<()> {
    if size > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File exceeds maximum size of {}",
            human_size(max_bytes)
        )));
    }
    Ok(())
}

fn human_size(bytes: u64) -> String {
    const KIB: u64 = 1 << 10;
    const MIB: u64 = 1 << 20;
    const GIB: u64 = 1 << 30;

    match bytes {
        b if b >= GIB && b % GIB == 0 => format!("{} GiB", b / GIB),
        b if b >= MIB && b % MIB == 0 => format!("{} MiB", b / MIB),
        b if b >= KIB && b % KIB == 0 => format!("{} KiB", b / KIB),
        b => format!("{} bytes", b),
    }
}
