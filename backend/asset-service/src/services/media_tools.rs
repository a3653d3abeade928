/// External media tools (ffmpeg / ffprobe)
///
/// Both tools run as child processes with a hard timeout. Children are spawned
/// with `kill_on_drop`, so a dropped request future terminates them as well.
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;

use crate::config::MediaToolsConfig;
use crate::error::{AppError, Result};
use crate::models::AspectRatio;

#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Remux `input` so the `moov` atom precedes the media data.
    ///
    /// The returned temp file lives next to `input` and is deleted on drop.
    async fn fast_start(&self, input: &Path) -> Result<NamedTempFile>;

    /// Probe `input` and return its aspect ratio as `W:H`
    async fn probe_aspect_ratio(&self, input: &Path) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct FfmpegProcessor {
    ffmpeg_path: String,
    ffprobe_path: String,
    timeout: Duration,
}

impl FfmpegProcessor {
    pub fn new(ffmpeg_path: impl Into<String>, ffprobe_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &MediaToolsConfig) -> Self {
        Self::new(&cfg.ffmpeg_path, &cfg.ffprobe_path, cfg.timeout())
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn fast_start(&self, input: &Path) -> Result<NamedTempFile> {
        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        let output = tempfile::Builder::new()
            .prefix("asset-faststart-")
            .suffix(".mp4")
            .tempfile_in(dir)
            .map_err(|e| AppError::MediaToolError(format!("Error creating temp file: {}", e)))?;

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output.path());

        let result = run_tool(cmd, "ffmpeg", self.timeout).await?;
        if !result.status.success() {
            return Err(AppError::MediaToolError(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr_tail(&result.stderr)
            )));
        }

        Ok(output)
    }

    async fn probe_aspect_ratio(&self, input: &Path) -> Result<String> {
        let mut cmd = Command::new(&self.ffprobe_path);
        cmd.args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(input);

        let result = run_tool(cmd, "ffprobe", self.timeout).await?;
        if !result.status.success() {
            return Err(AppError::MediaToolError(format!(
                "ffprobe exited with {}: {}",
                result.status,
                stderr_tail(&result.stderr)
            )));
        }

        aspect_ratio_from_probe(&result.stdout)
    }
}

/// Probe `input` and bucket the result; a failed probe counts as `Other`
pub async fn classify_aspect(media: &dyn MediaProcessor, input: &Path) -> AspectRatio {
    match media.probe_aspect_ratio(input).await {
        Ok(ratio) => AspectRatio::from_ratio(&ratio),
        Err(e) => {
            tracing::warn!(error = %e, "aspect ratio probe failed, classifying as other");
            AspectRatio::Other
        }
    }
}

async fn run_tool(mut cmd: Command, name: &str, timeout: Duration) -> Result<Output> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|e| AppError::MediaToolError(format!("{} spawn error: {}", name, e)))?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => {
            output.map_err(|e| AppError::MediaToolError(format!("{} failed: {}", name, e)))
        }
        Err(_) => Err(AppError::MediaToolError(format!(
            "{} timed out after {}s",
            name,
            timeout.as_secs_f32()
        ))),
    }
}

/// Extract `W:H` from `ffprobe -print_format json -show_streams` output.
///
/// Uses the first video stream (or the first stream if none is tagged video).
/// `display_aspect_ratio` wins when present and meaningful; otherwise the
/// coded width and height are reduced by their gcd.
pub fn aspect_ratio_from_probe(stdout: &[u8]) -> Result<String> {
    let json: Value = serde_json::from_slice(stdout)
        .map_err(|e| AppError::MediaToolError(format!("ffprobe json parse: {}", e)))?;

    let streams = json
        .get("streams")
        .and_then(|v| v.as_array())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::MediaToolError("ffprobe reported no streams".to_string()))?;

    let stream = streams
        .iter()
        .find(|s| s.get("codec_type").and_then(|v| v.as_str()) == Some("video"))
        .unwrap_or(&streams[0]);

    if let Some(dar) = stream.get("display_aspect_ratio").and_then(|v| v.as_str()) {
        if !dar.is_empty() && dar != "0:1" && dar != "N/A" {
            return Ok(dar.to_string());
        }
    }

    let width = stream.get("width").and_then(|v| v.as_u64()).unwrap_or(0);
    let height = stream.get("height").and_then(|v| v.as_u64()).unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(AppError::MediaToolError(
            "ffprobe reported no usable geometry".to_string(),
        ));
    }

    let divisor = gcd(width, height);
    Ok(format!("{}:{}", width / divisor, height / divisor))
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    let start = trimmed
        .char_indices()
        .rev()
        .nth(511)
        .map(|(i, _)| i)
        .unwrap_or(0);
    trimmed[start..].to_string()
}
