/// Configuration management for asset-service
///
/// Loads configuration from environment variables with sensible defaults.
/// A variable that is set but unparseable is an error.
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default thumbnail ceiling (10 MiB)
pub const DEFAULT_MAX_THUMBNAIL_BYTES: u64 = 10 << 20;

/// Default video ceiling (1 GiB)
pub const DEFAULT_MAX_VIDEO_BYTES: u64 = 1 << 30;

const DEFAULT_PORT: u16 = 8091;
const DEFAULT_MEDIA_TOOL_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },

    #[error("storage mode '{0}' cannot be used for videos")]
    UnsupportedVideoStorage(StorageMode),
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub s3: S3Config,
    pub limits: UploadLimits,
    pub media: MediaToolsConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
    /// Base for URLs of locally stored assets, without trailing slash
    pub public_base_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .finish()
    }
}

/// Where uploaded assets end up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Files under `ASSETS_ROOT`, served back from `/assets`
    Local,
    /// Base64 `data:` URI stored inline on the video record
    DataUri,
    /// S3 (or S3-compatible) bucket
    S3,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::DataUri => "data_uri",
            Self::S3 => "s3",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "data_uri" | "datauri" | "inline" => Ok(Self::DataUri),
            "s3" => Ok(Self::S3),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    pub assets_root: PathBuf,
    pub thumbnails: StorageMode,
    pub videos: StorageMode,
}

#[derive(Clone, Debug, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadLimits {
    pub max_thumbnail_bytes: u64,
    pub max_video_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_thumbnail_bytes: DEFAULT_MAX_THUMBNAIL_BYTES,
            max_video_bytes: DEFAULT_MAX_VIDEO_BYTES,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MediaToolsConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub timeout_secs: u64,
    /// Directory for spooled uploads; system temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

impl MediaToolsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port: u16 = parse_var(&lookup, "ASSET_SERVICE_PORT", DEFAULT_PORT)?;
        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let videos: StorageMode = parse_var(&lookup, "VIDEO_STORAGE", StorageMode::S3)?;
        if videos == StorageMode::DataUri {
            return Err(ConfigError::UnsupportedVideoStorage(videos));
        }

        Ok(Config {
            app: AppConfig {
                host: var("ASSET_SERVICE_HOST", "0.0.0.0"),
                port,
                env: var("APP_ENV", "development"),
                public_base_url,
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL", "postgresql://localhost/tubely"),
                max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_issuer: var("JWT_ISSUER", crypto_core::jwt::DEFAULT_ISSUER),
            },
            storage: StorageConfig {
                assets_root: PathBuf::from(var("ASSETS_ROOT", "./assets")),
                thumbnails: parse_var(&lookup, "THUMBNAIL_STORAGE", StorageMode::Local)?,
                videos,
            },
            s3: S3Config {
                bucket: var("S3_BUCKET", "tubely-videos"),
                region: var("AWS_REGION", "us-east-1"),
                access_key_id: lookup("AWS_ACCESS_KEY_ID"),
                secret_access_key: lookup("AWS_SECRET_ACCESS_KEY"),
                endpoint: lookup("S3_ENDPOINT").map(|e| e.trim_end_matches('/').to_string()),
            },
            limits: UploadLimits {
                max_thumbnail_bytes: parse_var(
                    &lookup,
                    "MAX_THUMBNAIL_BYTES",
                    DEFAULT_MAX_THUMBNAIL_BYTES,
                )?,
                max_video_bytes: parse_var(&lookup, "MAX_VIDEO_BYTES", DEFAULT_MAX_VIDEO_BYTES)?,
            },
            media: MediaToolsConfig {
                ffmpeg_path: var("FFMPEG_PATH", "ffmpeg"),
                ffprobe_path: var("FFPROBE_PATH", "ffprobe"),
                timeout_secs: parse_var(
                    &lookup,
                    "MEDIA_TOOL_TIMEOUT_SECS",
                    DEFAULT_MEDIA_TOOL_TIMEOUT_SECS,
                )?,
                temp_dir: lookup("UPLOAD_TEMP_DIR").map(PathBuf::from),
            },
        })
    }

    /// True when any asset kind is written to the local assets root
    pub fn uses_local_storage(&self) -> bool {
        self.storage.thumbnails == StorageMode::Local || self.storage.videos == StorageMode::Local
    }

    /// True when any asset kind goes to the bucket
    pub fn uses_s3(&self) -> bool {
        self.storage.thumbnails == StorageMode::S3 || self.storage.videos == StorageMode::S3
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> std::result::Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key,
            value: raw,
        }),
        None => Ok(default),
    }
}
