/// S3 asset store
///
/// Works against AWS S3 or any S3-compatible endpoint (MinIO). With a custom
/// endpoint the client uses path-style addressing and object URLs take the
/// form `{endpoint}/{bucket}/{key}`.
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{validate_key, AssetBody, AssetStore};
use crate::config::{S3Config, StorageMode};
use crate::error::{AppError, Result};

/// Cache-Control for uploaded objects (keys are random, content never changes)
const OBJECT_CACHE_CONTROL: &str = "max-age=31536000";

#[derive(Clone)]
pub struct S3AssetStore {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
}

impl S3AssetStore {
    pub fn new(client: Client, config: &S3Config) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    /// Build a client from config and wrap it
    pub async fn connect(config: &S3Config) -> Self {
        let client = get_s3_client(config).await;
        Self::new(client, config)
    }

    /// Public URL of an object in this bucket
    pub fn object_url(&self, key: &str) -> String {
        object_url(&self.bucket, &self.region, self.endpoint.as_deref(), key)
    }

    /// Verify credentials and bucket access with a one-key listing
    pub async fn health_check(&self) -> Result<()> {
        match self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(1)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!(
                    bucket = %self.bucket,
                    region = %self.region,
                    "S3 connection validated"
                );
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                let guidance = if error_msg.contains("InvalidAccessKeyId") {
                    "Invalid AWS Access Key ID. Check AWS_ACCESS_KEY_ID."
                } else if error_msg.contains("SignatureDoesNotMatch") {
                    "Invalid AWS Secret Access Key. Check AWS_SECRET_ACCESS_KEY."
                } else if error_msg.contains("NoSuchBucket") {
                    "Bucket does not exist. Check S3_BUCKET."
                } else if error_msg.contains("AccessDenied") {
                    "Access denied to S3 bucket."
                } else {
                    "Ensure the bucket is reachable and credentials are valid."
                };

                Err(AppError::StorageError(format!(
                    "S3 health check failed for bucket {}: {}. {}",
                    self.bucket, error_msg, guidance
                )))
            }
        }
    }
}

#[async_trait]
impl AssetStore for S3AssetStore {
    fn mode(&self) -> StorageMode {
        StorageMode::S3
    }

    async fn put(&self, key: &str, body: AssetBody, content_type: &str) -> Result<String> {
        validate_key(key)?;

        let stream = match body {
            AssetBody::Bytes(bytes) => ByteStream::from(bytes),
            AssetBody::File(path) => ByteStream::from_path(&path).await.map_err(|e| {
                AppError::StorageError(format!("Failed to read file {}: {}", path.display(), e))
            })?,
        };

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(stream)
            .content_type(content_type)
            .cache_control(OBJECT_CACHE_CONTROL)
            .send()
            .await
            .map_err(|e| {
                let error_msg = e.to_string();
                if error_msg.contains("403") || error_msg.contains("Forbidden") {
                    AppError::StorageError(
                        "S3 auth failed (403): Check AWS credentials".to_string(),
                    )
                } else if error_msg.contains("NoSuchBucket") {
                    AppError::StorageError(format!("S3 bucket not found: {}", self.bucket))
                } else {
                    AppError::StorageError(format!("S3 upload failed: {}", e))
                }
            })?;

        tracing::debug!(bucket = %self.bucket, key = %key, "object uploaded to S3");

        Ok(self.object_url(key))
    }
}

/// Initialize an S3 client from config.
///
/// Explicit credentials are used when both keys are set; otherwise the default
/// AWS credential chain applies.
pub async fn get_s3_client(config: &S3Config) -> Client {
    use aws_sdk_s3::config::Region;

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    if let (Some(access_key_id), Some(secret_access_key)) =
        (&config.access_key_id, &config.secret_access_key)
    {
        use aws_sdk_s3::config::Credentials;

        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "asset_service_s3",
        );
        loader = loader.credentials_provider(credentials);
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.endpoint.is_some())
        .build();

    Client::from_conf(s3_config)
}

fn object_url(bucket: &str, region: &str, endpoint: Option<&str>, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}
