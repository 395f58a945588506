use crate::keys::{copy_source, require_key};
use crate::traits::{ObjectStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::Client;

const FALLBACK_REGION: &str = "us-east-1";

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `region` - AWS region; falls back to the default provider chain, then `us-east-1`
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO, "http://localhost:4566" for LocalStack)
    pub async fn new(region: Option<String>, endpoint_url: Option<String>) -> StorageResult<Self> {
        let region_provider = RegionProviderChain::first_try(region.map(Region::new))
            .or_default_provider()
            .or_else(Region::new(FALLBACK_REGION));

        // Redelivery belongs to the trigger, so the SDK must not retry on its own.
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        let client = if let Some(ref endpoint) = endpoint_url {
            // S3-compatible providers generally need path-style addressing
            let s3_config = aws_sdk_s3::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .force_path_style(true)
                .build();
            Client::from_conf(s3_config)
        } else {
            Client::new(&config)
        };

        Ok(S3Storage {
            client,
            endpoint_url,
        })
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client) -> Self {
        S3Storage {
            client,
            endpoint_url: None,
        }
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    #[tracing::instrument(skip(self), fields(
        aws.service.name = "s3",
        aws.s3.operation = "HeadObject",
        s3.bucket = %bucket,
        s3.key = %key
    ))]
    async fn content_length(&self, bucket: &str, key: &str) -> StorageResult<u64> {
        require_key(key)?;
        let start = std::time::Instant::now();

        let result = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        let output = result.map_err(|e| {
            if matches!(&e, SdkError::ServiceError(se) if se.err().is_not_found()) {
                return StorageError::not_found(bucket, key);
            }
            tracing::error!(
                error = %DisplayErrorContext(&e),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 head object failed"
            );
            StorageError::BackendError(DisplayErrorContext(&e).to_string())
        })?;

        let size = output.content_length().unwrap_or(0).max(0) as u64;

        tracing::debug!(
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 head object successful"
        );

        Ok(size)
    }

    #[tracing::instrument(skip(self), fields(
        aws.service.name = "s3",
        aws.s3.operation = "GetObject",
        s3.bucket = %bucket,
        s3.key = %key
    ))]
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        require_key(key)?;
        let start = std::time::Instant::now();

        let result = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        let output = result.map_err(|e| {
            if matches!(&e, SdkError::ServiceError(se) if se.err().is_no_such_key()) {
                return StorageError::not_found(bucket, key);
            }
            tracing::error!(
                error = %DisplayErrorContext(&e),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 download failed"
            );
            StorageError::DownloadFailed(DisplayErrorContext(&e).to_string())
        })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes();

        tracing::info!(
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes.to_vec())
    }

    #[tracing::instrument(skip(self), fields(
        aws.service.name = "s3",
        aws.s3.operation = "CopyObject",
        s3.from_bucket = %from_bucket,
        s3.to_bucket = %to_bucket,
        s3.key = %key
    ))]
    async fn copy(&self, from_bucket: &str, to_bucket: &str, key: &str) -> StorageResult<()> {
        require_key(key)?;
        let start = std::time::Instant::now();

        let result = self
            .client
            .copy_object()
            .copy_source(copy_source(from_bucket, key))
            .bucket(to_bucket)
            .key(key)
            .send()
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %DisplayErrorContext(&e),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 copy failed"
            );
            StorageError::CopyFailed(DisplayErrorContext(&e).to_string())
        })?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 copy successful"
        );

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(
        aws.service.name = "s3",
        aws.s3.operation = "DeleteObject",
        s3.bucket = %bucket,
        s3.key = %key
    ))]
    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        require_key(key)?;
        let start = std::time::Instant::now();

        let result = self
            .client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %DisplayErrorContext(&e),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(DisplayErrorContext(&e).to_string())
        })?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        match self.content_length(bucket, key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{Credentials, Region as S3Region};

    /// Client pointed at a closed local port, so every call fails in transport.
    fn unreachable_storage() -> S3Storage {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(S3Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .force_path_style(true)
            .retry_config(aws_sdk_s3::config::retry::RetryConfig::disabled())
            .build();
        S3Storage::from_client(Client::from_conf(config))
    }

    #[tokio::test]
    async fn keys_that_look_like_paths_reach_the_service() {
        let storage = unreachable_storage();

        for key in ["/leading-slash.jpg", "a/../b.jpg", ".."] {
            let err = storage
                .content_length("image-firewall-upload", key)
                .await
                .unwrap_err();
            assert!(
                matches!(err, StorageError::BackendError(_)),
                "key {:?} was rejected locally: {:?}",
                key,
                err
            );
        }
    }

    #[tokio::test]
    async fn empty_key_is_rejected_before_any_request() {
        let storage = unreachable_storage();

        let err = storage
            .delete("image-firewall-upload", "")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
