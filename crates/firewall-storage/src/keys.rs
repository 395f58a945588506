//! Shared key validation for storage backends.

use crate::traits::{StorageError, StorageResult};

/// Reject empty keys. Any other key is a legal object name.
pub fn require_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    Ok(())
}

/// Reject keys that could escape a bucket root on a filesystem.
#[cfg_attr(not(feature = "storage-local"), allow(dead_code))]
pub fn validate_key(key: &str) -> StorageResult<()> {
    require_key(key)?;
    if key.starts_with('/') || key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid path segments: {}",
            key
        )));
    }
    Ok(())
}

/// Build an S3 `CopySource` value: `{bucket}/{key}` with each key segment
/// URL-encoded and the separators kept.
#[cfg_attr(not(feature = "storage-s3"), allow(dead_code))]
pub fn copy_source(bucket: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}", bucket, encoded.join("/"))
}
