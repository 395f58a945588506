use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The object a single invocation evaluates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationEvent {
    pub source_bucket: String,
    /// Already URL-decoded
    pub object_key: String,
}

impl ModerationEvent {
    pub fn new(source_bucket: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            source_bucket: source_bucket.into(),
            object_key: object_key.into(),
        }
    }

    /// Build an event from a key exactly as it appears in an object-creation
    /// notification (form-encoded: `+` for spaces, `%XX` escapes).
    pub fn from_encoded(
        source_bucket: impl Into<String>,
        encoded_key: &str,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(source_bucket, decode_object_key(encoded_key)?))
    }
}

/// Decode an object key from a storage notification.
///
/// Notifications form-encode keys, so `+` stands for a space and must be
/// replaced before percent-decoding (a literal `+` arrives as `%2B`).
pub fn decode_object_key(raw: &str) -> Result<String, CoreError> {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced)
        .map_err(|e| CoreError::InvalidKey(format!("{}: {}", raw, e)))?;

    if decoded.is_empty() {
        return Err(CoreError::InvalidKey("object key is empty".to_string()));
    }

    Ok(decoded.into_owned())
}
