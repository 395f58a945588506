//! Content classification

#[cfg(feature = "classifier-rekognition")]
mod rekognition;

#[cfg(feature = "classifier-rekognition")]
pub use rekognition::RekognitionClassifier;

use async_trait::async_trait;
use firewall_core::ModerationLabel;

use crate::error::ServiceResult;

/// Hosted image moderation classifier
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    /// Submit raw image bytes and return every moderation label at or above
    /// `min_confidence` (0-100), in the order the service reports them.
    async fn detect_moderation_labels(
        &self,
        image: &[u8],
        min_confidence: f32,
    ) -> ServiceResult<Vec<ModerationLabel>>;
}
