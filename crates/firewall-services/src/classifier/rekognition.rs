//! AWS Rekognition image moderation client

use async_trait::async_trait;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::Image;
use aws_sdk_rekognition::Client as RekognitionClient;
use firewall_core::ModerationLabel;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use super::ContentClassifier;
use crate::error::{ServiceError, ServiceResult};

/// Classifier backed by Rekognition `DetectModerationLabels`
#[derive(Clone)]
pub struct RekognitionClassifier {
    client: RekognitionClient,
}

impl Debug for RekognitionClassifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RekognitionClassifier").finish()
    }
}

impl RekognitionClassifier {
    /// Create a Rekognition client for the given region
    pub async fn new(region: Option<String>) -> Self {
        let config = crate::aws::load_sdk_config(region).await;
        Self::from_client(RekognitionClient::new(&config))
    }

    pub fn from_client(client: RekognitionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentClassifier for RekognitionClassifier {
    #[tracing::instrument(skip(self, image), fields(
        aws.service.name = "rekognition",
        aws.rekognition.operation = "DetectModerationLabels",
        image_size = image.len(),
        min_confidence = min_confidence
    ))]
    async fn detect_moderation_labels(
        &self,
        image: &[u8],
        min_confidence: f32,
    ) -> ServiceResult<Vec<ModerationLabel>> {
        let start = std::time::Instant::now();

        let rekognition_image = Image::builder().bytes(Blob::new(image)).build();

        let response = self
            .client
            .detect_moderation_labels()
            .image(rekognition_image)
            .min_confidence(min_confidence)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Rekognition moderation request failed"
                );
                ServiceError::Classification(DisplayErrorContext(&e).to_string())
            })?;

        // Service order is preserved; callers rely on it.
        let labels: Vec<ModerationLabel> = response
            .moderation_labels()
            .iter()
            .map(|label| ModerationLabel {
                name: label.name().unwrap_or("Unknown").to_string(),
                parent_name: label
                    .parent_name()
                    .filter(|p| !p.is_empty())
                    .map(str::to_string),
                confidence: label.confidence().unwrap_or(0.0),
            })
            .collect();

        tracing::info!(
            label_count = labels.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Rekognition moderation completed"
        );

        Ok(labels)
    }
}
