use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client as SnsClient;
use firewall_core::Alert;

use super::AlertNotifier;
use crate::error::{ServiceError, ServiceResult};

/// SNS topics cap subjects at 100 characters.
const MAX_SUBJECT_LEN: usize = 100;

/// Alert notifier publishing to an SNS topic
#[derive(Clone)]
pub struct SnsNotifier {
    client: SnsClient,
    topic_arn: String,
}

impl SnsNotifier {
    pub async fn new(region: Option<String>, topic_arn: String) -> Self {
        let config = crate::aws::load_sdk_config(region).await;
        Self::from_client(SnsClient::new(&config), topic_arn)
    }

    pub fn from_client(client: SnsClient, topic_arn: String) -> Self {
        Self { client, topic_arn }
    }
}

#[async_trait]
impl AlertNotifier for SnsNotifier {
    #[tracing::instrument(skip(self, alert), fields(
        aws.service.name = "sns",
        aws.sns.operation = "Publish",
        aws.sns.topic = %self.topic_arn
    ))]
    async fn publish(&self, alert: &Alert) -> ServiceResult<()> {
        let subject: String = alert.subject.chars().take(MAX_SUBJECT_LEN).collect();

        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(&alert.body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %DisplayErrorContext(&e), "SNS publish failed");
                ServiceError::Notification(DisplayErrorContext(&e).to_string())
            })?;

        tracing::info!(
            message_id = output.message_id().unwrap_or_default(),
            "Quarantine alert published"
        );

        Ok(())
    }
}
