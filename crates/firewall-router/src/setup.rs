//! Wiring of concrete collaborators from configuration

use std::sync::Arc;

use anyhow::Context;
use firewall_core::{AlertChannel, Config};
use firewall_services::{
    AlertNotifier, DynamoAuditStore, EmailNotifier, RekognitionClassifier, SnsNotifier,
};
use firewall_storage::create_storage;

use crate::router::ModerationRouter;

/// Build a router backed by the configured storage backend, Rekognition,
/// DynamoDB and the configured alert channel.
pub async fn build_router(config: &Config) -> Result<ModerationRouter, anyhow::Error> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    let classifier = Arc::new(RekognitionClassifier::new(config.aws_region.clone()).await);

    let audit = Arc::new(
        DynamoAuditStore::new(
            config.aws_region.clone(),
            config.router.audit_store_id.clone(),
        )
        .await,
    );

    let notifier: Arc<dyn AlertNotifier> = match config.alert_channel {
        AlertChannel::Sns => Arc::new(
            SnsNotifier::new(
                config.aws_region.clone(),
                config.router.alert_topic_id.clone(),
            )
            .await,
        ),
        AlertChannel::Smtp => Arc::new(
            EmailNotifier::from_config(config).context("Failed to initialize email notifier")?,
        ),
    };

    tracing::info!(
        intake = %config.router.intake_location,
        allowed = %config.router.allowed_location,
        quarantine = %config.router.quarantine_location,
        audit_table = %config.router.audit_store_id,
        alert_channel = %config.alert_channel,
        storage_backend = %config.storage_backend,
        "Moderation router initialized"
    );

    Ok(ModerationRouter::new(
        config.router.clone(),
        storage,
        classifier,
        audit,
        notifier,
    ))
}
