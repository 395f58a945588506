//! Moderation router
//!
//! Evaluates one uploaded object per call: size gate, content classification,
//! relocation to the allowed or quarantine bucket, audit record, and an alert
//! for quarantined objects. Every step is awaited before the next; nothing is
//! retried or rolled back here, failures go back to the trigger.

use std::sync::Arc;

use firewall_core::policy::{evaluate_labels, evaluate_size};
use firewall_core::{Alert, AuditRecord, Decision, ModerationEvent, PolicyDecision, RouterConfig};
use firewall_services::{AlertNotifier, AuditStore, ContentClassifier};
use firewall_storage::ObjectStorage;

use crate::error::RouterError;

/// Result of a successful invocation
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The event came from a bucket other than intake; nothing was touched.
    Ignored,
    /// The object was evaluated, relocated and audited.
    Routed(PolicyDecision),
}

impl RouteOutcome {
    pub fn decision(&self) -> Option<&PolicyDecision> {
        match self {
            RouteOutcome::Ignored => None,
            RouteOutcome::Routed(decision) => Some(decision),
        }
    }
}

/// Routes uploaded images to the allowed or quarantine bucket.
///
/// Holds only immutable configuration and shared collaborator handles, so a
/// single instance can serve concurrent invocations.
#[derive(Clone)]
pub struct ModerationRouter {
    config: RouterConfig,
    storage: Arc<dyn ObjectStorage>,
    classifier: Arc<dyn ContentClassifier>,
    audit: Arc<dyn AuditStore>,
    notifier: Arc<dyn AlertNotifier>,
}

impl ModerationRouter {
    pub fn new(
        config: RouterConfig,
        storage: Arc<dyn ObjectStorage>,
        classifier: Arc<dyn ContentClassifier>,
        audit: Arc<dyn AuditStore>,
        notifier: Arc<dyn AlertNotifier>,
    ) -> Self {
        Self {
            config,
            storage,
            classifier,
            audit,
            notifier,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Handle one object-creation event.
    ///
    /// Errors are logged and returned unchanged so the caller's redelivery
    /// policy applies. Replaying an event is not idempotent: it appends a new
    /// audit record and may send another alert.
    #[tracing::instrument(skip(self, event), fields(
        bucket = %event.source_bucket,
        key = %event.object_key
    ))]
    pub async fn handle(&self, event: &ModerationEvent) -> Result<RouteOutcome, RouterError> {
        tracing::info!("Image received");

        if event.source_bucket != self.config.intake_location {
            tracing::info!(
                intake = %self.config.intake_location,
                "Ignoring event from a bucket other than intake"
            );
            return Ok(RouteOutcome::Ignored);
        }

        match self.route(&event.object_key).await {
            Ok(decision) => Ok(RouteOutcome::Routed(decision)),
            Err(e) => {
                tracing::error!(error = %e, stage = e.stage(), "Moderation failed");
                Err(e)
            }
        }
    }

    async fn route(&self, key: &str) -> Result<PolicyDecision, RouterError> {
        let start = std::time::Instant::now();
        let intake = self.config.intake_location.as_str();

        let decision = self.decide(intake, key).await?;

        self.relocate(key, decision.decision).await?;

        let record = AuditRecord::new(key, intake, &decision);
        self.audit
            .append(&record)
            .await
            .map_err(RouterError::Audit)?;

        if decision.is_quarantined() {
            let alert = Alert::quarantined(key, &decision);
            self.notifier
                .publish(&alert)
                .await
                .map_err(RouterError::Alert)?;
        }

        tracing::info!(
            decision = %decision.decision,
            reason = %decision.reason,
            confidence = %decision.confidence,
            image_id = %record.image_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Moderation completed"
        );

        Ok(decision)
    }

    async fn decide(&self, intake: &str, key: &str) -> Result<PolicyDecision, RouterError> {
        let size = self.storage.content_length(intake, key).await?;

        if let Some(decision) = evaluate_size(size, self.config.size_threshold_bytes) {
            tracing::info!(
                size_bytes = size,
                threshold_bytes = self.config.size_threshold_bytes,
                "Size limit exceeded, skipping classification"
            );
            return Ok(decision);
        }

        let image = self.storage.download(intake, key).await?;
        let labels = self
            .classifier
            .detect_moderation_labels(&image, self.config.classification_min_confidence)
            .await
            .map_err(RouterError::Classification)?;

        Ok(evaluate_labels(&labels))
    }

    /// Copy into the destination bucket, then delete from intake.
    ///
    /// The two calls are not atomic: a failure in between leaves the object in
    /// both buckets. A source that is already gone at delete time counts as
    /// relocated.
    async fn relocate(&self, key: &str, decision: Decision) -> Result<(), RouterError> {
        let intake = self.config.intake_location.as_str();
        let destination = self.config.destination_for(decision);

        self.storage.copy(intake, destination, key).await?;

        match self.storage.delete(intake, key).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    bucket = %intake,
                    "Source object already removed from intake"
                );
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(from = %intake, to = %destination, "Image relocated");
        Ok(())
    }
}
