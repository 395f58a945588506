//! Moderation policy
//!
//! Pure decision functions used by the router. They never touch external
//! services, so every rule can be exercised without fakes.

use crate::models::{ModerationLabel, PolicyDecision};

/// Size gate. Returns a quarantine decision when `size_bytes` is strictly
/// greater than `threshold_bytes`; `None` means classification should run.
pub fn evaluate_size(size_bytes: u64, threshold_bytes: u64) -> Option<PolicyDecision> {
    (size_bytes > threshold_bytes).then(PolicyDecision::size_limit_exceeded)
}

/// Content gate over the labels returned by the classifier.
///
/// The first label in service order decides the reported confidence; labels
/// are not re-sorted by confidence.
pub fn evaluate_labels(labels: &[ModerationLabel]) -> PolicyDecision {
    match labels.first() {
        Some(label) => PolicyDecision::nsfw_detected(label),
        None => PolicyDecision::safe_content(),
    }
}
