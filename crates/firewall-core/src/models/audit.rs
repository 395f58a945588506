use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::decision::{Confidence, Decision, DecisionReason, PolicyDecision};

/// Immutable audit entry describing one moderation decision.
///
/// Every evaluation gets a fresh `image_id`, so replaying an event appends a
/// second record rather than overwriting the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub image_id: Uuid,
    pub file_name: String,
    pub bucket: String,
    pub decision: Decision,
    pub reason: DecisionReason,
    pub confidence: Confidence,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(file_name: &str, bucket: &str, decision: &PolicyDecision) -> Self {
        Self {
            image_id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            bucket: bucket.to_string(),
            decision: decision.decision,
            reason: decision.reason,
            confidence: decision.confidence,
            timestamp: Utc::now(),
        }
    }

    /// ISO-8601 UTC timestamp with microsecond precision
    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Flat (attribute, value) pairs as written to the audit table.
    /// All values are strings.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("imageId", self.image_id.to_string()),
            ("fileName", self.file_name.clone()),
            ("bucket", self.bucket.clone()),
            ("decision", self.decision.as_str().to_string()),
            ("reason", self.reason.as_str().to_string()),
            ("confidence", self.confidence.to_string()),
            ("timestamp", self.timestamp_string()),
        ]
    }
}

fn serialize_timestamp<S: serde::Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))
}
