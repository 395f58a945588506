//! Trigger input decoding
//!
//! Turns an object-creation notification document into a `ModerationEvent`.
//! Only the first record is evaluated; one invocation handles one object.

use firewall_core::{CoreError, ModerationEvent};
use serde::Deserialize;

use crate::error::RouterError;

/// Event name S3 sends once when a bucket notification is configured
pub const TEST_EVENT: &str = "s3:TestEvent";

#[derive(Debug, Clone, Deserialize)]
pub struct S3EventNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    /// URL-encoded as delivered
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl S3EventNotification {
    /// Event for the first record, with its key URL-decoded
    pub fn first_event(&self) -> Result<ModerationEvent, RouterError> {
        let record = self.records.first().ok_or_else(|| {
            CoreError::InvalidEvent("notification contains no records".to_string())
        })?;

        if self.records.len() > 1 {
            tracing::warn!(
                record_count = self.records.len(),
                "Notification carries several records, only the first is evaluated"
            );
        }

        tracing::debug!(event_name = ?record.event_name, "Decoding notification record");

        Ok(ModerationEvent::from_encoded(
            record.s3.bucket.name.as_str(),
            &record.s3.object.key,
        )?)
    }
}

/// What a trigger message asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerMessage {
    /// An object to moderate
    Object(ModerationEvent),
    /// A configuration test message; acknowledge and do nothing
    Test,
}

/// Top-level shapes a trigger body may take: a bare notification, an S3 test
/// event, or an SNS envelope wrapping either of those.
#[derive(Debug, Deserialize)]
struct RawTrigger {
    #[serde(rename = "Records")]
    records: Option<Vec<S3EventRecord>>,
    #[serde(rename = "Event")]
    event: Option<String>,
    #[serde(rename = "Type")]
    envelope_type: Option<String>,
    #[serde(rename = "Message")]
    message: Option<String>,
}

/// Parse a trigger body.
pub fn parse_notification(body: &str) -> Result<TriggerMessage, RouterError> {
    let raw: RawTrigger = serde_json::from_str(body).map_err(CoreError::from)?;

    if raw.envelope_type.as_deref() == Some("Notification") {
        if let Some(inner) = raw.message {
            return parse_notification(&inner);
        }
    }

    if raw.event.as_deref() == Some(TEST_EVENT) {
        return Ok(TriggerMessage::Test);
    }

    let notification = S3EventNotification {
        records: raw.records.unwrap_or_default(),
    };
    notification.first_event().map(TriggerMessage::Object)
}
