//! Image Firewall Services Library
//!
//! Capability traits for the external collaborators of the moderation router
//! (content classification, audit persistence, alert delivery) and their
//! concrete clients.

pub mod audit;
#[cfg(any(
    feature = "classifier-rekognition",
    feature = "audit-dynamodb",
    feature = "notifier-sns"
))]
pub mod aws;
pub mod classifier;
pub mod error;
pub mod notifier;

// Re-export commonly used types
pub use audit::AuditStore;
#[cfg(feature = "audit-dynamodb")]
pub use audit::DynamoAuditStore;
pub use classifier::ContentClassifier;
#[cfg(feature = "classifier-rekognition")]
pub use classifier::RekognitionClassifier;
pub use error::{ServiceError, ServiceResult};
#[cfg(feature = "notifier-smtp")]
pub use notifier::EmailNotifier;
pub use notifier::AlertNotifier;
#[cfg(feature = "notifier-sns")]
pub use notifier::SnsNotifier;
