//! Router error type
//!
//! Each variant names the pipeline stage that failed and carries the
//! collaborator's error unchanged as its source.

use firewall_core::CoreError;
use firewall_services::ServiceError;
use firewall_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    InvalidEvent(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Classification failed: {0}")]
    Classification(#[source] ServiceError),

    #[error("Audit write failed: {0}")]
    Audit(#[source] ServiceError),

    #[error("Alert publish failed: {0}")]
    Alert(#[source] ServiceError),
}

impl RouterError {
    /// Short stage name for structured logs
    pub fn stage(&self) -> &'static str {
        match self {
            RouterError::InvalidEvent(_) => "event",
            RouterError::Storage(_) => "storage",
            RouterError::Classification(_) => "classification",
            RouterError::Audit(_) => "audit",
            RouterError::Alert(_) => "alert",
        }
    }
}
