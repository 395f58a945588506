//! Audit trail persistence

#[cfg(feature = "audit-dynamodb")]
mod dynamodb;

#[cfg(feature = "audit-dynamodb")]
pub use dynamodb::DynamoAuditStore;

use async_trait::async_trait;
use firewall_core::AuditRecord;

use crate::error::ServiceResult;

/// Append-only store of moderation decisions
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one record. Records are never updated or deleted.
    async fn append(&self, record: &AuditRecord) -> ServiceResult<()>;
}
