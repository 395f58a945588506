//! Quarantine alert delivery

#[cfg(feature = "notifier-smtp")]
mod email;
#[cfg(feature = "notifier-sns")]
mod sns;

#[cfg(feature = "notifier-smtp")]
pub use email::EmailNotifier;
#[cfg(feature = "notifier-sns")]
pub use sns::SnsNotifier;

use async_trait::async_trait;
use firewall_core::Alert;

use crate::error::ServiceResult;

/// Publishes alerts to a fixed destination
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn publish(&self, alert: &Alert) -> ServiceResult<()>;
}
