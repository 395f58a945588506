use crate::error::RouterError;
use crate::router::{ModerationRouter, RouteOutcome};
use crate::trigger::{parse_notification, TriggerMessage};

/// Decode a trigger body and route the object it names.
///
/// Returns `None` for configuration test messages.
pub async fn handle_notification(
    router: &ModerationRouter,
    body: &str,
) -> Result<Option<RouteOutcome>, RouterError> {
    let message = parse_notification(body).map_err(|e| {
        tracing::error!(error = %e, "Rejected trigger message");
        e
    })?;

    match message {
        TriggerMessage::Test => {
            tracing::info!("Received notification test event");
            Ok(None)
        }
        TriggerMessage::Object(event) => router.handle(&event).await.map(Some),
    }
}
