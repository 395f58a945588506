//! SQS trigger
//!
//! Receives one notification at a time and deletes it only after the router
//! succeeded. Failed messages stay on the queue, so its visibility timeout and
//! redrive policy decide redelivery and dead-lettering.

use std::future::Future;
use std::time::Duration;

use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::Message;
use aws_sdk_sqs::Client as SqsClient;

use crate::error::RouterError;
use crate::handler::handle_notification;
use crate::router::{ModerationRouter, RouteOutcome};

/// Pause after a failed receive call before polling again
const RECEIVE_ERROR_PAUSE: Duration = Duration::from_secs(5);

pub struct QueueTrigger {
    client: SqsClient,
    queue_url: String,
    wait_time_seconds: i32,
}

impl QueueTrigger {
    pub async fn new(region: Option<String>, queue_url: String, wait_time_seconds: i32) -> Self {
        let config = firewall_services::aws::load_sdk_config(region).await;
        Self {
            client: SqsClient::new(&config),
            queue_url,
            wait_time_seconds,
        }
    }

    /// Poll until `shutdown` resolves. Shutdown is only observed between
    /// messages, never while one is being routed.
    pub async fn run<F>(&self, router: &ModerationRouter, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            queue_url = %self.queue_url,
            wait_time_seconds = self.wait_time_seconds,
            "Queue trigger started"
        );

        tokio::pin!(shutdown);

        loop {
            let received = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Queue trigger shutting down");
                    return Ok(());
                }
                result = self.receive() => result,
            };

            match received {
                Ok(messages) => {
                    for message in messages {
                        self.process(router, &message).await;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Queue receive failed");
                    tokio::time::sleep(RECEIVE_ERROR_PAUSE).await;
                }
            }
        }
    }

    /// Long-poll for at most one message.
    async fn receive(&self) -> anyhow::Result<Vec<Message>> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(1)
            .wait_time_seconds(self.wait_time_seconds)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(&e)))?;

        Ok(output.messages().to_vec())
    }

    /// Route one message and delete it on success. Never fails: a message
    /// that is not deleted becomes visible again after its timeout.
    async fn process(&self, router: &ModerationRouter, message: &Message) {
        let Some(receipt_handle) = message.receipt_handle() else {
            tracing::warn!(message_id = ?message.message_id(), "Message without receipt handle");
            return;
        };
        let body = message.body().unwrap_or_default();

        let result = handle_notification(router, body).await;
        match acknowledgement(&result) {
            Acknowledgement::Delete => {
                if let Err(e) = self
                    .client
                    .delete_message()
                    .queue_url(&self.queue_url)
                    .receipt_handle(receipt_handle)
                    .send()
                    .await
                {
                    tracing::error!(
                        message_id = ?message.message_id(),
                        error = %DisplayErrorContext(&e),
                        "Failed to delete processed message"
                    );
                }
            }
            Acknowledgement::Keep => {
                tracing::warn!(
                    message_id = ?message.message_id(),
                    error = ?result.err(),
                    "Message processing failed, leaving it on the queue"
                );
            }
        }
    }
}

/// What to do with a queue message once it has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    Delete,
    Keep,
}

/// Successful routing, ignored events and test events are deleted; any error
/// keeps the message for redelivery.
pub fn acknowledgement(result: &Result<Option<RouteOutcome>, RouterError>) -> Acknowledgement {
    match result {
        Ok(_) => Acknowledgement::Delete,
        Err(_) => Acknowledgement::Keep,
    }
}
