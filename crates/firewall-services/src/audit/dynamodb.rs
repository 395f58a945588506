use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use firewall_core::AuditRecord;
use std::collections::HashMap;

use super::AuditStore;
use crate::error::{ServiceError, ServiceResult};

/// Audit store writing one DynamoDB item per decision
#[derive(Clone)]
pub struct DynamoAuditStore {
    client: DynamoClient,
    table: String,
}

impl DynamoAuditStore {
    pub async fn new(region: Option<String>, table: String) -> Self {
        let config = crate::aws::load_sdk_config(region).await;
        Self::from_client(DynamoClient::new(&config), table)
    }

    pub fn from_client(client: DynamoClient, table: String) -> Self {
        Self { client, table }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

/// All attributes are stored as strings, keyed by `imageId`.
fn to_item(record: &AuditRecord) -> HashMap<String, AttributeValue> {
    record
        .attributes()
        .into_iter()
        .map(|(name, value)| (name.to_string(), AttributeValue::S(value)))
        .collect()
}

#[async_trait]
impl AuditStore for DynamoAuditStore {
    #[tracing::instrument(skip(self, record), fields(
        aws.service.name = "dynamodb",
        aws.dynamodb.operation = "PutItem",
        aws.dynamodb.table = %self.table,
        image_id = %record.image_id
    ))]
    async fn append(&self, record: &AuditRecord) -> ServiceResult<()> {
        let start = std::time::Instant::now();

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Audit record write failed"
                );
                ServiceError::Audit(DisplayErrorContext(&e).to_string())
            })?;

        tracing::info!(
            decision = %record.decision,
            reason = %record.reason,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Audit record written"
        );

        Ok(())
    }
}
