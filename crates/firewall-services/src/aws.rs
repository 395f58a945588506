//! Shared AWS SDK configuration loading.

use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};

const FALLBACK_REGION: &str = "us-east-1";

/// Load SDK configuration for the given region (or the default provider chain).
///
/// SDK-level retries are disabled: a failed call fails the invocation and the
/// trigger decides whether to redeliver.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(region.map(Region::new))
        .or_default_provider()
        .or_else(Region::new(FALLBACK_REGION));

    aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .retry_config(RetryConfig::disabled())
        .load()
        .await
}
