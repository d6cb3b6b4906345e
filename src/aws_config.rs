use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_resourcegroupstagging::Client as TaggingClient;
use aws_types::region::Region;

/// Region used when neither the environment nor a profile names one.
const FALLBACK_REGION: &str = "us-east-1";

pub async fn configure_aws() -> aws_types::SdkConfig {
    let region_provider =
        RegionProviderChain::default_provider().or_else(Region::new(FALLBACK_REGION));

    aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await
}

/// Builds the Resource Groups Tagging API client once per cold start.
pub async fn tagging_client() -> TaggingClient {
    let config = configure_aws().await;
    tracing::info!(region = ?config.region(), "Loaded AWS configuration");
    TaggingClient::new(&config)
}
