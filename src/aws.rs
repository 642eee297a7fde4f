use std::time::Duration;

use aws_config::imds;
use aws_config::meta::region::ProvideRegion;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_types::region::Region;
use aws_types::SdkConfig;
use tracing::debug;

use crate::error::Ec2TagError;

/// Bound on each instance metadata request so the tool fails fast instead
/// of hanging when it is not running on EC2.
const IMDS_TIMEOUT: Duration = Duration::from_secs(10);

/// Produce the SDK config for the lookup call.
///
/// A named profile selects explicit-profile mode; otherwise region and role
/// credentials come from the instance metadata service.
pub async fn load_sdk_config(
    profile: Option<&str>,
    region: Option<String>,
) -> Result<SdkConfig, Ec2TagError> {
    match profile {
        Some(profile) => Ok(profile_config(profile, region).await),
        None => instance_identity_config(region).await,
    }
}

async fn instance_identity_config(region: Option<String>) -> Result<SdkConfig, Ec2TagError> {
    let imds_client = imds::Client::builder()
        .connect_timeout(IMDS_TIMEOUT)
        .read_timeout(IMDS_TIMEOUT)
        .build();

    let region = match region {
        Some(region) => Region::new(region),
        None => imds::region::ImdsRegionProvider::builder()
            .imds_client(imds_client.clone())
            .build()
            .region()
            .await
            .ok_or(Ec2TagError::RegionResolutionFailed)?,
    };
    debug!(region = %region, "using instance identity credentials");

    let credentials = imds::credentials::ImdsCredentialsProvider::builder()
        .imds_client(imds_client)
        .build()
        .provide_credentials()
        .await
        .map_err(Ec2TagError::CredentialResolutionFailed)?;

    Ok(aws_config::defaults(BehaviorVersion::v2024_03_28())
        .region(region)
        .credentials_provider(credentials)
        .load()
        .await)
}

async fn profile_config(profile: &str, region: Option<String>) -> SdkConfig {
    debug!(profile, "using shared credentials profile");

    let credentials = ProfileFileCredentialsProvider::builder()
        .profile_name(profile)
        .build();

    // Region is taken exactly as given. Profile mode never consults the
    // metadata service, so without --region the config carries no region
    // and the describe call reports the missing region itself.
    aws_config::defaults(BehaviorVersion::v2024_03_28())
        .region(region.map(Region::new))
        .credentials_provider(credentials)
        .load()
        .await
}
