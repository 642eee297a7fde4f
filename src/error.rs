use aws_credential_types::provider::error::CredentialsError;
use aws_sdk_ec2::error::SdkError;
use aws_sdk_ec2::operation::describe_instances::DescribeInstancesError;
use thiserror::Error;

/// Fatal conditions. A missing tag is not one of them; that case is an
/// empty result, not an error.
#[derive(Error, Debug)]
pub enum Ec2TagError {
    #[error("could not resolve a region from the instance metadata service")]
    RegionResolutionFailed,

    #[error("could not obtain role credentials from the instance metadata service")]
    CredentialResolutionFailed(#[source] CredentialsError),

    #[error("DescribeInstances failed for {instance_id}")]
    LookupFailed {
        instance_id: String,
        #[source]
        source: SdkError<DescribeInstancesError>,
    },
}
