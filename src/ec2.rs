use aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput;
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client as Ec2Client;
use tracing::debug;

use crate::error::Ec2TagError;

/// Resolve the value of `tag_key` on the instance with `instance_id`.
///
/// Returns an empty string when the ID matched nothing or the instance has
/// no such tag; the caller prints the result as-is.
pub async fn tag_value_for_instance(
    client: &Ec2Client,
    instance_id: &str,
    tag_key: &str,
) -> Result<String, Ec2TagError> {
    let resp = client
        .describe_instances()
        .filters(
            Filter::builder()
                .name("instance-id")
                .values(instance_id)
                .build(),
        )
        .send()
        .await
        .map_err(|source| Ec2TagError::LookupFailed {
            instance_id: instance_id.to_string(),
            source,
        })?;

    debug!(
        instance_id,
        reservations = resp.reservations().len(),
        "describe-instances returned"
    );

    Ok(scan_tag_value(&resp, tag_key))
}

/// Scan every reservation, instance and tag for an exact key match.
///
/// Each match overwrites the previous one, so if the same key appears more
/// than once the last occurrence in iteration order wins.
fn scan_tag_value(resp: &DescribeInstancesOutput, tag_key: &str) -> String {
    let mut value = String::new();
    for reservation in resp.reservations() {
        for instance in reservation.instances() {
            for tag in instance.tags() {
                if tag.key() == Some(tag_key) {
                    value = tag.value().unwrap_or_default().to_string();
                }
            }
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::{Instance, Reservation, Tag};

    fn tag(key: &str, value: &str) -> Tag {
        Tag::builder().key(key).value(value).build()
    }

    fn instance_with_tags(tags: Vec<Tag>) -> Instance {
        Instance::builder().set_tags(Some(tags)).build()
    }

    fn reservation(instances: Vec<Instance>) -> Reservation {
        Reservation::builder().set_instances(Some(instances)).build()
    }

    fn response(reservations: Vec<Reservation>) -> DescribeInstancesOutput {
        DescribeInstancesOutput::builder()
            .set_reservations(Some(reservations))
            .build()
    }

    #[test]
    fn empty_response_yields_empty_value() {
        let resp = response(vec![]);
        assert_eq!(scan_tag_value(&resp, "Name"), "");
    }

    #[test]
    fn single_match_returns_value() {
        let resp = response(vec![reservation(vec![instance_with_tags(vec![
            tag("Name", "web-1"),
            tag("Env", "prod"),
        ])])]);
        assert_eq!(scan_tag_value(&resp, "Env"), "prod");
    }

    #[test]
    fn missing_key_yields_empty_value() {
        let resp = response(vec![reservation(vec![instance_with_tags(vec![tag(
            "Stage", "dev",
        )])])]);
        assert_eq!(
            scan_tag_value(&resp, "Name"),
            "",
            "an unmatched key must produce an empty result, not an error"
        );
    }

    #[test]
    fn match_is_exact_and_case_sensitive() {
        let resp = response(vec![reservation(vec![instance_with_tags(vec![
            tag("name", "lower"),
            tag("NamePrefix", "longer"),
        ])])]);
        assert_eq!(scan_tag_value(&resp, "Name"), "");
    }

    #[test]
    fn value_is_preserved_byte_for_byte() {
        let resp = response(vec![reservation(vec![instance_with_tags(vec![tag(
            "Name",
            "  spaced out  ",
        )])])]);
        assert_eq!(scan_tag_value(&resp, "Name"), "  spaced out  ");
    }

    #[test]
    fn duplicate_key_on_one_instance_keeps_last_value() {
        let resp = response(vec![reservation(vec![instance_with_tags(vec![
            tag("Name", "first"),
            tag("Name", "second"),
        ])])]);
        assert_eq!(scan_tag_value(&resp, "Name"), "second");
    }

    #[test]
    fn duplicate_key_across_reservations_keeps_last_value() {
        let resp = response(vec![
            reservation(vec![instance_with_tags(vec![tag("Name", "res-a")])]),
            reservation(vec![
                instance_with_tags(vec![tag("Name", "res-b-inst-1")]),
                instance_with_tags(vec![tag("Name", "res-b-inst-2")]),
            ]),
        ]);
        assert_eq!(scan_tag_value(&resp, "Name"), "res-b-inst-2");
    }

    #[test]
    fn tag_without_key_or_value_is_ignored() {
        let resp = response(vec![reservation(vec![instance_with_tags(vec![
            Tag::builder().value("orphan").build(),
            tag("Name", "kept"),
            Tag::builder().key("Name").build(),
        ])])]);
        // A keyless tag never matches; a valueless match counts as empty.
        assert_eq!(scan_tag_value(&resp, "Name"), "");
    }
}
