use aws_sdk_route53::model::{Change, ChangeAction, ChangeBatch, HostedZone, ResourceRecordSet, RrType};
use thiserror::Error;
use tracing::debug;

use crate::api::{ApiError, Route53Api};

/// A resolved hosted zone: the provider-assigned id (kept verbatim,
/// `/hostedzone/...` prefix included) and the dot-terminated zone name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// Record-level primitives scoped to one hosted zone.
///
/// The zone is resolved once, at construction, by longest-suffix match
/// against the account's hosted zones, and held for the client's lifetime.
#[derive(Debug)]
pub struct ZoneClient<A> {
    api: A,
    zone: Zone,
}

impl<A: Route53Api> ZoneClient<A> {
    /// Resolve `domain` to the most specific hosted zone containing it.
    ///
    /// Labels are stripped from the left until the remaining suffix equals
    /// a zone name, so the longest matching suffix wins. When several zones
    /// share that name, the one with the lexicographically smallest id is
    /// chosen so resolution does not depend on listing order.
    pub async fn resolve(api: A, domain: &str) -> Result<Self, ZoneError> {
        let zones = api.hosted_zones().await?;

        let zone = find_zone(&zones, domain)
            .ok_or_else(|| ZoneError::ZoneNotFound(domain.to_owned()))?;

        debug!(zone = %zone.name, id = %zone.id, "resolved hosted zone for {domain}");

        Ok(Self { api, zone })
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Submit a single-record change batch. Provider-side rejection (e.g.
    /// CREATE of an existing record, throttling) surfaces as the SDK error.
    pub async fn change_record(
        &self,
        action: ChangeAction,
        record_set: ResourceRecordSet,
    ) -> Result<(), ZoneError> {
        let batch = ChangeBatch::builder()
            .changes(
                Change::builder()
                    .action(action)
                    .resource_record_set(record_set)
                    .build(),
            )
            .build();

        self.api.change_records(&self.zone.id, batch).await?;

        Ok(())
    }

    /// Fetch the record set named exactly `fqdn` with type `rr_type`, if any.
    ///
    /// Route 53 lists records starting at-or-after the requested name, so a
    /// nearby lexicographic neighbor coming back first is the normal "no
    /// such record" outcome, not an error.
    pub async fn record_set(
        &self,
        fqdn: &str,
        rr_type: RrType,
    ) -> Result<Option<ResourceRecordSet>, ZoneError> {
        let sets = self
            .api
            .record_sets(&self.zone.id, &fqdn.to_lowercase(), rr_type.clone())
            .await?;

        Ok(sets.into_iter().next().filter(|set| {
            set.name().map_or(false, |n| n.eq_ignore_ascii_case(fqdn))
                && set.r#type() == Some(&rr_type)
        }))
    }
}

fn find_zone(zones: &[HostedZone], domain: &str) -> Option<Zone> {
    let mut suffix = domain.strip_suffix('.').unwrap_or(domain);

    loop {
        let name = format!("{suffix}.");

        let found = zones
            .iter()
            .filter(|z| z.name() == Some(name.as_str()))
            .min_by_key(|z| z.id().unwrap_or_default());
        if let Some(zone) = found {
            return Some(Zone {
                id: zone.id().unwrap_or_default().to_owned(),
                name,
            });
        }

        match suffix.split_once('.') {
            Some((_, rest)) => suffix = rest,
            None => return None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("no hosted zone matches {0}")]
    ZoneNotFound(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use aws_sdk_route53::model::ResourceRecord;

    use super::*;
    use crate::api::MockRoute53Api;

    fn zone(id: &str, name: &str) -> HostedZone {
        HostedZone::builder().id(id).name(name).build()
    }

    #[test]
    fn longest_suffix_wins() {
        let zones = vec![
            zone("/hostedzone/Z1", "example.com."),
            zone("/hostedzone/Z2", "sub.example.com."),
        ];

        let found = find_zone(&zones, "host.sub.example.com").unwrap();
        assert_eq!(found.name, "sub.example.com.");
        assert_eq!(found.id, "/hostedzone/Z2");
    }

    #[test]
    fn trailing_dot_is_accepted() {
        let zones = vec![zone("/hostedzone/Z1", "example.com.")];

        let found = find_zone(&zones, "www.example.com.").unwrap();
        assert_eq!(found.name, "example.com.");
    }

    #[test]
    fn equal_names_break_ties_by_smallest_id() {
        let zones = vec![
            zone("/hostedzone/Z9", "example.com."),
            zone("/hostedzone/Z2", "example.com."),
        ];

        let found = find_zone(&zones, "www.example.com").unwrap();
        assert_eq!(found.id, "/hostedzone/Z2");
    }

    #[test]
    fn no_suffix_match_is_none() {
        let zones = vec![zone("/hostedzone/Z1", "example.com.")];
        assert!(find_zone(&zones, "www.example.org").is_none());
    }

    #[tokio::test]
    async fn resolve_fails_with_zone_not_found() {
        let mut api = MockRoute53Api::new();
        api.expect_hosted_zones().returning(|| Ok(vec![]));

        let err = ZoneClient::resolve(api, "www.example.com").await.unwrap_err();
        assert!(matches!(err, ZoneError::ZoneNotFound(d) if d == "www.example.com"));
    }

    #[tokio::test]
    async fn record_set_rejects_lexicographic_neighbor() {
        let mut api = MockRoute53Api::new();
        api.expect_hosted_zones()
            .returning(|| Ok(vec![zone("/hostedzone/Z1", "example.com.")]));
        // Start-at semantics: the next record after a missing name.
        api.expect_record_sets().returning(|_, _, _| {
            Ok(vec![ResourceRecordSet::builder()
                .name("wwx.example.com.")
                .r#type(RrType::A)
                .ttl(300)
                .resource_records(ResourceRecord::builder().value("1.2.3.4").build())
                .build()])
        });

        let client = ZoneClient::resolve(api, "example.com").await.unwrap();
        let set = client.record_set("www.example.com.", RrType::A).await.unwrap();
        assert!(set.is_none());
    }

    #[tokio::test]
    async fn record_set_matches_name_case_insensitively() {
        let mut api = MockRoute53Api::new();
        api.expect_hosted_zones()
            .returning(|| Ok(vec![zone("/hostedzone/Z1", "example.com.")]));
        api.expect_record_sets()
            .withf(|zone_id, start_name, _| {
                zone_id == "/hostedzone/Z1" && start_name == "www.example.com."
            })
            .returning(|_, _, _| {
                Ok(vec![ResourceRecordSet::builder()
                    .name("WWW.example.com.")
                    .r#type(RrType::A)
                    .ttl(300)
                    .resource_records(ResourceRecord::builder().value("1.2.3.4").build())
                    .build()])
            });

        let client = ZoneClient::resolve(api, "example.com").await.unwrap();
        let set = client
            .record_set("www.Example.COM.", RrType::A)
            .await
            .unwrap()
            .expect("record should match despite case");
        assert_eq!(set.name(), Some("WWW.example.com."));
    }

    #[tokio::test]
    async fn record_set_rejects_type_mismatch() {
        let mut api = MockRoute53Api::new();
        api.expect_hosted_zones()
            .returning(|| Ok(vec![zone("/hostedzone/Z1", "example.com.")]));
        api.expect_record_sets().returning(|_, _, _| {
            Ok(vec![ResourceRecordSet::builder()
                .name("www.example.com.")
                .r#type(RrType::Cname)
                .ttl(300)
                .resource_records(ResourceRecord::builder().value("x.example.com").build())
                .build()])
        });

        let client = ZoneClient::resolve(api, "example.com").await.unwrap();
        let set = client.record_set("www.example.com.", RrType::A).await.unwrap();
        assert!(set.is_none());
    }
}
