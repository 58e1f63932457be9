use aws_sdk_route53::model::{ChangeAction, ResourceRecord, ResourceRecordSet};
use aws_sdk_route53::Client;
use tracing::debug;

use crate::api::Route53Api;
use crate::record::{RecordType, RecordValues};
use crate::zone::{ZoneClient, ZoneError};

const DEFAULT_TTL: i64 = 300;

/// CRUD over one record type within one hosted zone.
///
/// The zone is resolved eagerly at construction and fixed for the manager's
/// lifetime. Record names are canonicalized to dot-terminated FQDNs under
/// the zone before every provider call, so callers can pass bare host
/// labels (`"www"`) or full names interchangeably.
#[derive(Debug)]
pub struct RecordManager<A = Client> {
    zone: ZoneClient<A>,
    record_type: RecordType,
    ttl: i64,
}

impl RecordManager<Client> {
    /// Build a manager using AWS credentials and region from the standard
    /// environment/profile chain.
    pub async fn from_env(domain: &str, record_type: RecordType) -> Result<Self, ZoneError> {
        let config = aws_config::from_env().load().await;
        Self::new(Client::new(&config), domain, record_type).await
    }
}

impl<A: Route53Api> RecordManager<A> {
    pub async fn new(api: A, domain: &str, record_type: RecordType) -> Result<Self, ZoneError> {
        Ok(Self {
            zone: ZoneClient::resolve(api, domain).await?,
            record_type,
            ttl: DEFAULT_TTL,
        })
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Dot-terminated name of the managed zone.
    pub fn zone_name(&self) -> &str {
        &self.zone.zone().name
    }

    pub fn ttl(&self) -> &i64 {
        &self.ttl
    }

    pub fn ttl_mut(&mut self) -> &mut i64 {
        &mut self.ttl
    }

    /// Canonicalize `name` to a dot-terminated FQDN under the zone. Names
    /// already under the zone pass through (gaining a trailing dot if
    /// missing); anything else is treated as a host label. Idempotent.
    pub fn canonical(&self, name: &str) -> String {
        let zone_name = self.zone_name();
        if name.ends_with(zone_name) {
            name.to_owned()
        } else if name.ends_with(&zone_name[..zone_name.len() - 1]) {
            format!("{name}.")
        } else {
            format!("{name}.{zone_name}")
        }
    }

    /// Create the record. Fails with the provider's error if a record of
    /// this name and type already exists.
    #[tracing::instrument(skip(self, values), fields(zone = self.zone_name(), record_type = %self.record_type))]
    pub async fn add(
        &self,
        name: &str,
        values: impl Into<RecordValues>,
    ) -> Result<(), ZoneError> {
        let fqdn = self.canonical(name);
        let values = self.record_type.encode(values.into().0);

        debug!(%fqdn, ?values, "creating record");

        self.zone
            .change_record(ChangeAction::Create, self.record_set(&fqdn, values, self.ttl))
            .await
    }

    /// Replace the record's values. Returns `Ok(false)` without touching
    /// the provider when the record does not exist and `allow_create` is
    /// off; with `allow_create`, a missing record is created instead.
    #[tracing::instrument(skip(self, values), fields(zone = self.zone_name(), record_type = %self.record_type))]
    pub async fn update(
        &self,
        name: &str,
        values: impl Into<RecordValues>,
        allow_create: bool,
    ) -> Result<bool, ZoneError> {
        let fqdn = self.canonical(name);
        let values = self.record_type.encode(values.into().0);

        let record_set = match self.zone.record_set(&fqdn, self.record_type.rr_type()).await? {
            // Keep the fetched name and TTL, swap the values.
            Some(existing) => self.record_set(
                existing.name().unwrap_or(&fqdn),
                values,
                existing.ttl().unwrap_or(self.ttl),
            ),
            None if !allow_create => {
                debug!(%fqdn, "record absent and creation not allowed, skipping update");
                return Ok(false);
            }
            None => self.record_set(&fqdn, values, self.ttl),
        };

        self.zone.change_record(ChangeAction::Upsert, record_set).await?;
        Ok(true)
    }

    /// Values of the record, decoded, or `None` if it does not exist.
    #[tracing::instrument(skip(self), fields(zone = self.zone_name(), record_type = %self.record_type))]
    pub async fn get(&self, name: &str) -> Result<Option<Vec<String>>, ZoneError> {
        let fqdn = self.canonical(name);

        Ok(self
            .zone
            .record_set(&fqdn, self.record_type.rr_type())
            .await?
            .map(|set| {
                self.record_type.decode(
                    set.resource_records()
                        .unwrap_or_default()
                        .iter()
                        .filter_map(|r| r.value().map(ToOwned::to_owned))
                        .collect(),
                )
            }))
    }

    /// Delete the record. Route 53 requires the full record body for a
    /// DELETE, so the fetched set is submitted as-is. Returns `Ok(false)`
    /// when there is nothing to delete.
    #[tracing::instrument(skip(self), fields(zone = self.zone_name(), record_type = %self.record_type))]
    pub async fn remove(&self, name: &str) -> Result<bool, ZoneError> {
        let fqdn = self.canonical(name);

        match self.zone.record_set(&fqdn, self.record_type.rr_type()).await? {
            Some(existing) => {
                self.zone.change_record(ChangeAction::Delete, existing).await?;
                Ok(true)
            }
            None => {
                debug!(%fqdn, "record absent, nothing to remove");
                Ok(false)
            }
        }
    }

    fn record_set(&self, fqdn: &str, values: Vec<String>, ttl: i64) -> ResourceRecordSet {
        ResourceRecordSet::builder()
            .name(fqdn)
            .r#type(self.record_type.rr_type())
            .ttl(ttl)
            .set_resource_records(Some(
                values
                    .into_iter()
                    .map(|value| ResourceRecord::builder().value(value).build())
                    .collect(),
            ))
            .build()
    }
}
