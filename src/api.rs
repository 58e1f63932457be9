use aws_sdk_route53::error::{
    ChangeResourceRecordSetsError, ListHostedZonesError, ListResourceRecordSetsError,
};
use aws_sdk_route53::model::{ChangeBatch, HostedZone, ResourceRecordSet, RrType};
use aws_sdk_route53::types::SdkError;
use aws_sdk_route53::Client;
use thiserror::Error;

/// The three Route 53 calls this crate consumes, behind a trait so record
/// logic can be exercised without AWS.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Route53Api: Send + Sync {
    /// All hosted zones in the account. First page only.
    async fn hosted_zones(&self) -> Result<Vec<HostedZone>, ApiError>;

    /// Record sets starting at-or-after `start_name`/`start_type`, limited
    /// to a single item. Route 53 returns the next lexicographic record if
    /// no exact match exists, so callers must re-check the result.
    async fn record_sets(
        &self,
        zone_id: &str,
        start_name: &str,
        start_type: RrType,
    ) -> Result<Vec<ResourceRecordSet>, ApiError>;

    /// Submit a change batch against one zone.
    async fn change_records(&self, zone_id: &str, batch: ChangeBatch) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
impl Route53Api for Client {
    async fn hosted_zones(&self) -> Result<Vec<HostedZone>, ApiError> {
        let output = self.list_hosted_zones().send().await?;

        if output.is_truncated() {
            tracing::warn!("hosted zone listing truncated; later pages are ignored");
        }

        Ok(output.hosted_zones().unwrap_or_default().to_vec())
    }

    async fn record_sets(
        &self,
        zone_id: &str,
        start_name: &str,
        start_type: RrType,
    ) -> Result<Vec<ResourceRecordSet>, ApiError> {
        Ok(self
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .start_record_name(start_name)
            .start_record_type(start_type)
            .max_items(1)
            .send()
            .await?
            .resource_record_sets()
            .unwrap_or_default()
            .to_vec())
    }

    async fn change_records(&self, zone_id: &str, batch: ChangeBatch) -> Result<(), ApiError> {
        self.change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await?;

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    ListZones(#[from] SdkError<ListHostedZonesError>),
    #[error(transparent)]
    ListRecordSets(#[from] SdkError<ListResourceRecordSetsError>),
    #[error(transparent)]
    ChangeRecordSets(#[from] SdkError<ChangeResourceRecordSetsError>),
}
