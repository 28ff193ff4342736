pub mod account;
pub mod acmedns;

use async_trait::async_trait;

use crate::error::{BatchError, Result};
use crate::record::ResourceRecord;

pub use account::{Account, AcmeDnsConfig, DomainConfig, ACME_CHALLENGE_PREFIX};
pub use acmedns::AcmeDnsProvider;

/// Adds records to a zone.
#[async_trait]
pub trait RecordAppender: Send + Sync {
    /// Returns the records that were applied. On failure the error carries
    /// the records applied before it.
    async fn append_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
    ) -> Result<Vec<ResourceRecord>, BatchError>;
}

/// Replaces the records of a zone.
#[async_trait]
pub trait RecordSetter: Send + Sync {
    async fn set_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
    ) -> Result<Vec<ResourceRecord>, BatchError>;
}

/// Removes records from a zone.
#[async_trait]
pub trait RecordDeleter: Send + Sync {
    async fn delete_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
    ) -> Result<Vec<ResourceRecord>, BatchError>;
}

/// Lists the records of a zone.
#[async_trait]
pub trait RecordGetter: Send + Sync {
    async fn get_records(&self, zone: &str) -> Result<Vec<ResourceRecord>>;
}
