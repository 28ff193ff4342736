//! ACME-DNS provider.
//!
//! The only operation the ACME-DNS API offers is a rolling update of the (at
//! most two) TXT values served for an account's subdomain. Appending and
//! setting therefore both push a new value, deleting does nothing since old
//! values age out on their own, and reading is not possible.

use std::future::{self, Future};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde::Serialize;

use super::account::{Account, AcmeDnsConfig};
use super::{RecordAppender, RecordDeleter, RecordGetter, RecordSetter};
use crate::error::{BatchError, ProviderError, Result};
use crate::record::{ResourceRecord, TXT};

/// Client-side timeout for a single update request.
pub const UPDATE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AcmeDnsProvider {
    config: AcmeDnsConfig,
    client: Client,
}

impl AcmeDnsProvider {
    pub fn new(config: AcmeDnsConfig) -> Result<Self> {
        let client = Client::builder().timeout(UPDATE_TIMEOUT).build()?;
        Ok(Self { config, client })
    }

    /// Same as [`RecordAppender::append_records`], but gives up as soon as
    /// `cancel` completes.
    ///
    /// An update in flight at that point is abandoned and the call fails
    /// with [`ProviderError::Cancelled`], carrying the records applied so far.
    pub async fn append_records_until<F>(
        &self,
        zone: &str,
        records: &[ResourceRecord],
        cancel: F,
    ) -> Result<Vec<ResourceRecord>, BatchError>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(cancel);
        let mut applied = Vec::with_capacity(records.len());

        for record in records {
            if record.record_type != TXT {
                let source = ProviderError::UnsupportedRecordType {
                    record_type: record.record_type.clone(),
                };
                return Err(BatchError::new(applied, source));
            }

            let account = match self.config.select_account(zone, &record.name) {
                Ok(account) => account,
                Err(e) => return Err(BatchError::new(applied, e)),
            };

            let result = tokio::select! {
                biased;
                () = &mut cancel => Err(ProviderError::Cancelled),
                result = update_txt_value(&self.client, &account, &record.data) => result,
            };
            if let Err(e) = result {
                return Err(BatchError::new(applied, e));
            }

            info!(
                "Updated TXT value for {} (subdomain {})",
                record.name, account.subdomain
            );
            applied.push(ResourceRecord::txt(record.name.clone(), record.data.clone()));
        }

        Ok(applied)
    }
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    subdomain: &'a str,
    txt: &'a str,
}

/// Replaces the TXT value served for `account`'s subdomain.
pub async fn update_txt_value(client: &Client, account: &Account, value: &str) -> Result<()> {
    let url = format!("{}/update", account.server_url);
    debug!("POST {url} subdomain={}", account.subdomain);

    let response = client
        .post(&url)
        .header("X-Api-User", &account.username)
        .header("X-Api-Key", &account.password)
        .json(&UpdateRequest {
            subdomain: &account.subdomain,
            txt: value,
        })
        .send()
        .await?;

    let status = response.status();
    debug!("Response status: {status}");
    if status != StatusCode::OK {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
        });
    }

    Ok(())
}

/// Only TXT records are supported; TTL is ignored.
///
/// With an account table, zone and name select the account. Otherwise the
/// single configured account is updated whatever zone and name are given.
#[async_trait]
impl RecordAppender for AcmeDnsProvider {
    async fn append_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
    ) -> Result<Vec<ResourceRecord>, BatchError> {
        self.append_records_until(zone, records, future::pending())
            .await
    }
}

#[async_trait]
impl RecordSetter for AcmeDnsProvider {
    async fn set_records(
        &self,
        zone: &str,
        records: &[ResourceRecord],
    ) -> Result<Vec<ResourceRecord>, BatchError> {
        self.append_records(zone, records).await
    }
}

/// ACME-DNS has no delete call. Older values are dropped as newer ones are
/// appended, so this does nothing.
#[async_trait]
impl RecordDeleter for AcmeDnsProvider {
    async fn delete_records(
        &self,
        _zone: &str,
        _records: &[ResourceRecord],
    ) -> Result<Vec<ResourceRecord>, BatchError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl RecordGetter for AcmeDnsProvider {
    async fn get_records(&self, _zone: &str) -> Result<Vec<ResourceRecord>> {
        Err(ProviderError::GetNotSupported)
    }
}
