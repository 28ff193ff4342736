use thiserror::Error;

use crate::record::ResourceRecord;

pub type Result<T, E = ProviderError> = std::result::Result<T, E>;

/// Errors produced while selecting an account or talking to ACME-DNS.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A static credential field is missing.
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    /// The account table has no entry for the requested domain.
    #[error("config for domain {domain} not found")]
    ConfigNotFound { domain: String },

    #[error("acme-dns provider only supports adding TXT records, got {record_type}")]
    UnsupportedRecordType { record_type: String },

    /// The update request never produced a response (DNS, connect, timeout).
    #[error("error while sending update request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("update request cancelled")]
    Cancelled,

    #[error("updating ACME-DNS record resulted in response code {status}")]
    UnexpectedStatus { status: u16 },

    #[error("acme-dns provider does not support getting records")]
    GetNotSupported,
}

impl ProviderError {
    /// Whether the failure happened before ACME-DNS answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Cancelled)
    }
}

/// A batch stopped part way through.
///
/// `applied` holds the records that were pushed before `source` occurred.
/// Those updates are live on the ACME-DNS server and are not rolled back.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct BatchError {
    pub applied: Vec<ResourceRecord>,
    pub source: ProviderError,
}

impl BatchError {
    pub fn new(applied: Vec<ResourceRecord>, source: ProviderError) -> Self {
        Self { applied, source }
    }
}

impl From<ProviderError> for BatchError {
    fn from(source: ProviderError) -> Self {
        Self::new(Vec::new(), source)
    }
}
