//! Publishes DNS-01 challenge TXT values through an ACME-DNS server.
//!
//! [`AcmeDnsProvider`] implements the record capabilities
//! ([`RecordAppender`], [`RecordSetter`], [`RecordDeleter`],
//! [`RecordGetter`]) on top of the single `/update` call ACME-DNS offers.
//! The `api` and `config` modules back the `acmedns-rust` hook service.

pub mod api;
pub mod config;
pub mod error;
pub mod provider;
pub mod record;

pub use error::{BatchError, ProviderError};
pub use provider::{
    Account, AcmeDnsConfig, AcmeDnsProvider, DomainConfig, RecordAppender, RecordDeleter,
    RecordGetter, RecordSetter,
};
pub use record::{Record, ResourceRecord};
