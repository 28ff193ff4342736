use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::record::absolute_name;

/// Label prepended to DNS-01 challenge names.
pub const ACME_CHALLENGE_PREFIX: &str = "_acme-challenge.";

/// One ACME-DNS account, as stored by acme-dns-client.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DomainConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub subdomain: String,
    /// Informational only.
    #[serde(default)]
    pub fulldomain: String,
    #[serde(default)]
    pub server_url: String,
}

/// Provider settings.
///
/// Either `config` maps bare domains to accounts, or the four flat fields
/// describe one account used for every zone and name. When `config` is
/// present the flat fields are ignored.
#[derive(Clone, Default, Deserialize)]
pub struct AcmeDnsConfig {
    #[serde(default)]
    pub config: Option<HashMap<String, DomainConfig>>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub subdomain: String,
    /// ACME-DNS API base URL, e.g. `https://auth.acme-dns.io`.
    #[serde(default)]
    pub server_url: String,
}

/// Credentials resolved for one update.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub subdomain: String,
    pub server_url: String,
}

impl std::fmt::Debug for DomainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("subdomain", &self.subdomain)
            .field("fulldomain", &self.fulldomain)
            .field("server_url", &self.server_url)
            .finish()
    }
}

impl std::fmt::Debug for AcmeDnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcmeDnsConfig")
            .field("config", &self.config)
            .field("username", &self.username)
            .field("password", &"***")
            .field("subdomain", &self.subdomain)
            .field("server_url", &self.server_url)
            .finish()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"***")
            .field("subdomain", &self.subdomain)
            .field("server_url", &self.server_url)
            .finish()
    }
}

impl From<&DomainConfig> for Account {
    fn from(config: &DomainConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            subdomain: config.subdomain.clone(),
            server_url: config.server_url.clone(),
        }
    }
}

/// Key used to look a record up in the account table.
pub fn lookup_domain(zone: &str, name: &str) -> String {
    let domain = absolute_name(name, zone);
    let domain = domain.strip_suffix('.').unwrap_or(&domain);
    domain
        .strip_prefix(ACME_CHALLENGE_PREFIX)
        .unwrap_or(domain)
        .to_string()
}

impl AcmeDnsConfig {
    /// Configuration with a single account for every zone.
    pub fn single(
        username: impl Into<String>,
        password: impl Into<String>,
        subdomain: impl Into<String>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            config: None,
            username: username.into(),
            password: password.into(),
            subdomain: subdomain.into(),
            server_url: server_url.into(),
        }
    }

    /// Configuration with one account per domain.
    pub fn table(accounts: HashMap<String, DomainConfig>) -> Self {
        Self {
            config: Some(accounts),
            ..Self::default()
        }
    }

    /// Picks the credentials to use for `name` in `zone`.
    pub fn select_account(&self, zone: &str, name: &str) -> Result<Account> {
        if let Some(accounts) = &self.config {
            let domain = lookup_domain(zone, name);
            return accounts
                .get(&domain)
                .map(Account::from)
                .ok_or(ProviderError::ConfigNotFound { domain });
        }

        let fields = [
            ("Username", &self.username),
            ("Password", &self.password),
            ("Subdomain", &self.subdomain),
            ("ServerURL", &self.server_url),
        ];
        if let Some((field, _)) = fields.into_iter().find(|(_, value)| value.is_empty()) {
            return Err(ProviderError::EmptyField { field });
        }

        Ok(Account {
            username: self.username.clone(),
            password: self.password.clone(),
            subdomain: self.subdomain.clone(),
            server_url: self.server_url.clone(),
        })
    }
}
