use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::provider::{AcmeDnsConfig, DomainConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub acmedns: AcmeDnsSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub key: Option<String>, // 访问密钥，用于鉴权（可选）
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            key: None,
        }
    }
}

/// `[acmedns]` table: provider settings plus an optional acme-dns-client
/// storage file to take accounts from.
#[derive(Debug, Clone, Deserialize)]
pub struct AcmeDnsSection {
    #[serde(default)]
    pub accounts_file: Option<PathBuf>,
    #[serde(flatten)]
    pub provider: AcmeDnsConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Provider settings with the accounts file merged in.
    ///
    /// Inline `[acmedns.config]` entries win over file entries for the same
    /// domain.
    pub fn provider_config(&self) -> Result<AcmeDnsConfig> {
        let mut provider = self.acmedns.provider.clone();
        let Some(path) = &self.acmedns.accounts_file else {
            return Ok(provider);
        };

        let mut accounts = load_accounts_file(path)?;
        if let Some(inline) = provider.config.take() {
            accounts.extend(inline);
        }
        provider.config = Some(accounts);
        Ok(provider)
    }
}

/// Reads an acme-dns-client storage file (domain -> account).
pub fn load_accounts_file(path: &Path) -> Result<HashMap<String, DomainConfig>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read accounts file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse accounts file: {}", path.display()))
}
