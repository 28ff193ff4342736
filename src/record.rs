use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const TXT: &str = "TXT";

/// A DNS resource record as seen by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Name relative to the zone, `@` or empty for the apex.
    pub name: String,
    pub ttl: Duration,
    pub record_type: String,
    pub data: String,
}

impl ResourceRecord {
    pub fn txt(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ttl: Duration::ZERO,
            record_type: TXT.to_string(),
            data: data.into(),
        }
    }
}

/// Flat record shape used on the hook API and by older callers.
///
/// `id`, `ttl` and `priority` are carried for compatibility only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub value: String,
    /// Seconds.
    #[serde(default)]
    pub ttl: u64,
    #[serde(default)]
    pub priority: u16,
}

impl From<Record> for ResourceRecord {
    fn from(record: Record) -> Self {
        Self {
            name: record.name,
            ttl: Duration::from_secs(record.ttl),
            record_type: record.record_type,
            data: record.value,
        }
    }
}

impl From<&Record> for ResourceRecord {
    fn from(record: &Record) -> Self {
        record.clone().into()
    }
}

impl From<ResourceRecord> for Record {
    fn from(rr: ResourceRecord) -> Self {
        Self {
            id: String::new(),
            record_type: rr.record_type,
            name: rr.name,
            value: rr.data,
            ttl: rr.ttl.as_secs(),
            priority: 0,
        }
    }
}

/// Joins a zone-relative name with its zone.
pub fn absolute_name(name: &str, zone: &str) -> String {
    if name.is_empty() || name == "@" {
        return zone.to_string();
    }
    if name.ends_with('.') {
        format!("{name}{zone}")
    } else {
        format!("{name}.{zone}")
    }
}
