// Copyright (c) 2025 - Cowboy AI, Inc.
//! DNS hosted zones and TLS certificates

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// DNS hosted zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostedZone {
    #[serde(alias = "id")]
    pub zone_id: String,
    pub name: String,
    /// `Public` or `Private`
    #[serde(rename = "type", default)]
    pub zone_type: Option<String>,
    #[serde(default)]
    pub records: Vec<DnsRecord>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl HostedZone {
    pub fn is_private(&self) -> bool {
        self.zone_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("private"))
            || self
                .attributes
                .get("private_zone")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
    }

    /// Zone name without the trailing root dot
    pub fn display_name(&self) -> &str {
        self.name.strip_suffix('.').unwrap_or(&self.name)
    }
}

/// Record inside a hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub name: String,
    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: String,
    #[serde(default)]
    pub values: Vec<String>,
    /// Present when the record is an alias to a provider resource
    #[serde(default)]
    pub alias_target: Option<String>,
}

impl DnsRecord {
    pub fn is_alias(&self) -> bool {
        self.alias_target.is_some()
    }
}

fn default_record_type() -> String {
    "A".to_string()
}

/// TLS certificate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub arn: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_certificate_status")]
    pub status: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

fn default_certificate_status() -> String {
    "UNKNOWN".to_string()
}
