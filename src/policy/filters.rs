// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-kind render filters
//!
//! Decide which inventory records become diagram nodes at all. Defaults hide
//! resources that are going away (terminated instances, deleting databases,
//! expired certificates).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shell-style wildcard pattern (`*` and `?`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let translated = regex::escape(pattern)
            .replace(r"\*", ".*")
            .replace(r"\?", ".");
        Ok(Self {
            pattern: pattern.to_string(),
            regex: Regex::new(&format!("^{translated}$"))?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Glob {}

impl TryFrom<String> for Glob {
    type Error = regex::Error;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Self::new(&pattern)
    }
}

impl From<Glob> for String {
    fn from(glob: Glob) -> Self {
        glob.pattern
    }
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(value))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceFilter {
    pub exclude_states: Vec<String>,
    /// Instance-type patterns such as `t2.*`
    pub exclude_types: Vec<Glob>,
}

impl Default for InstanceFilter {
    fn default() -> Self {
        Self {
            exclude_states: vec!["terminated".into(), "shutting-down".into()],
            exclude_types: Vec::new(),
        }
    }
}

impl InstanceFilter {
    pub fn allows(&self, state: Option<&str>, instance_type: Option<&str>) -> bool {
        if state.is_some_and(|s| contains_ignore_case(&self.exclude_states, s)) {
            return false;
        }
        !instance_type.is_some_and(|t| self.exclude_types.iter().any(|g| g.is_match(t)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseFilter {
    pub exclude_statuses: Vec<String>,
    pub exclude_engines: Vec<String>,
}

impl Default for DatabaseFilter {
    fn default() -> Self {
        Self {
            exclude_statuses: vec!["deleting".into(), "deleted".into(), "failed".into()],
            exclude_engines: Vec::new(),
        }
    }
}

impl DatabaseFilter {
    pub fn allows(&self, status: Option<&str>, engine: Option<&str>) -> bool {
        !status.is_some_and(|s| contains_ignore_case(&self.exclude_statuses, s))
            && !engine.is_some_and(|e| contains_ignore_case(&self.exclude_engines, e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateFilter {
    pub exclude_statuses: Vec<String>,
}

impl Default for CertificateFilter {
    fn default() -> Self {
        Self {
            exclude_statuses: vec!["EXPIRED".into(), "REVOKED".into(), "FAILED".into()],
        }
    }
}

impl CertificateFilter {
    pub fn allows(&self, status: &str) -> bool {
        !contains_ignore_case(&self.exclude_statuses, status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedZoneFilter {
    pub exclude_private: bool,
}

/// Render filters for every node-producing resource kind
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceFilters {
    pub instance: InstanceFilter,
    pub database: DatabaseFilter,
    pub certificate: CertificateFilter,
    pub hosted_zone: HostedZoneFilter,
    /// Resources carrying any of these tag pairs are hidden
    pub exclude_tags: BTreeMap<String, String>,
}

impl ResourceFilters {
    pub fn allows_tags(&self, tags: Option<&BTreeMap<String, String>>) -> bool {
        let Some(tags) = tags else {
            return true;
        };
        !self
            .exclude_tags
            .iter()
            .any(|(key, value)| tags.get(key) == Some(value))
    }
}
