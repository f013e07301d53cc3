// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects: VPCs, Subnets and Subnet Tiers
//!
//! Subnet tiers are *derived*: the discovery layer never reports them, so they
//! are inferred from the subnet's `Name` tag. The heuristic is a pure function
//! of the name and therefore idempotent.
//!
//! ```text
//!   name contains            tier            rank
//!   ─────────────────────    ────────────    ────
//!   public | dmz | present.  Presentation    1
//!   private | app            Application     2
//!   data | db | restricted   Restricted      3
//!   (anything else)          Application     2
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tier parsing error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid subnet tier: {0} (expected presentation, application or restricted)")]
pub struct TierParseError(pub String);

/// Coarse security classification of a subnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetTier {
    /// Internet-facing subnets
    Presentation,
    /// Application servers
    Application,
    /// Data stores
    Restricted,
}

impl SubnetTier {
    /// Tiers in diagram reading order
    pub const ORDERED: [SubnetTier; 3] = [Self::Presentation, Self::Application, Self::Restricted];

    /// Infer a tier from a subnet name
    pub fn classify(name: &str) -> Self {
        let name = name.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| name.contains(n));

        if has(&["public", "dmz", "presentation"]) {
            Self::Presentation
        } else if has(&["private", "app", "application"]) {
            Self::Application
        } else if has(&["data", "db", "restricted"]) {
            Self::Restricted
        } else {
            Self::Application
        }
    }

    /// Fixed rank used for traffic direction
    pub fn rank(&self) -> u8 {
        match self {
            Self::Presentation => 1,
            Self::Application => 2,
            Self::Restricted => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presentation => "presentation",
            Self::Application => "application",
            Self::Restricted => "restricted",
        }
    }

    /// Label for a tier cluster
    pub fn cluster_label(&self) -> &'static str {
        match self {
            Self::Presentation => "Presentation Tier",
            Self::Application => "Application Tier",
            Self::Restricted => "Restricted Tier",
        }
    }

    /// Label prefix for a subnet cluster in this tier
    pub fn subnet_label(&self) -> &'static str {
        match self {
            Self::Presentation => "Public Subnet",
            Self::Application => "Application Subnet",
            Self::Restricted => "Restricted Subnet",
        }
    }
}

impl fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubnetTier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "presentation" | "public" => Ok(Self::Presentation),
            "application" | "app" => Ok(Self::Application),
            "restricted" | "data" => Ok(Self::Restricted),
            other => Err(TierParseError(other.to_string())),
        }
    }
}

/// Value of the `Name` tag, if any
pub fn name_tag(tags: &BTreeMap<String, String>) -> Option<&str> {
    tags.get("Name").map(String::as_str).filter(|n| !n.is_empty())
}

/// Virtual private network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vpc {
    #[serde(rename = "vpc_id")]
    pub id: String,
    #[serde(default)]
    pub cidr_block: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Vpc {
    /// Name tag, falling back to the id
    pub fn name(&self) -> &str {
        name_tag(&self.tags).unwrap_or(&self.id)
    }
}

/// Subnet inside a VPC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    #[serde(rename = "subnet_id")]
    pub id: String,
    #[serde(rename = "vpc_id", default)]
    pub network_id: String,
    #[serde(default)]
    pub cidr_block: String,
    #[serde(default)]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Explicit tier; when absent the name heuristic decides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<SubnetTier>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Subnet {
    /// Name tag, falling back to the id
    pub fn name(&self) -> &str {
        name_tag(&self.tags).unwrap_or(&self.id)
    }

    /// Effective tier of this subnet
    pub fn tier(&self) -> SubnetTier {
        self.tier.unwrap_or_else(|| SubnetTier::classify(self.name()))
    }
}
