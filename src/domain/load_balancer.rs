// Copyright (c) 2025 - Cowboy AI, Inc.
//! Load balancers with their target groups, targets and listeners

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health state a target reports when the inventory omits it
pub const DEFAULT_TARGET_HEALTH: &str = "healthy";

/// Port assumed for a target group that does not report one
pub const DEFAULT_TARGET_PORT: u16 = 443;

/// Load balancer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub name: String,
    /// Natural identifier; falls back to the name when absent
    #[serde(default)]
    pub arn: Option<String>,
    /// `application`, `network`, `gateway` or `classic`
    #[serde(rename = "type", default)]
    pub lb_type: Option<String>,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub dns_name: String,
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default)]
    pub target_groups: Vec<TargetGroup>,
    #[serde(default)]
    pub listeners: Vec<Listener>,
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl LoadBalancer {
    /// Node-map key for this load balancer
    pub fn id(&self) -> &str {
        self.arn.as_deref().unwrap_or(&self.name)
    }

    /// Every registered target across all target groups
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.target_groups.iter().flat_map(|tg| tg.targets.iter())
    }
}

/// Target group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub health_check: Option<HealthCheck>,
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// Health check settings of a target group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Numeric port or `traffic-port`
    #[serde(default, deserialize_with = "super::de::string_or_number")]
    pub port: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// Registered target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub health: Option<String>,
}

impl Target {
    pub fn health(&self) -> &str {
        self.health.as_deref().unwrap_or(DEFAULT_TARGET_HEALTH)
    }

    pub fn is_healthy(&self) -> bool {
        self.health() == DEFAULT_TARGET_HEALTH
    }
}

/// Listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub port: u16,
    #[serde(default)]
    pub protocol: Option<String>,
    /// Certificate ARNs attached to this listener
    #[serde(default)]
    pub certificates: Vec<String>,
}
