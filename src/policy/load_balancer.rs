// Copyright (c) 2025 - Cowboy AI, Inc.
//! Load-balancer display policy

use super::PolicyOption;
use crate::domain::{LoadBalancer, Target};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which load balancers are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LbDisplay {
    #[default]
    All,
    /// Only balancers with at least one qualifying target in the inventory
    ConnectedOnly,
    None,
}

impl PolicyOption for LbDisplay {
    const VARIANTS: &'static [Self] = &[Self::All, Self::ConnectedOnly, Self::None];

    fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ConnectedOnly => "connected-only",
            Self::None => "none",
        }
    }
}

/// Label verbosity on balancer-to-target edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LbDetail {
    Minimal,
    #[default]
    Ports,
    /// Port, protocol and health check
    Full,
}

impl PolicyOption for LbDetail {
    const VARIANTS: &'static [Self] = &[Self::Minimal, Self::Ports, Self::Full];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Ports => "ports",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for LbDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LbDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy for load-balancer nodes and their target edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadBalancerPolicy {
    pub display: LbDisplay,
    pub detail: LbDetail,
    /// Ignore targets that do not report `healthy`
    pub filter_unhealthy: bool,
}

impl LoadBalancerPolicy {
    /// Whether a target counts for connectivity and gets an edge
    pub fn counts_target(&self, target: &Target) -> bool {
        !self.filter_unhealthy || target.is_healthy()
    }

    /// Balancers to draw, in inventory order
    ///
    /// `instance_ids` is the current resource set; a connected-only balancer
    /// needs one qualifying target in it.
    pub fn visible<'a>(
        &self,
        load_balancers: &'a [LoadBalancer],
        instance_ids: &HashSet<&str>,
    ) -> Vec<&'a LoadBalancer> {
        match self.display {
            LbDisplay::None => Vec::new(),
            LbDisplay::All => load_balancers.iter().collect(),
            LbDisplay::ConnectedOnly => load_balancers
                .iter()
                .filter(|lb| {
                    lb.targets()
                        .any(|t| instance_ids.contains(t.id.as_str()) && self.counts_target(t))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balancer(name: &str, targets: serde_json::Value) -> LoadBalancer {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "target_groups": [{"name": "tg", "targets": targets}]
        }))
        .unwrap()
    }

    fn names(lbs: Vec<&LoadBalancer>) -> Vec<&str> {
        lbs.into_iter().map(|lb| lb.name.as_str()).collect()
    }

    #[test]
    fn test_display_modes() {
        let lbs = vec![
            balancer("live", serde_json::json!([{"id": "i-a"}])),
            balancer("orphan", serde_json::json!([{"id": "i-gone"}])),
            balancer("sick", serde_json::json!([{"id": "i-a", "health": "unhealthy"}])),
            balancer("empty", serde_json::json!([])),
        ];
        let instances: HashSet<&str> = ["i-a"].into_iter().collect();

        let mut policy = LoadBalancerPolicy::default();
        assert_eq!(policy.visible(&lbs, &instances).len(), 4);

        policy.display = LbDisplay::ConnectedOnly;
        assert_eq!(names(policy.visible(&lbs, &instances)), vec!["live", "sick"]);

        policy.filter_unhealthy = true;
        assert_eq!(names(policy.visible(&lbs, &instances)), vec!["live"]);

        policy.display = LbDisplay::None;
        assert!(policy.visible(&lbs, &instances).is_empty());
    }
}
