// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Classifier
//!
//! Classifies an instance pair by flow type and traffic direction using the
//! tiers of the subnets the two instances live in.
//!
//! # Decision order
//!
//! ```text
//!  either end is a load-balancer target ──> external-only
//!  same subnet id                       ──> intra-subnet
//!  both tiers known and different       ──> tier-crossing
//!  otherwise                            ──> inter-subnet
//!
//!  tier ranks differ ──> north-south
//!  tier ranks equal  ──> east-west
//!  a tier unknown    ──> both
//! ```
//!
//! A subnet id missing from the subnet list is not an error: its tier is
//! unknown and the direction degrades to `both`.

use crate::domain::{Instance, LoadBalancer, Subnet, SubnetTier};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Flow classification of an instance pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowType {
    IntraSubnet,
    InterSubnet,
    TierCrossing,
    ExternalOnly,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntraSubnet => "intra-subnet",
            Self::InterSubnet => "inter-subnet",
            Self::TierCrossing => "tier-crossing",
            Self::ExternalOnly => "external-only",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic direction of an instance pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrafficDirection {
    /// Crosses tiers
    NorthSouth,
    /// Stays within a tier
    EastWest,
    /// Undetermined
    Both,
}

impl TrafficDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NorthSouth => "north-south",
            Self::EastWest => "east-west",
            Self::Both => "both",
        }
    }

    /// Direction between two optional tiers
    pub fn between(from: Option<SubnetTier>, to: Option<SubnetTier>) -> Self {
        match (from, to) {
            (Some(a), Some(b)) if a.rank() != b.rank() => Self::NorthSouth,
            (Some(_), Some(_)) => Self::EastWest,
            _ => Self::Both,
        }
    }
}

impl fmt::Display for TrafficDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub flow_type: FlowType,
    pub direction: TrafficDirection,
}

/// Pair classifier over one inventory's subnets and load balancers
#[derive(Debug, Clone, Default)]
pub struct TopologyClassifier<'a> {
    tiers: HashMap<&'a str, SubnetTier>,
    lb_targets: HashSet<&'a str>,
}

impl<'a> TopologyClassifier<'a> {
    pub fn new(subnets: &'a [Subnet], load_balancers: &'a [LoadBalancer]) -> Self {
        let mut tiers = HashMap::with_capacity(subnets.len());
        for subnet in subnets {
            tiers.entry(subnet.id.as_str()).or_insert_with(|| subnet.tier());
        }

        let lb_targets = load_balancers
            .iter()
            .flat_map(LoadBalancer::targets)
            .map(|t| t.id.as_str())
            .collect();

        Self { tiers, lb_targets }
    }

    /// Tier of a subnet, `None` when the subnet is unknown
    pub fn tier_of(&self, subnet_id: Option<&str>) -> Option<SubnetTier> {
        subnet_id.and_then(|id| self.tiers.get(id).copied())
    }

    pub fn is_lb_target(&self, id: &str) -> bool {
        self.lb_targets.contains(id)
    }

    pub fn classify(&self, from: &Instance, to: &Instance) -> Classification {
        let from_subnet = from.subnet_id.as_deref();
        let to_subnet = to.subnet_id.as_deref();
        let from_tier = self.tier_of(from_subnet);
        let to_tier = self.tier_of(to_subnet);

        let flow_type = if self.is_lb_target(&from.id) || self.is_lb_target(&to.id) {
            FlowType::ExternalOnly
        } else if from_subnet == to_subnet {
            FlowType::IntraSubnet
        } else {
            match (from_tier, to_tier) {
                (Some(a), Some(b)) if a != b => FlowType::TierCrossing,
                _ => FlowType::InterSubnet,
            }
        };

        Classification {
            flow_type,
            direction: TrafficDirection::between(from_tier, to_tier),
        }
    }
}
