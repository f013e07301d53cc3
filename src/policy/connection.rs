// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connection display policy for rule-set derived edges

use super::PolicyOption;
use crate::domain::RuleDirection;
use crate::topology::{Classification, FlowType, TrafficDirection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which classified flows are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FlowFilter {
    /// No rule-set edges at all
    None,
    /// Anything leaving a subnet, tier crossings included
    #[default]
    InterSubnet,
    /// Only tier crossings
    TierCrossing,
    /// Only flows touching a load-balancer target
    ExternalOnly,
}

impl FlowFilter {
    pub fn allows(&self, flow: FlowType) -> bool {
        match self {
            Self::None => false,
            Self::InterSubnet => matches!(flow, FlowType::InterSubnet | FlowType::TierCrossing),
            Self::TierCrossing => flow == FlowType::TierCrossing,
            Self::ExternalOnly => flow == FlowType::ExternalOnly,
        }
    }
}

impl PolicyOption for FlowFilter {
    const VARIANTS: &'static [Self] = &[
        Self::None,
        Self::InterSubnet,
        Self::TierCrossing,
        Self::ExternalOnly,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::InterSubnet => "inter-subnet",
            Self::TierCrossing => "tier-crossing",
            Self::ExternalOnly => "external-only",
        }
    }
}

/// Which traffic directions are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionFilter {
    #[default]
    Both,
    NorthSouth,
    EastWest,
}

impl DirectionFilter {
    pub fn allows(&self, direction: TrafficDirection) -> bool {
        match self {
            Self::Both => true,
            Self::NorthSouth => direction == TrafficDirection::NorthSouth,
            Self::EastWest => direction == TrafficDirection::EastWest,
        }
    }
}

impl PolicyOption for DirectionFilter {
    const VARIANTS: &'static [Self] = &[Self::Both, Self::NorthSouth, Self::EastWest];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::NorthSouth => "north-south",
            Self::EastWest => "east-west",
        }
    }
}

/// Edge label verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DetailLevel {
    /// No labels
    Minimal,
    /// `443`
    #[default]
    Ports,
    /// `https/tcp`
    Protocols,
    /// `443/tcp`
    Full,
}

impl PolicyOption for DetailLevel {
    const VARIANTS: &'static [Self] = &[Self::Minimal, Self::Ports, Self::Protocols, Self::Full];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Ports => "ports",
            Self::Protocols => "protocols",
            Self::Full => "full",
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_as_str!(FlowFilter, DirectionFilter, DetailLevel);

/// Policy for edges inferred from firewall rule sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionPolicy {
    pub flows: FlowFilter,
    pub direction: DirectionFilter,
    pub detail: DetailLevel,
    /// Drop intra-subnet flows regardless of `flows`
    pub filter_internal: bool,
    /// Skip rules with ports above the ephemeral threshold
    pub filter_ephemeral: bool,
    /// Scan ingress rules only
    pub only_ingress: bool,
}

impl ConnectionPolicy {
    /// Whether any rule-set edge can be produced at all
    pub fn is_enabled(&self) -> bool {
        self.flows != FlowFilter::None
    }

    /// Rule directions the resolver walks
    pub fn rule_directions(&self) -> &'static [RuleDirection] {
        if self.only_ingress {
            &[RuleDirection::Ingress]
        } else {
            &[RuleDirection::Ingress, RuleDirection::Egress]
        }
    }

    /// Flow gate: internal filter, then the flow filter
    pub fn shows_flow(&self, flow: FlowType) -> bool {
        if self.filter_internal && flow == FlowType::IntraSubnet {
            return false;
        }
        self.flows.allows(flow)
    }

    /// Full gate applied to instance-to-instance pairs
    pub fn shows(&self, classification: &Classification) -> bool {
        self.shows_flow(classification.flow_type) && self.direction.allows(classification.direction)
    }
}
