// Copyright (c) 2025 - Cowboy AI, Inc.
//! Named presets: bundles of policy field values
//!
//! A preset is applied as its own configuration layer between the file layers
//! and explicit command-line flags, so a flag given alongside a preset still
//! wins for that field.

use super::PolicyOption;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Resources only: no rule-set edges, no load balancers
    Clean,
    /// Tier crossings and connected load balancers
    Network,
    /// Ingress rules with full labels
    Security,
    /// Externally fronted flows with full labels
    Debug,
}

impl Preset {
    /// Settings document fragment this preset stands for
    pub fn overrides(&self) -> Value {
        match self {
            Self::Clean => json!({
                "connections": {"flows": "none", "detail": "minimal"},
                "load_balancers": {"display": "none"}
            }),
            Self::Network => json!({
                "connections": {
                    "flows": "tier-crossing",
                    "direction": "north-south",
                    "detail": "ports"
                },
                "load_balancers": {"display": "connected-only", "detail": "ports"}
            }),
            Self::Security => json!({
                "connections": {"flows": "inter-subnet", "detail": "full", "only_ingress": true},
                "load_balancers": {"display": "all", "detail": "full"}
            }),
            Self::Debug => json!({
                "connections": {
                    "flows": "external-only",
                    "detail": "full",
                    "filter_ephemeral": true
                },
                "load_balancers": {"display": "connected-only", "detail": "full"}
            }),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clean => "Resource layout only, without inferred traffic",
            Self::Network => "Traffic between tiers and the load balancers in front of it",
            Self::Security => "Every allowed ingress path with port and protocol",
            Self::Debug => "Externally fronted flows with full detail",
        }
    }
}

impl PolicyOption for Preset {
    const VARIANTS: &'static [Self] = &[Self::Clean, Self::Network, Self::Security, Self::Debug];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Network => "network",
            Self::Security => "security",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
