// Copyright (c) 2025 - Cowboy AI, Inc.
//! Policy Layer - Flat Display Policies
//!
//! Every display option is an independent field on a flat record. Presets are
//! nothing more than bundles of field values applied as a configuration layer,
//! so any preset outcome can also be reached by setting the fields directly.
//!
//! # Records
//!
//! ```text
//! ConnectionPolicy      flows · direction · detail · filter_internal
//!                       filter_ephemeral · only_ingress
//! LoadBalancerPolicy    display · detail · filter_unhealthy
//! ResourceFilters       per-kind render filters (states, engines, tags)
//! ```
//!
//! Enum-valued fields implement [`PolicyOption`], which the configuration
//! validator uses to parse raw values and to list the accepted ones.

pub mod connection;
pub mod filters;
pub mod load_balancer;
pub mod preset;

pub use connection::{ConnectionPolicy, DetailLevel, DirectionFilter, FlowFilter};
pub use filters::{
    CertificateFilter, DatabaseFilter, Glob, HostedZoneFilter, InstanceFilter, ResourceFilters,
};
pub use load_balancer::{LbDetail, LbDisplay, LoadBalancerPolicy};
pub use preset::Preset;

/// Enum-valued policy field with a fixed vocabulary
pub trait PolicyOption: Sized + Copy + 'static {
    /// Every accepted value
    const VARIANTS: &'static [Self];

    /// Canonical kebab-case spelling
    fn as_str(&self) -> &'static str;

    /// Parse a raw value; case and `_`/`-` are not significant
    fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace('_', "-");
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.as_str() == normalized)
    }

    /// Accepted values joined for error messages
    fn expected() -> String {
        Self::VARIANTS
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
