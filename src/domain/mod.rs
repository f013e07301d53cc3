// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud Resource Domain Models
//!
//! Typed, immutable records for everything the discovery layer reports, plus
//! the [`Inventory`] snapshot that carries them into the diagram pipeline.
//!
//! # Resources
//!
//! - [`Vpc`] / [`Subnet`] - network hierarchy; subnets carry a derived [`SubnetTier`]
//! - [`Instance`] - compute instances, members of rule sets
//! - [`LoadBalancer`] - with [`TargetGroup`]s, [`Target`]s and [`Listener`]s
//! - [`Database`] - managed databases, members of rule sets
//! - [`RuleSet`] - firewall rules whose sources may reference other rule sets
//! - [`HostedZone`] / [`Certificate`] - DNS and TLS
//!
//! # Identity
//!
//! Each record is identified by its provider's natural id (instance id, load
//! balancer ARN, database identifier, zone id). [`ResourceRef`] offers a
//! uniform view over all of them.

mod de;

pub mod compute;
pub mod dns;
pub mod firewall;
pub mod inventory;
pub mod load_balancer;
pub mod network;
pub mod resource_type;

pub use compute::{Database, Instance};
pub use dns::{Certificate, DnsRecord, HostedZone};
pub use firewall::{
    Rule, RuleDirection, RuleSet, RuleSetRules, RuleSets, SourceRef, EPHEMERAL_PORT_THRESHOLD,
};
pub use inventory::{Inventory, Membership, ResourceRef};
pub use load_balancer::{HealthCheck, Listener, LoadBalancer, Target, TargetGroup};
pub use network::{name_tag, Subnet, SubnetTier, TierParseError, Vpc};
pub use resource_type::{ResourceCategory, ResourceType};
