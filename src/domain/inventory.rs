// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Inventory
//!
//! The normalized snapshot the discovery layer hands to the diagram core.
//! Every section defaults to empty: a failed discovery call for one resource
//! type yields an empty list and the rest of the pipeline proceeds.
//!
//! # Document shape
//!
//! ```text
//! { vpcs, subnets, instances, load_balancers, rds_instances,
//!   security_groups: {id -> RuleSet}, route53_zones, certificates }
//! ```

use super::compute::{Database, Instance};
use super::de::null_as_default;
use super::dns::{Certificate, HostedZone};
use super::firewall::RuleSets;
use super::load_balancer::LoadBalancer;
use super::network::{Subnet, Vpc};
use super::resource_type::ResourceType;
use crate::errors::DiagramResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Immutable snapshot of discovered resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    #[serde(deserialize_with = "null_as_default")]
    pub vpcs: Vec<Vpc>,
    #[serde(deserialize_with = "null_as_default")]
    pub subnets: Vec<Subnet>,
    #[serde(deserialize_with = "null_as_default")]
    pub instances: Vec<Instance>,
    #[serde(deserialize_with = "null_as_default")]
    pub load_balancers: Vec<LoadBalancer>,
    #[serde(rename = "rds_instances", alias = "databases", deserialize_with = "null_as_default")]
    pub databases: Vec<Database>,
    #[serde(rename = "security_groups", alias = "rule_sets")]
    pub rule_sets: RuleSets,
    #[serde(rename = "route53_zones", alias = "hosted_zones", deserialize_with = "null_as_default")]
    pub hosted_zones: Vec<HostedZone>,
    #[serde(deserialize_with = "null_as_default")]
    pub certificates: Vec<Certificate>,
}

impl Inventory {
    /// Parse an inventory document
    pub fn from_json_str(json: &str) -> DiagramResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an inventory document from disk
    pub fn load(path: impl AsRef<Path>) -> DiagramResult<Self> {
        let path = path.as_ref();
        let inventory = Self::from_json_str(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), resources = inventory.len(), "Loaded inventory");
        Ok(inventory)
    }

    /// Restrict the snapshot to the given regions and VPC
    ///
    /// An empty region list keeps every region. Hosted zones are global and
    /// always kept; rule sets without a VPC are kept.
    pub fn scoped(&self, regions: &[String], vpc_id: Option<&str>) -> Self {
        let keep = |resource: ResourceRef<'_>| resource.membership().within(regions, vpc_id);

        Self {
            vpcs: self.vpcs.iter().filter(|v| keep(ResourceRef::Vpc(v))).cloned().collect(),
            subnets: self
                .subnets
                .iter()
                .filter(|s| keep(ResourceRef::Subnet(s)))
                .cloned()
                .collect(),
            instances: self
                .instances
                .iter()
                .filter(|i| keep(ResourceRef::Instance(i)))
                .cloned()
                .collect(),
            load_balancers: self
                .load_balancers
                .iter()
                .filter(|lb| keep(ResourceRef::LoadBalancer(lb)))
                .cloned()
                .collect(),
            databases: self
                .databases
                .iter()
                .filter(|db| keep(ResourceRef::Database(db)))
                .cloned()
                .collect(),
            rule_sets: self
                .rule_sets
                .iter()
                .filter(|rs| {
                    Membership {
                        network_id: rs.vpc_id.as_deref(),
                        subnet_id: None,
                        region: rs.region.as_deref(),
                    }
                    .within(regions, vpc_id)
                })
                .cloned()
                .collect(),
            hosted_zones: self.hosted_zones.clone(),
            certificates: self
                .certificates
                .iter()
                .filter(|c| keep(ResourceRef::Certificate(c)))
                .cloned()
                .collect(),
        }
    }

    pub fn subnet(&self, id: &str) -> Option<&Subnet> {
        self.subnets.iter().find(|s| s.id == id)
    }

    pub fn instance(&self, id: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub fn database(&self, id: &str) -> Option<&Database> {
        self.databases.iter().find(|db| db.id == id)
    }

    /// Regions present in the snapshot, sorted
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = self.vpcs.iter().filter_map(|v| v.region.as_deref()).collect();
        regions.sort_unstable();
        regions.dedup();
        regions
    }

    /// Every resource as a uniform reference
    pub fn resources(&self) -> impl Iterator<Item = ResourceRef<'_>> {
        self.vpcs
            .iter()
            .map(ResourceRef::Vpc)
            .chain(self.subnets.iter().map(ResourceRef::Subnet))
            .chain(self.instances.iter().map(ResourceRef::Instance))
            .chain(self.load_balancers.iter().map(ResourceRef::LoadBalancer))
            .chain(self.databases.iter().map(ResourceRef::Database))
            .chain(self.hosted_zones.iter().map(ResourceRef::HostedZone))
            .chain(self.certificates.iter().map(ResourceRef::Certificate))
    }

    /// Total number of resources, rule sets included
    pub fn len(&self) -> usize {
        self.resources().count() + self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resource counts per type
    pub fn counts(&self) -> BTreeMap<ResourceType, usize> {
        let mut counts = BTreeMap::new();
        for resource in self.resources() {
            *counts.entry(resource.resource_type()).or_insert(0) += 1;
        }
        if !self.rule_sets.is_empty() {
            counts.insert(ResourceType::SecurityGroup, self.rule_sets.len());
        }
        counts
    }
}

/// Where a resource sits in the network hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Membership<'a> {
    pub network_id: Option<&'a str>,
    pub subnet_id: Option<&'a str>,
    pub region: Option<&'a str>,
}

impl Membership<'_> {
    /// Whether this position falls inside `regions` and `network_id`
    ///
    /// An unknown region or network never excludes.
    pub fn within(&self, regions: &[String], network_id: Option<&str>) -> bool {
        let in_region = regions.is_empty()
            || self.region.map_or(true, |r| regions.iter().any(|want| want == r));
        let in_network = network_id.map_or(true, |want| self.network_id.map_or(true, |n| n == want));
        in_region && in_network
    }
}

/// Borrowed view over any inventory record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceRef<'a> {
    Vpc(&'a Vpc),
    Subnet(&'a Subnet),
    Instance(&'a Instance),
    LoadBalancer(&'a LoadBalancer),
    Database(&'a Database),
    HostedZone(&'a HostedZone),
    Certificate(&'a Certificate),
}

impl<'a> ResourceRef<'a> {
    pub fn resource_type(&self) -> ResourceType {
        match *self {
            Self::Vpc(_) => ResourceType::Vpc,
            Self::Subnet(_) => ResourceType::Subnet,
            Self::Instance(_) => ResourceType::Instance,
            Self::LoadBalancer(_) => ResourceType::LoadBalancer,
            Self::Database(_) => ResourceType::Database,
            Self::HostedZone(_) => ResourceType::HostedZone,
            Self::Certificate(_) => ResourceType::Certificate,
        }
    }

    /// Natural identifier
    pub fn id(&self) -> &'a str {
        match *self {
            Self::Vpc(v) => &v.id,
            Self::Subnet(s) => &s.id,
            Self::Instance(i) => &i.id,
            Self::LoadBalancer(lb) => lb.id(),
            Self::Database(db) => &db.id,
            Self::HostedZone(z) => &z.zone_id,
            Self::Certificate(c) => &c.arn,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            Self::Vpc(v) => v.name(),
            Self::Subnet(s) => s.name(),
            Self::Instance(i) => i.display_name(),
            Self::LoadBalancer(lb) => &lb.name,
            Self::Database(db) => &db.id,
            Self::HostedZone(z) => z.display_name(),
            Self::Certificate(c) => &c.domain,
        }
    }

    pub fn membership(&self) -> Membership<'a> {
        match *self {
            Self::Vpc(v) => Membership {
                network_id: Some(&v.id),
                subnet_id: None,
                region: v.region.as_deref(),
            },
            Self::Subnet(s) => Membership {
                network_id: Some(&s.network_id),
                subnet_id: Some(&s.id),
                region: s.region.as_deref(),
            },
            Self::Instance(i) => Membership {
                network_id: i.vpc_id.as_deref(),
                subnet_id: i.subnet_id.as_deref(),
                region: i.region.as_deref(),
            },
            Self::LoadBalancer(lb) => Membership {
                network_id: lb.vpc_id.as_deref(),
                subnet_id: lb.subnets.first().map(String::as_str),
                region: lb.region.as_deref(),
            },
            Self::Database(db) => Membership {
                network_id: db.vpc_id.as_deref(),
                subnet_id: None,
                region: db.region.as_deref(),
            },
            Self::HostedZone(_) => Membership::default(),
            Self::Certificate(c) => Membership {
                region: c.region.as_deref(),
                ..Membership::default()
            },
        }
    }

    /// Lifecycle state as reported by the provider
    pub fn state(&self) -> Option<&'a str> {
        match *self {
            Self::Vpc(v) => v.state.as_deref(),
            Self::Subnet(s) => s.state.as_deref(),
            Self::Instance(i) => i.state.as_deref(),
            Self::LoadBalancer(lb) => lb.state.as_deref(),
            Self::Database(db) => db.status.as_deref(),
            Self::HostedZone(_) => None,
            Self::Certificate(c) => Some(&c.status),
        }
    }

    pub fn tags(&self) -> Option<&'a BTreeMap<String, String>> {
        match *self {
            Self::Vpc(v) => Some(&v.tags),
            Self::Subnet(s) => Some(&s.tags),
            Self::Instance(i) => Some(&i.tags),
            Self::LoadBalancer(lb) => Some(&lb.tags),
            Self::Database(db) => Some(&db.tags),
            Self::HostedZone(_) | Self::Certificate(_) => None,
        }
    }
}
