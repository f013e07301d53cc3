// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Handlers
//!
//! One handler per node-producing resource kind. The set is closed: adding a
//! kind means adding a variant here, and the compiler points at every match
//! that needs a new arm.
//!
//! # Responsibilities
//!
//! ```text
//! ResourceHandler
//!   ├─ should_render     render filters from the context
//!   ├─ create_node       id prefix + multi-line label
//!   ├─ cluster_key       region / network / tier / subnet placement
//!   └─ create_connection edge kind for a (source, target) pair
//! ```

use super::context::DiagramContext;
use super::model::{sanitize_id, ClusterKey, Edge, EdgeKind, Node};
use crate::domain::{
    Certificate, Database, HostedZone, Instance, Inventory, LoadBalancer, ResourceRef,
    ResourceType, Subnet, SubnetTier, Vpc,
};
use std::collections::HashMap;
use std::fmt;

/// Region assumed for networks that do not report one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Handler for one node-producing resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceHandler {
    Instance,
    LoadBalancer,
    Database,
    HostedZone,
    Certificate,
}

/// Row of the handler table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerEntry {
    /// Provider service name
    pub service: &'static str,
    /// Resource name within the service
    pub resource: &'static str,
    pub handler: ResourceHandler,
    pub description: &'static str,
}

/// Every supported (service, resource) pair
pub static HANDLERS: &[HandlerEntry] = &[
    HandlerEntry {
        service: "ec2",
        resource: "instance",
        handler: ResourceHandler::Instance,
        description: "Compute instances, placed in their subnet",
    },
    HandlerEntry {
        service: "elbv2",
        resource: "alb",
        handler: ResourceHandler::LoadBalancer,
        description: "Application load balancers",
    },
    HandlerEntry {
        service: "elbv2",
        resource: "nlb",
        handler: ResourceHandler::LoadBalancer,
        description: "Network load balancers",
    },
    HandlerEntry {
        service: "elb",
        resource: "classic",
        handler: ResourceHandler::LoadBalancer,
        description: "Classic load balancers",
    },
    HandlerEntry {
        service: "rds",
        resource: "db_instance",
        handler: ResourceHandler::Database,
        description: "Managed databases, placed in a restricted subnet",
    },
    HandlerEntry {
        service: "route53",
        resource: "hosted_zone",
        handler: ResourceHandler::HostedZone,
        description: "Hosted zones, linked to the balancers their records point at",
    },
    HandlerEntry {
        service: "acm",
        resource: "certificate",
        handler: ResourceHandler::Certificate,
        description: "Certificates attached to balancer listeners",
    },
];

impl ResourceHandler {
    /// Handler for a resource, if its kind becomes a node
    pub fn for_resource(resource: &ResourceRef<'_>) -> Option<Self> {
        Self::for_type(resource.resource_type())
    }

    pub fn for_type(resource_type: ResourceType) -> Option<Self> {
        match resource_type {
            ResourceType::Instance => Some(Self::Instance),
            ResourceType::LoadBalancer => Some(Self::LoadBalancer),
            ResourceType::Database => Some(Self::Database),
            ResourceType::HostedZone => Some(Self::HostedZone),
            ResourceType::Certificate => Some(Self::Certificate),
            ResourceType::Vpc | ResourceType::Subnet | ResourceType::SecurityGroup => None,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Instance => ResourceType::Instance,
            Self::LoadBalancer => ResourceType::LoadBalancer,
            Self::Database => ResourceType::Database,
            Self::HostedZone => ResourceType::HostedZone,
            Self::Certificate => ResourceType::Certificate,
        }
    }

    /// Prefix that keeps node ids of different kinds apart
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Instance => "ec2",
            Self::LoadBalancer => "lb",
            Self::Database => "rds",
            Self::HostedZone => "zone",
            Self::Certificate => "cert",
        }
    }

    /// Table rows served by this handler
    pub fn entries(&self) -> impl Iterator<Item = &'static HandlerEntry> + '_ {
        HANDLERS.iter().filter(move |entry| entry.handler == *self)
    }

    /// Whether the context's render filters admit the resource
    pub fn should_render(&self, resource: ResourceRef<'_>, ctx: &DiagramContext) -> bool {
        let filters = &ctx.filters;
        if !filters.allows_tags(resource.tags()) {
            return false;
        }
        match (self, resource) {
            (Self::Instance, ResourceRef::Instance(i)) => filters
                .instance
                .allows(i.state.as_deref(), i.instance_type.as_deref()),
            (Self::LoadBalancer, ResourceRef::LoadBalancer(_)) => true,
            (Self::Database, ResourceRef::Database(db)) => filters
                .database
                .allows(db.status.as_deref(), db.engine.as_deref()),
            (Self::HostedZone, ResourceRef::HostedZone(zone)) => {
                !(filters.hosted_zone.exclude_private && zone.is_private())
            }
            (Self::Certificate, ResourceRef::Certificate(cert)) => {
                filters.certificate.allows(&cert.status)
            }
            _ => false,
        }
    }

    /// Node for the resource; `None` when it is not this handler's kind
    pub fn create_node(&self, resource: ResourceRef<'_>) -> Option<Node> {
        let label = match (self, resource) {
            (Self::Instance, ResourceRef::Instance(i)) => instance_label(i),
            (Self::LoadBalancer, ResourceRef::LoadBalancer(lb)) => load_balancer_label(lb),
            (Self::Database, ResourceRef::Database(db)) => database_label(db),
            (Self::HostedZone, ResourceRef::HostedZone(zone)) => zone_label(zone),
            (Self::Certificate, ResourceRef::Certificate(cert)) => certificate_label(cert),
            _ => return None,
        };
        Some(Node {
            id: format!("{}_{}", self.id_prefix(), sanitize_id(resource.id())),
            resource_id: resource.id().to_string(),
            kind: self.resource_type(),
            label,
        })
    }

    /// Cluster the node belongs in; `None` for top-level kinds and for
    /// resources without a placeable subnet
    pub fn cluster_key(&self, resource: ResourceRef<'_>, placement: &Placement<'_>) -> Option<ClusterKey> {
        match (self, resource) {
            (Self::Instance, ResourceRef::Instance(i)) => {
                placement.subnet_key(i.subnet_id.as_deref()?)
            }
            (Self::LoadBalancer, ResourceRef::LoadBalancer(lb)) => lb
                .subnets
                .iter()
                .filter(|id| placement.in_network(id, lb.vpc_id.as_deref()))
                .find_map(|id| placement.subnet_key(id)),
            (Self::Database, ResourceRef::Database(db)) => {
                placement.first_in_tier(db.vpc_id.as_deref()?, SubnetTier::Restricted)
            }
            _ => None,
        }
    }

    /// Edge from a node of this kind to `to`, if the pair is meaningful
    pub fn create_connection(&self, from: &Node, to: &Node, label: impl Into<String>) -> Option<Edge> {
        let kind = match (self, to.kind) {
            (Self::Instance, ResourceType::Instance) => EdgeKind::Rule,
            (Self::Instance, ResourceType::Database) => EdgeKind::Database,
            (Self::LoadBalancer, ResourceType::Instance) => EdgeKind::Target,
            (Self::LoadBalancer, ResourceType::Certificate) => EdgeKind::Certificate,
            (Self::HostedZone, ResourceType::LoadBalancer) => EdgeKind::Dns,
            _ => return None,
        };
        Some(Edge {
            from: from.id.clone(),
            to: to.id.clone(),
            label: label.into(),
            kind,
        })
    }
}

impl fmt::Display for ResourceHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource_type().display_name())
    }
}

fn instance_label(instance: &Instance) -> String {
    let mut lines = vec![instance.display_name().to_string()];
    if let Some(ip) = instance.private_ip.as_deref().filter(|ip| !ip.is_empty()) {
        lines.push(ip.to_string());
    }
    if let Some(instance_type) = instance.instance_type.as_deref().filter(|t| !t.is_empty()) {
        lines.push(format!("({instance_type})"));
    }
    lines.join("\n")
}

fn load_balancer_label(lb: &LoadBalancer) -> String {
    let ips: Vec<&str> = lb.ips.iter().take(2).map(String::as_str).collect();
    if ips.is_empty() {
        lb.name.clone()
    } else {
        format!("{}\n{}", lb.name, ips.join(", "))
    }
}

fn database_label(db: &Database) -> String {
    let mut lines = vec![db.id.clone()];
    lines.extend(db.engine.iter().filter(|e| !e.is_empty()).cloned());
    lines.extend(db.endpoint.iter().filter(|e| !e.is_empty()).cloned());
    lines.join("\n")
}

fn zone_label(zone: &HostedZone) -> String {
    if zone.is_private() {
        format!("{}\n(private)", zone.display_name())
    } else {
        zone.display_name().to_string()
    }
}

fn certificate_label(cert: &Certificate) -> String {
    let domain = if cert.domain.is_empty() { &cert.arn } else { &cert.domain };
    format!("{domain}\n{}", cert.status)
}

/// Subnet and network lookups used to place nodes
#[derive(Debug, Default)]
pub struct Placement<'a> {
    vpcs: HashMap<&'a str, &'a Vpc>,
    subnets: HashMap<&'a str, &'a Subnet>,
    by_network: HashMap<&'a str, Vec<&'a Subnet>>,
}

impl<'a> Placement<'a> {
    pub fn new(inventory: &'a Inventory) -> Self {
        let mut by_network: HashMap<&str, Vec<&Subnet>> = HashMap::new();
        for subnet in &inventory.subnets {
            by_network.entry(subnet.network_id.as_str()).or_default().push(subnet);
        }
        Self {
            vpcs: inventory.vpcs.iter().map(|v| (v.id.as_str(), v)).collect(),
            subnets: inventory.subnets.iter().map(|s| (s.id.as_str(), s)).collect(),
            by_network,
        }
    }

    /// Region a network is drawn under
    pub fn region_of(&self, vpc: &Vpc) -> String {
        vpc.region.clone().unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    /// Key for a known subnet whose network is also known
    pub fn subnet_key(&self, subnet_id: &str) -> Option<ClusterKey> {
        let subnet = self.subnets.get(subnet_id)?;
        let vpc = self.vpcs.get(subnet.network_id.as_str())?;
        Some(ClusterKey {
            region: self.region_of(vpc),
            network_id: vpc.id.clone(),
            tier: subnet.tier(),
            subnet_id: subnet.id.clone(),
        })
    }

    /// Whether a subnet exists and, when a network is given, belongs to it
    pub fn in_network(&self, subnet_id: &str, network_id: Option<&str>) -> bool {
        match (self.subnets.get(subnet_id), network_id) {
            (Some(subnet), Some(network)) => subnet.network_id == network,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// First subnet of a tier in a network, inventory order
    pub fn first_in_tier(&self, network_id: &str, tier: SubnetTier) -> Option<ClusterKey> {
        self.by_network
            .get(network_id)?
            .iter()
            .find(|s| s.tier() == tier)
            .and_then(|s| self.subnet_key(&s.id))
    }
}
