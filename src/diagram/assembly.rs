// Copyright (c) 2025 - Cowboy AI, Inc.
//! Diagram Assembly
//!
//! Builds the renderer-neutral [`DiagramGraph`] from an inventory and a
//! [`DiagramContext`].
//!
//! # Cluster Tree
//!
//! ```text
//! Region: EU-WEST-1                       regions sorted ascending
//! └── VPC: prod (10.0.0.0/16)             inventory order
//!     ├── Presentation Tier               fixed tier order
//!     │   └── Public Subnet public-a      inventory order
//!     │       ├── lb_...                  balancers, instances, databases
//!     │       └── ec2_...
//!     ├── Application Tier
//!     └── Restricted Tier
//! ```
//!
//! Hosted zones and certificates sit outside every cluster. Clusters with
//! nothing rendered inside are left out at every level.
//!
//! # Edges
//!
//! Zone → balancer, balancer → target, balancer → certificate, then the
//! resolved rule-set connections. An edge whose endpoint was never created
//! (filtered, unplaceable or unknown) is dropped.

use super::context::DiagramContext;
use super::handlers::{Placement, ResourceHandler};
use super::model::{sanitize_id, Cluster, ClusterKey, ClusterLevel, DiagramGraph, Edge, Node};
use crate::domain::{Instance, Inventory, LoadBalancer, ResourceRef, SubnetTier};
use crate::topology::labels::{dns_label, listener_label, target_group_label};
use crate::topology::resolve_connections;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// Natural resource id to node id, with node and cluster ids kept distinct
#[derive(Debug, Default)]
struct NodeMap {
    by_resource: HashMap<String, String>,
    taken: HashSet<String>,
}

impl NodeMap {
    /// Register a node, renaming its id if another resource sanitized to it
    fn insert(&mut self, mut node: Node) -> Option<Node> {
        if self.by_resource.contains_key(&node.resource_id) {
            return None;
        }
        node.id = self.claim(std::mem::take(&mut node.id));
        self.by_resource.insert(node.resource_id.clone(), node.id.clone());
        Some(node)
    }

    /// Reserve `id`, suffixing `_2`, `_3`, ... when it is already taken
    fn claim(&mut self, id: String) -> String {
        let id = if self.taken.contains(&id) {
            let mut n = 2;
            while self.taken.contains(&format!("{id}_{n}")) {
                n += 1;
            }
            format!("{id}_{n}")
        } else {
            id
        };
        self.taken.insert(id.clone());
        id
    }

    /// Claim ids for a cluster tree, parents before children
    fn claim_tree(&mut self, cluster: &mut Cluster) {
        cluster.id = self.claim(std::mem::take(&mut cluster.id));
        for child in &mut cluster.children {
            self.claim_tree(child);
        }
    }

    fn get(&self, resource_id: &str) -> Option<&str> {
        self.by_resource.get(resource_id).map(String::as_str)
    }
}

/// Assembler bound to one inventory and one context
pub struct DiagramAssembler<'a> {
    inventory: &'a Inventory,
    ctx: &'a DiagramContext,
    placement: Placement<'a>,
    graph: DiagramGraph,
    node_map: HashMap<String, Node>,
    ids: NodeMap,
    placed: HashMap<String, Vec<String>>,
    edges: HashSet<Edge>,
}

impl<'a> DiagramAssembler<'a> {
    pub fn new(inventory: &'a Inventory, ctx: &'a DiagramContext) -> Self {
        Self {
            inventory,
            ctx,
            placement: Placement::new(inventory),
            graph: DiagramGraph::new(ctx.title.clone(), ctx.direction),
            node_map: HashMap::new(),
            ids: NodeMap::default(),
            placed: HashMap::new(),
            edges: HashSet::new(),
        }
    }

    /// Assemble the complete diagram
    pub fn assemble(mut self) -> DiagramGraph {
        let inventory = self.inventory;
        for zone in &inventory.hosted_zones {
            self.add_node(ResourceRef::HostedZone(zone), None);
        }

        let instances = self.placeable_instances();
        let rendered_ids: HashSet<&str> = instances.iter().map(|(i, _)| i.id.as_str()).collect();
        let balancers = self
            .ctx
            .load_balancers
            .visible(&inventory.load_balancers, &rendered_ids);

        let mut drawn_balancers = Vec::new();
        for lb in balancers {
            let resource = ResourceRef::LoadBalancer(lb);
            if !ResourceHandler::LoadBalancer.should_render(resource, self.ctx) {
                continue;
            }
            match ResourceHandler::LoadBalancer.cluster_key(resource, &self.placement) {
                Some(key) => {
                    self.add_node(resource, Some(key));
                    drawn_balancers.push(lb);
                }
                None => debug!(load_balancer = %lb.name, "Omitting load balancer without a placeable subnet"),
            }
        }

        for (instance, key) in instances {
            self.add_node(ResourceRef::Instance(instance), Some(key));
        }

        for db in &inventory.databases {
            let resource = ResourceRef::Database(db);
            if !ResourceHandler::Database.should_render(resource, self.ctx) {
                continue;
            }
            match ResourceHandler::Database.cluster_key(resource, &self.placement) {
                Some(key) => self.add_node(resource, Some(key)),
                None => debug!(database = %db.id, "Omitting database without a restricted subnet"),
            }
        }

        self.build_clusters();

        self.add_dns_edges(&drawn_balancers);
        self.add_target_edges(&drawn_balancers);
        self.add_certificate_edges(&drawn_balancers);
        self.add_rule_set_edges();

        let graph = self.graph;
        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Assembled diagram"
        );
        graph
    }

    fn placeable_instances(&self) -> Vec<(&'a Instance, ClusterKey)> {
        let mut out = Vec::new();
        for instance in &self.inventory.instances {
            let resource = ResourceRef::Instance(instance);
            if !ResourceHandler::Instance.should_render(resource, self.ctx) {
                debug!(instance = %instance.id, "Instance filtered out");
                continue;
            }
            match ResourceHandler::Instance.cluster_key(resource, &self.placement) {
                Some(key) => out.push((instance, key)),
                None => debug!(instance = %instance.id, "Omitting instance without a known subnet"),
            }
        }
        out
    }

    fn add_node(&mut self, resource: ResourceRef<'_>, key: Option<ClusterKey>) {
        let Some(handler) = ResourceHandler::for_resource(&resource) else {
            return;
        };
        if !handler.should_render(resource, self.ctx) {
            return;
        }
        let Some(node) = handler.create_node(resource).and_then(|n| self.ids.insert(n)) else {
            return;
        };
        match key {
            Some(key) => self.placed.entry(key.subnet_id).or_default().push(node.id.clone()),
            None => self.graph.top_level.push(node.id.clone()),
        }
        self.node_map.insert(node.resource_id.clone(), node.clone());
        self.graph.nodes.push(node);
    }

    fn build_clusters(&mut self) {
        let mut regions = BTreeSet::new();
        for vpc in &self.inventory.vpcs {
            regions.insert(self.placement.region_of(vpc));
        }

        for region in regions {
            let mut region_cluster = Cluster::new(
                format!("region_{}", sanitize_id(&region)),
                format!("Region: {}", region.to_uppercase()),
                ClusterLevel::Region,
            );

            for vpc in self
                .inventory
                .vpcs
                .iter()
                .filter(|v| self.placement.region_of(v) == region)
            {
                let label = if vpc.cidr_block.is_empty() {
                    format!("VPC: {}", vpc.name())
                } else {
                    format!("VPC: {}\n({})", vpc.name(), vpc.cidr_block)
                };
                let mut network = Cluster::new(
                    format!("vpc_{}", sanitize_id(&vpc.id)),
                    label,
                    ClusterLevel::Network,
                );

                for tier in SubnetTier::ORDERED {
                    let mut tier_cluster = Cluster::new(
                        format!("tier_{}_{}", sanitize_id(&vpc.id), tier.as_str()),
                        tier.cluster_label().to_string(),
                        ClusterLevel::Tier,
                    );
                    for subnet in self
                        .inventory
                        .subnets
                        .iter()
                        .filter(|s| s.network_id == vpc.id && s.tier() == tier)
                    {
                        let Some(nodes) = self.placed.get(&subnet.id).filter(|n| !n.is_empty())
                        else {
                            continue;
                        };
                        let mut label = format!("{}\n{}", tier.subnet_label(), subnet.name());
                        if !subnet.cidr_block.is_empty() {
                            label.push_str(&format!("\n({})", subnet.cidr_block));
                        }
                        let mut subnet_cluster = Cluster::new(
                            format!("subnet_{}", sanitize_id(&subnet.id)),
                            label,
                            ClusterLevel::Subnet,
                        );
                        subnet_cluster.nodes = nodes.clone();
                        tier_cluster.children.push(subnet_cluster);
                    }
                    if !tier_cluster.is_empty() {
                        network.children.push(tier_cluster);
                    }
                }
                if !network.is_empty() {
                    region_cluster.children.push(network);
                }
            }
            if !region_cluster.is_empty() {
                self.ids.claim_tree(&mut region_cluster);
                self.graph.clusters.push(region_cluster);
            }
        }
    }

    /// Connect two resources through the source's handler
    fn connect(&mut self, handler: ResourceHandler, from_id: &str, to_id: &str, label: String) {
        let (Some(from), Some(to)) = (self.node_map.get(from_id), self.node_map.get(to_id)) else {
            debug!(from = from_id, to = to_id, "Dropping edge with a missing endpoint");
            return;
        };
        let Some(edge) = handler.create_connection(from, to, label) else {
            return;
        };
        if self.edges.insert(edge.clone()) {
            self.graph.edges.push(edge);
        }
    }

    fn add_dns_edges(&mut self, balancers: &[&LoadBalancer]) {
        let inventory = self.inventory;
        for zone in &inventory.hosted_zones {
            if self.ids.get(&zone.zone_id).is_none() {
                continue;
            }
            for record in &zone.records {
                for value in &record.values {
                    for lb in balancers {
                        if lb.dns_name.is_empty() || !value.contains(lb.dns_name.as_str()) {
                            continue;
                        }
                        let label = dns_label(record, &lb.dns_name);
                        self.connect(ResourceHandler::HostedZone, &zone.zone_id, lb.id(), label);
                    }
                }
            }
        }
    }

    fn add_target_edges(&mut self, balancers: &[&LoadBalancer]) {
        let policy = self.ctx.load_balancers;
        for lb in balancers {
            for target_group in &lb.target_groups {
                let label = target_group_label(target_group, policy.detail);
                for target in &target_group.targets {
                    if !policy.counts_target(target) {
                        debug!(target = %target.id, health = target.health(), "Skipping unhealthy target");
                        continue;
                    }
                    self.connect(ResourceHandler::LoadBalancer, lb.id(), &target.id, label.clone());
                }
            }
        }
    }

    fn add_certificate_edges(&mut self, balancers: &[&LoadBalancer]) {
        let inventory = self.inventory;
        for lb in balancers {
            for listener in &lb.listeners {
                for arn in &listener.certificates {
                    if self.ids.get(arn).is_none() {
                        let Some(cert) = inventory.certificates.iter().find(|c| &c.arn == arn) else {
                            debug!(certificate = %arn, "Listener references an unknown certificate");
                            continue;
                        };
                        self.add_node(ResourceRef::Certificate(cert), None);
                    }
                    self.connect(
                        ResourceHandler::LoadBalancer,
                        lb.id(),
                        arn,
                        listener_label(listener),
                    );
                }
            }
        }
    }

    fn add_rule_set_edges(&mut self) {
        for connection in resolve_connections(self.inventory, self.ctx.connections) {
            self.connect(
                ResourceHandler::Instance,
                &connection.from_id,
                &connection.to_id,
                connection.label,
            );
        }
    }
}

/// Assemble a diagram for an inventory under a context
pub fn assemble_diagram(inventory: &Inventory, ctx: &DiagramContext) -> DiagramGraph {
    DiagramAssembler::new(inventory, ctx).assemble()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::EdgeKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn inventory() -> Inventory {
        serde_json::from_value(json!({
            "vpcs": [
                {"vpc_id": "vpc-1", "cidr_block": "10.0.0.0/16", "region": "us-west-2", "tags": {"Name": "prod"}},
                {"vpc_id": "vpc-2", "cidr_block": "10.1.0.0/16", "region": "eu-west-1"}
            ],
            "subnets": [
                {"subnet_id": "sub-data", "vpc_id": "vpc-1", "cidr_block": "10.0.3.0/24", "tags": {"Name": "data-a"}},
                {"subnet_id": "sub-pub", "vpc_id": "vpc-1", "cidr_block": "10.0.1.0/24", "tags": {"Name": "public-a"}},
                {"subnet_id": "sub-app", "vpc_id": "vpc-1", "cidr_block": "10.0.2.0/24", "tags": {"Name": "app-a"}},
                {"subnet_id": "sub-empty", "vpc_id": "vpc-1", "tags": {"Name": "app-b"}}
            ],
            "instances": [
                {"instance_id": "i-a", "subnet_id": "sub-pub", "vpc_id": "vpc-1", "security_groups": ["sg-web"]},
                {"instance_id": "i-b", "subnet_id": "sub-app", "vpc_id": "vpc-1", "security_groups": ["sg-app"]},
                {"instance_id": "i-gone", "subnet_id": "sub-app", "state": "terminated", "security_groups": ["sg-app"]}
            ],
            "load_balancers": [{
                "name": "web", "arn": "arn:lb/web", "vpc_id": "vpc-1", "subnets": ["sub-pub"],
                "dns_name": "web-123.elb.amazonaws.com",
                "target_groups": [{"name": "tg", "port": 80, "targets": [{"id": "i-a"}, {"id": "i-gone"}]}],
                "listeners": [{"port": 443, "protocol": "HTTPS", "certificates": ["arn:cert/1", "arn:cert/missing"]}]
            }],
            "rds_instances": [{"db_instance_id": "db-1", "vpc_id": "vpc-1", "security_groups": ["sg-db"]}],
            "security_groups": {
                "sg-app": {"rules": {"ingress": [{"protocol": "tcp", "from_port": 8080, "to_port": 8080,
                    "sources": [{"type": "security_group", "value": "sg-web"}]}]}},
                "sg-db": {"rules": {"ingress": [{"protocol": "tcp", "from_port": 5432, "to_port": 5432,
                    "sources": [{"type": "security_group", "value": "sg-app"}]}]}}
            },
            "route53_zones": [{"zone_id": "Z1", "name": "example.com.", "records": [
                {"name": "www.example.com.", "type": "A", "values": ["web-123.elb.amazonaws.com"], "alias_target": "web"}
            ]}],
            "certificates": [{"arn": "arn:cert/1", "domain": "example.com", "status": "ISSUED"}]
        }))
        .unwrap()
    }

    fn labels(clusters: &[Cluster]) -> Vec<String> {
        clusters.iter().map(|c| c.label.clone()).collect()
    }

    #[test]
    fn test_cluster_tree_order_and_pruning() {
        let inv = inventory();
        let graph = assemble_diagram(&inv, &DiagramContext::default());

        // vpc-2 has nothing rendered
        assert_eq!(labels(&graph.clusters), vec!["Region: US-WEST-2"]);
        let network = &graph.clusters[0].children[0];
        assert_eq!(network.label, "VPC: prod\n(10.0.0.0/16)");
        assert_eq!(
            labels(&network.children),
            vec!["Presentation Tier", "Application Tier", "Restricted Tier"]
        );

        let app_tier = &network.children[1];
        assert_eq!(app_tier.children.len(), 1, "empty subnet omitted");
        assert_eq!(app_tier.children[0].label, "Application Subnet\napp-a\n(10.0.2.0/24)");

        let public = &network.children[0].children[0];
        assert_eq!(public.nodes, vec!["lb_arn_lb_web", "ec2_i_a"]);
    }

    #[test]
    fn test_top_level_nodes_and_edges() {
        let inv = inventory();
        let graph = assemble_diagram(&inv, &DiagramContext::default());

        assert_eq!(graph.top_level, vec!["zone_Z1", "cert_arn_cert_1"]);

        let dns: Vec<&Edge> = graph.edges_of(EdgeKind::Dns).collect();
        assert_eq!(dns.len(), 1);
        assert_eq!(dns[0].label, "ALIAS → web-123");

        // Terminated target is not a node, so its edge is dropped
        let targets: Vec<&Edge> = graph.edges_of(EdgeKind::Target).collect();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].to, "ec2_i_a");
        assert_eq!(targets[0].label, "80");

        let certs: Vec<&Edge> = graph.edges_of(EdgeKind::Certificate).collect();
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].label, "443/https");
    }

    #[test]
    fn test_rule_set_edges() {
        let inv = inventory();

        // i-a sits behind the balancer, so its flows classify as external
        let graph = assemble_diagram(&inv, &DiagramContext::default());
        assert_eq!(graph.edges_of(EdgeKind::Rule).count(), 0);

        let mut ctx = DiagramContext::default();
        ctx.connections.flows = crate::policy::FlowFilter::ExternalOnly;
        let graph = assemble_diagram(&inv, &ctx);

        let rules: Vec<(&str, &str, &str)> = graph
            .edges_of(EdgeKind::Rule)
            .map(|e| (e.from.as_str(), e.to.as_str(), e.label.as_str()))
            .collect();
        assert_eq!(rules, vec![("ec2_i_a", "ec2_i_b", "8080")]);

        let db: Vec<&Edge> = graph.edges_of(EdgeKind::Database).collect();
        assert_eq!(db.len(), 1);
        assert_eq!(db[0].from, "ec2_i_b");
        assert_eq!(db[0].to, "rds_db_1");
    }

    #[test]
    fn test_no_load_balancers_when_display_none() {
        let inv = inventory();
        let mut ctx = DiagramContext::default();
        ctx.load_balancers.display = crate::policy::LbDisplay::None;
        let graph = assemble_diagram(&inv, &ctx);

        assert!(graph.node_for("arn:lb/web").is_none());
        assert_eq!(graph.edges_of(EdgeKind::Dns).count(), 0);
        assert_eq!(graph.edges_of(EdgeKind::Certificate).count(), 0);
        assert_eq!(graph.top_level, vec!["zone_Z1"]);
    }

    #[test]
    fn test_node_id_collisions_are_renamed() {
        let mut ids = NodeMap::default();
        let node = |resource_id: &str| Node {
            id: format!("ec2_{}", sanitize_id(resource_id)),
            resource_id: resource_id.to_string(),
            kind: crate::domain::ResourceType::Instance,
            label: String::new(),
        };
        assert_eq!(ids.insert(node("i-a")).unwrap().id, "ec2_i_a");
        assert_eq!(ids.insert(node("i_a")).unwrap().id, "ec2_i_a_2");
        assert!(ids.insert(node("i-a")).is_none());
        assert_eq!(ids.get("i_a"), Some("ec2_i_a_2"));
    }
}
