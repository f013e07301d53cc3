// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connection Resolver
//!
//! Turns firewall rule sets into directed resource-to-resource connections.
//!
//! # Algorithm
//!
//! ```text
//! rule set R (scanned)         rule r in R.ingress (+ R.egress)
//!   members(R) = {to...}         source: rule set S
//!                                  members(S) = {from...}
//!
//!   for from in members(S):
//!     for to in members(R), to != from:
//!       classify(from, to) ─ policy gate ─> Connection{kind: instance}
//!     for db in db_members(R):
//!       Connection{kind: database}        (no flow/direction gate)
//! ```
//!
//! Rule sets, rules, sources and members are all walked in inventory order,
//! so identical inputs always yield an identical connection list. Duplicate
//! connections (same endpoints, kind and label) keep their first position.

use super::classifier::{FlowType, TopologyClassifier, TrafficDirection};
use super::labels::rule_label;
use crate::domain::{Instance, Inventory, Rule};
use crate::policy::ConnectionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// What a connection terminates at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Instance,
    Database,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Database => write!(f, "database"),
        }
    }
}

/// Directed, labeled connection between two inventory resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from_id: String,
    pub to_id: String,
    pub label: String,
    pub kind: ConnectionKind,
    /// Absent for database connections, which are never classified
    pub flow_type: Option<FlowType>,
    pub direction: TrafficDirection,
}

/// Resolver bound to one inventory and one policy
pub struct ConnectionResolver<'a> {
    inventory: &'a Inventory,
    policy: ConnectionPolicy,
    classifier: TopologyClassifier<'a>,
    instance_members: HashMap<&'a str, Vec<&'a Instance>>,
    database_members: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> ConnectionResolver<'a> {
    pub fn new(inventory: &'a Inventory, policy: ConnectionPolicy) -> Self {
        let mut instance_members: HashMap<&str, Vec<&Instance>> = HashMap::new();
        for instance in &inventory.instances {
            for rule_set in &instance.security_groups {
                instance_members.entry(rule_set.as_str()).or_default().push(instance);
            }
        }

        let mut database_members: HashMap<&str, Vec<&str>> = HashMap::new();
        for database in &inventory.databases {
            for rule_set in &database.security_groups {
                database_members
                    .entry(rule_set.as_str())
                    .or_default()
                    .push(database.id.as_str());
            }
        }

        Self {
            inventory,
            policy,
            classifier: TopologyClassifier::new(&inventory.subnets, &inventory.load_balancers),
            instance_members,
            database_members,
        }
    }

    pub fn classifier(&self) -> &TopologyClassifier<'a> {
        &self.classifier
    }

    /// Instances that are members of a rule set
    pub fn members(&self, rule_set_id: &str) -> &[&'a Instance] {
        self.instance_members
            .get(rule_set_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Databases that are members of a rule set
    pub fn database_members(&self, rule_set_id: &str) -> &[&'a str] {
        self.database_members
            .get(rule_set_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve every connection the policy admits
    pub fn resolve(&self) -> Vec<Connection> {
        if !self.policy.is_enabled() {
            return Vec::new();
        }

        let mut connections = Vec::new();
        let mut seen = HashSet::new();

        for rule_set in &self.inventory.rule_sets {
            for direction in self.policy.rule_directions() {
                for rule in rule_set.rules(*direction) {
                    if self.policy.filter_ephemeral && rule.is_ephemeral() {
                        debug!(rule_set = %rule_set.id, "Skipping ephemeral port rule");
                        continue;
                    }
                    for source in rule.referenced_rule_sets() {
                        self.resolve_rule(rule, source, &rule_set.id, &mut |connection| {
                            if seen.insert(connection.clone()) {
                                connections.push(connection);
                            }
                        });
                    }
                }
            }
        }

        debug!(count = connections.len(), "Resolved rule-set connections");
        connections
    }

    fn resolve_rule(
        &self,
        rule: &Rule,
        source_id: &str,
        scanned_id: &str,
        emit: &mut impl FnMut(Connection),
    ) {
        let label = rule_label(rule, self.policy.detail);
        let targets = self.members(scanned_id);
        let databases = self.database_members(scanned_id);

        for from in self.members(source_id) {
            for to in targets {
                if from.id == to.id {
                    continue;
                }
                let classification = self.classifier.classify(from, to);
                if !self.policy.shows(&classification) {
                    continue;
                }
                emit(Connection {
                    from_id: from.id.clone(),
                    to_id: to.id.clone(),
                    label: label.clone(),
                    kind: ConnectionKind::Instance,
                    flow_type: Some(classification.flow_type),
                    direction: classification.direction,
                });
            }

            for database_id in databases {
                if from.id == *database_id {
                    continue;
                }
                emit(Connection {
                    from_id: from.id.clone(),
                    to_id: (*database_id).to_string(),
                    label: label.clone(),
                    kind: ConnectionKind::Database,
                    flow_type: None,
                    direction: TrafficDirection::NorthSouth,
                });
            }
        }
    }
}

/// Resolve connections for an inventory under a policy
pub fn resolve_connections(inventory: &Inventory, policy: ConnectionPolicy) -> Vec<Connection> {
    ConnectionResolver::new(inventory, policy).resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DetailLevel, DirectionFilter, FlowFilter};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn inventory(rule_sets: serde_json::Value) -> Inventory {
        serde_json::from_value(json!({
            "subnets": [
                {"subnet_id": "sub-pub", "vpc_id": "vpc-1", "tags": {"Name": "public-a"}},
                {"subnet_id": "sub-app", "vpc_id": "vpc-1", "tags": {"Name": "app-a"}}
            ],
            "instances": [
                {"instance_id": "i-a", "subnet_id": "sub-pub", "security_groups": ["sg-web"]},
                {"instance_id": "i-b", "subnet_id": "sub-app", "security_groups": ["sg-app"]},
                {"instance_id": "i-c", "subnet_id": "sub-app", "security_groups": ["sg-app"]}
            ],
            "security_groups": rule_sets
        }))
        .unwrap()
    }

    fn https_from(source: &str) -> serde_json::Value {
        json!({
            "protocol": "tcp", "from_port": 443, "to_port": 443,
            "sources": [{"type": "security_group", "value": source}]
        })
    }

    #[test]
    fn test_membership_indexes() {
        let inv = inventory(json!({}));
        let resolver = ConnectionResolver::new(&inv, ConnectionPolicy::default());
        let ids: Vec<&str> = resolver.members("sg-app").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i-b", "i-c"]);
        assert!(resolver.members("sg-none").is_empty());
        assert!(resolver.database_members("sg-app").is_empty());
    }

    #[test]
    fn test_self_referencing_rule_set_skips_self_loops() {
        let inv = inventory(json!({
            "sg-app": {"rules": {"ingress": [https_from("sg-app")]}}
        }));
        let policy = ConnectionPolicy {
            flows: FlowFilter::InterSubnet,
            ..ConnectionPolicy::default()
        };
        // i-b and i-c share a subnet: intra-subnet is outside inter-subnet
        assert!(resolve_connections(&inv, policy).is_empty());

        let external = ConnectionPolicy {
            flows: FlowFilter::ExternalOnly,
            ..policy
        };
        assert!(resolve_connections(&inv, external).is_empty());
    }

    #[test]
    fn test_egress_rules_scanned_unless_only_ingress() {
        let inv = inventory(json!({
            "sg-app": {"rules": {"egress": [https_from("sg-web")]}}
        }));
        let policy = ConnectionPolicy::default();
        let found = resolve_connections(&inv, policy);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].from_id, "i-a");
        assert_eq!(found[0].to_id, "i-b");
        assert_eq!(found[1].to_id, "i-c");

        let ingress_only = ConnectionPolicy {
            only_ingress: true,
            ..policy
        };
        assert!(resolve_connections(&inv, ingress_only).is_empty());
    }

    #[test]
    fn test_duplicate_rules_produce_one_connection() {
        let inv = inventory(json!({
            "sg-app": {"rules": {"ingress": [https_from("sg-web"), https_from("sg-web")]}}
        }));
        let found = resolve_connections(&inv, ConnectionPolicy::default());
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_direction_filter_applies() {
        let inv = inventory(json!({
            "sg-app": {"rules": {"ingress": [https_from("sg-web")]}}
        }));
        let policy = ConnectionPolicy {
            direction: DirectionFilter::EastWest,
            detail: DetailLevel::Full,
            ..ConnectionPolicy::default()
        };
        assert!(resolve_connections(&inv, policy).is_empty());
    }

    #[test]
    fn test_cidr_sources_never_connect() {
        let inv = inventory(json!({
            "sg-app": {"rules": {"ingress": [{
                "protocol": "tcp", "from_port": 22, "to_port": 22,
                "sources": [{"type": "cidr", "value": "10.0.0.0/8"}]
            }]}}
        }));
        assert!(resolve_connections(&inv, ConnectionPolicy::default()).is_empty());
    }
}
