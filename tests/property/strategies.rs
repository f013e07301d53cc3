// Copyright (c) 2025 - Cowboy AI, Inc.
//! Proptest strategies for inventories and display policies
//!
//! Generated inventories share one VPC and a small pool of rule sets so that
//! references between rule sets are dense enough to produce connections.

use crate::fixtures::{DIRECTIONS, FLOWS};
use cloud_diagram::domain::Inventory;
use cloud_diagram::policy::{ConnectionPolicy, DetailLevel};
use proptest::prelude::*;
use proptest::sample::{select, Index};
use serde_json::{json, Map, Value};

pub const RULE_SETS: usize = 4;

const SUBNET_NAMES: [&str; 8] = [
    "public-a", "dmz-edge", "app-1", "private-b", "db-1", "data-store", "restricted", "misc",
];

const DETAILS: [DetailLevel; 4] = [
    DetailLevel::Minimal,
    DetailLevel::Ports,
    DetailLevel::Protocols,
    DetailLevel::Full,
];

#[derive(Debug, Clone)]
struct InstanceSpec {
    subnet: Option<Index>,
    rule_sets: Vec<usize>,
}

#[derive(Debug, Clone)]
struct RuleSpec {
    owner: usize,
    egress: bool,
    protocol: &'static str,
    port: Option<i64>,
    sources: Vec<usize>,
}

fn rule_set_id(index: usize) -> String {
    format!("sg-{index}")
}

fn instance_spec() -> impl Strategy<Value = InstanceSpec> {
    (
        prop::option::weighted(0.9, any::<Index>()),
        prop::collection::vec(0..RULE_SETS, 0..3),
    )
        .prop_map(|(subnet, rule_sets)| InstanceSpec { subnet, rule_sets })
}

fn rule_spec() -> impl Strategy<Value = RuleSpec> {
    (
        0..RULE_SETS,
        any::<bool>(),
        select(vec!["tcp", "udp", "-1", "6"]),
        prop::option::of(-1i64..65536),
        prop::collection::vec(0..RULE_SETS, 0..3),
    )
        .prop_map(|(owner, egress, protocol, port, sources)| RuleSpec {
            owner,
            egress,
            protocol,
            port,
            sources,
        })
}

fn build(
    subnet_names: Vec<&'static str>,
    instances: Vec<InstanceSpec>,
    databases: Vec<Vec<usize>>,
    rules: Vec<RuleSpec>,
    targets: Vec<Index>,
) -> Inventory {
    let subnets: Vec<Value> = subnet_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "subnet_id": format!("sub-{i}"),
                "vpc_id": "vpc-1",
                "cidr_block": format!("10.0.{i}.0/24"),
                "tags": {"Name": name}
            })
        })
        .collect();

    let instance_docs: Vec<Value> = instances
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let subnet = match &spec.subnet {
                Some(index) => format!("sub-{}", index.index(subnet_names.len())),
                None => "sub-unknown".to_string(),
            };
            let groups: Vec<String> = spec.rule_sets.iter().map(|r| rule_set_id(*r)).collect();
            json!({
                "instance_id": format!("i-{i}"),
                "subnet_id": subnet,
                "vpc_id": "vpc-1",
                "private_ip": format!("10.0.0.{i}"),
                "security_groups": groups
            })
        })
        .collect();

    let database_docs: Vec<Value> = databases
        .iter()
        .enumerate()
        .map(|(i, groups)| {
            let groups: Vec<String> = groups.iter().map(|r| rule_set_id(*r)).collect();
            json!({"db_instance_id": format!("db-{i}"), "vpc_id": "vpc-1", "security_groups": groups})
        })
        .collect();

    let mut rule_sets = Map::new();
    for index in 0..RULE_SETS {
        rule_sets.insert(rule_set_id(index), json!({"rules": {"ingress": [], "egress": []}}));
    }
    for rule in &rules {
        let sources: Vec<Value> = rule
            .sources
            .iter()
            .map(|s| json!({"type": "security_group", "value": rule_set_id(*s)}))
            .collect();
        let direction = if rule.egress { "egress" } else { "ingress" };
        if let Some(list) = rule_sets[&rule_set_id(rule.owner)]["rules"][direction].as_array_mut() {
            list.push(json!({
                "protocol": rule.protocol,
                "from_port": rule.port,
                "to_port": rule.port,
                "sources": sources
            }));
        }
    }

    let target_docs: Vec<Value> = if instances.is_empty() {
        Vec::new()
    } else {
        targets
            .iter()
            .map(|t| json!({"id": format!("i-{}", t.index(instances.len()))}))
            .collect()
    };

    serde_json::from_value(json!({
        "vpcs": [{"vpc_id": "vpc-1", "cidr_block": "10.0.0.0/16", "region": "us-east-1"}],
        "subnets": subnets,
        "instances": instance_docs,
        "rds_instances": database_docs,
        "load_balancers": [{
            "name": "front",
            "vpc_id": "vpc-1",
            "subnets": ["sub-0"],
            "dns_name": "front.elb.amazonaws.com",
            "target_groups": [{"name": "tg", "port": 80, "targets": target_docs}]
        }],
        "security_groups": Value::Object(rule_sets)
    }))
    .expect("generated inventory must parse")
}

/// Inventories with dense rule-set references
pub fn inventory() -> impl Strategy<Value = Inventory> {
    (
        prop::collection::vec(select(SUBNET_NAMES.to_vec()), 1..5),
        prop::collection::vec(instance_spec(), 0..8),
        prop::collection::vec(prop::collection::vec(0..RULE_SETS, 0..3), 0..3),
        prop::collection::vec(rule_spec(), 0..10),
        prop::collection::vec(any::<Index>(), 0..3),
    )
        .prop_map(|(subnets, instances, databases, rules, targets)| {
            build(subnets, instances, databases, rules, targets)
        })
}

/// Any combination of connection policy fields
pub fn policy() -> impl Strategy<Value = ConnectionPolicy> {
    (
        select(FLOWS.to_vec()),
        select(DIRECTIONS.to_vec()),
        select(DETAILS.to_vec()),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(flows, direction, detail, filter_internal, filter_ephemeral, only_ingress)| {
                ConnectionPolicy {
                    flows,
                    direction,
                    detail,
                    filter_internal,
                    filter_ephemeral,
                    only_ingress,
                }
            },
        )
}
