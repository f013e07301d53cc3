// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cloud-diagram
//!
//! Deterministic inventories shared by the integration tests. Every fixture
//! is built from an inventory document, the same shape the discovery layer
//! writes, so the serde mapping is exercised along the way.
//!
//! # Layout
//!
//! ```text
//! vpc-1 (us-east-1)
//! ├── sub-pub   "public-a"  presentation   i-a  [sg-a]   lb-1 → i-a
//! ├── sub-app   "app-a"     application    i-b  [sg-b]
//! └── sub-db    "db-a"      restricted     db-1 [sg-db]
//!
//! sg-b  ingress tcp/443  from sg-a
//! sg-db ingress tcp/5432 from sg-a
//! ```

#![allow(dead_code)]

use cloud_diagram::domain::Inventory;
use cloud_diagram::policy::{ConnectionPolicy, DetailLevel, DirectionFilter, FlowFilter};
use serde_json::{json, Value};

pub const FLOWS: [FlowFilter; 4] = [
    FlowFilter::None,
    FlowFilter::InterSubnet,
    FlowFilter::TierCrossing,
    FlowFilter::ExternalOnly,
];

pub const DIRECTIONS: [DirectionFilter; 3] = [
    DirectionFilter::Both,
    DirectionFilter::NorthSouth,
    DirectionFilter::EastWest,
];

pub fn inventory(document: Value) -> Inventory {
    serde_json::from_value(document).expect("fixture inventory must parse")
}

pub fn policy(flows: FlowFilter, direction: DirectionFilter, detail: DetailLevel) -> ConnectionPolicy {
    ConnectionPolicy {
        flows,
        direction,
        detail,
        ..ConnectionPolicy::default()
    }
}

fn rule(port: u16, source: &str) -> Value {
    json!({
        "protocol": "tcp",
        "from_port": port,
        "to_port": port,
        "sources": [{"type": "security_group", "value": source}]
    })
}

fn vpc() -> Value {
    json!({"vpc_id": "vpc-1", "cidr_block": "10.0.0.0/16", "region": "us-east-1", "tags": {"Name": "prod"}})
}

fn subnet(id: &str, name: &str, cidr: &str) -> Value {
    json!({"subnet_id": id, "vpc_id": "vpc-1", "cidr_block": cidr, "region": "us-east-1", "tags": {"Name": name}})
}

fn instance(id: &str, name: &str, subnet: &str, rule_set: &str, ip: &str) -> Value {
    json!({
        "instance_id": id,
        "name": name,
        "instance_type": "t3.small",
        "private_ip": ip,
        "subnet_id": subnet,
        "vpc_id": "vpc-1",
        "region": "us-east-1",
        "state": "running",
        "security_groups": [rule_set]
    })
}

/// Presentation instance `i-a` allowed to reach application instance `i-b` on tcp/443
pub fn two_tier_document() -> Value {
    json!({
        "vpcs": [vpc()],
        "subnets": [
            subnet("sub-pub", "public-a", "10.0.1.0/24"),
            subnet("sub-app", "app-a", "10.0.2.0/24")
        ],
        "instances": [
            instance("i-a", "web", "sub-pub", "sg-a", "10.0.1.10"),
            instance("i-b", "api", "sub-app", "sg-b", "10.0.2.10")
        ],
        "security_groups": {
            "sg-a": {"name": "web", "vpc_id": "vpc-1"},
            "sg-b": {"name": "api", "vpc_id": "vpc-1", "rules": {"ingress": [rule(443, "sg-a")]}}
        }
    })
}

pub fn two_tier() -> Inventory {
    inventory(two_tier_document())
}

/// Two-tier layout plus `lb-1` fronting `i-a` and `db-1` reachable from `sg-a` on tcp/5432
pub fn fronted_database_document() -> Value {
    let mut document = two_tier_document();
    document["subnets"]
        .as_array_mut()
        .expect("subnets array")
        .push(subnet("sub-db", "db-a", "10.0.3.0/24"));
    document["load_balancers"] = json!([{
        "name": "lb-1",
        "arn": "arn:aws:elasticloadbalancing:us-east-1:123456789012:loadbalancer/app/lb-1/abc",
        "type": "application",
        "scheme": "internet-facing",
        "vpc_id": "vpc-1",
        "region": "us-east-1",
        "dns_name": "lb-1-123456.us-east-1.elb.amazonaws.com",
        "ips": ["203.0.113.10", "203.0.113.11", "203.0.113.12"],
        "subnets": ["sub-pub"],
        "target_groups": [{
            "name": "web-tg",
            "port": 8080,
            "protocol": "HTTP",
            "health_check": {"port": "traffic-port", "path": "/health"},
            "targets": [{"id": "i-a", "port": 8080, "health": "healthy"}]
        }],
        "listeners": [{
            "port": 443,
            "protocol": "HTTPS",
            "certificates": ["arn:aws:acm:us-east-1:123456789012:certificate/web"]
        }]
    }]);
    document["rds_instances"] = json!([{
        "db_instance_id": "db-1",
        "engine": "postgres",
        "status": "available",
        "endpoint": "db-1.abc.us-east-1.rds.amazonaws.com",
        "port": 5432,
        "vpc_id": "vpc-1",
        "region": "us-east-1",
        "security_groups": ["sg-db"]
    }]);
    document["security_groups"]["sg-db"] = json!({
        "name": "db",
        "vpc_id": "vpc-1",
        "rules": {"ingress": [rule(5432, "sg-a")]}
    });
    document
}

pub fn fronted_database() -> Inventory {
    inventory(fronted_database_document())
}

/// Everything: balancer, database, a DNS alias to the balancer and its certificate
pub fn full_stack_document() -> Value {
    let mut document = fronted_database_document();
    document["route53_zones"] = json!([
        {
            "zone_id": "Z123",
            "name": "example.com.",
            "type": "Public",
            "records": [{
                "name": "www.example.com.",
                "type": "A",
                "values": ["lb-1-123456.us-east-1.elb.amazonaws.com"],
                "alias_target": "lb-1-123456.us-east-1.elb.amazonaws.com"
            }]
        },
        {"zone_id": "Z456", "name": "internal.example.", "type": "Private", "records": []}
    ]);
    document["certificates"] = json!([{
        "arn": "arn:aws:acm:us-east-1:123456789012:certificate/web",
        "domain": "www.example.com",
        "status": "ISSUED"
    }]);
    document
}

pub fn full_stack() -> Inventory {
    inventory(full_stack_document())
}
