// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Topology Inference
//!
//! The resolver must be a pure function of inventory and policy: no
//! self-loops, nothing under `flows=none`, database reachability untouched by
//! the flow and direction filters, and identical output on every run.

use super::strategies;
use cloud_diagram::domain::{Subnet, SubnetTier};
use cloud_diagram::policy::{ConnectionPolicy, DirectionFilter, FlowFilter};
use cloud_diagram::topology::{resolve_connections, Connection, ConnectionKind};
use proptest::prelude::*;
use serde_json::json;

fn database_connections(connections: Vec<Connection>) -> Vec<Connection> {
    connections
        .into_iter()
        .filter(|c| c.kind == ConnectionKind::Database)
        .collect()
}

proptest! {
    /// Property: tier classification depends on the name alone
    #[test]
    fn prop_tier_is_deterministic(name in "\\PC{0,32}") {
        let first = SubnetTier::classify(&name);
        prop_assert_eq!(first, SubnetTier::classify(&name));

        let subnet: Subnet = serde_json::from_value(json!({
            "subnet_id": "sub-1",
            "vpc_id": "vpc-1",
            "tags": {"Name": name}
        })).unwrap();
        prop_assert_eq!(subnet.tier(), first);
    }

    /// Property: letter case never changes the tier
    #[test]
    fn prop_tier_ignores_case(name in "[a-zA-Z0-9-]{0,24}") {
        prop_assert_eq!(
            SubnetTier::classify(&name.to_uppercase()),
            SubnetTier::classify(&name.to_lowercase())
        );
    }

    /// Property: flows=none yields nothing, whatever the rule sets say
    #[test]
    fn prop_flows_none_is_empty(
        inventory in strategies::inventory(),
        policy in strategies::policy(),
    ) {
        let policy = ConnectionPolicy { flows: FlowFilter::None, ..policy };
        prop_assert!(resolve_connections(&inventory, policy).is_empty());
    }

    /// Property: no resource is connected to itself
    #[test]
    fn prop_no_self_loops(
        inventory in strategies::inventory(),
        policy in strategies::policy(),
    ) {
        for connection in resolve_connections(&inventory, policy) {
            prop_assert_ne!(&connection.from_id, &connection.to_id);
        }
    }

    /// Property: database connections end at databases and ignore flow,
    /// direction and internal filters
    #[test]
    fn prop_database_connections_survive_filters(
        inventory in strategies::inventory(),
        policy in strategies::policy(),
    ) {
        prop_assume!(policy.flows != FlowFilter::None);

        let filtered = database_connections(resolve_connections(&inventory, policy));
        for connection in &filtered {
            prop_assert!(inventory.database(&connection.to_id).is_some());
            prop_assert!(connection.flow_type.is_none());
        }

        let unfiltered = ConnectionPolicy {
            flows: FlowFilter::InterSubnet,
            direction: DirectionFilter::Both,
            filter_internal: false,
            ..policy
        };
        prop_assert_eq!(
            filtered,
            database_connections(resolve_connections(&inventory, unfiltered))
        );
    }

    /// Property: resolving twice gives byte-identical ordered output
    #[test]
    fn prop_resolution_is_idempotent(
        inventory in strategies::inventory(),
        policy in strategies::policy(),
    ) {
        let first = resolve_connections(&inventory, policy);
        let second = resolve_connections(&inventory, policy);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        prop_assert_eq!(first, second);
    }

    /// Property: every connection is unique
    #[test]
    fn prop_connections_are_deduplicated(
        inventory in strategies::inventory(),
        policy in strategies::policy(),
    ) {
        let connections = resolve_connections(&inventory, policy);
        let unique: std::collections::HashSet<&Connection> = connections.iter().collect();
        prop_assert_eq!(unique.len(), connections.len());
    }
}
