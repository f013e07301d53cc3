// Copyright (c) 2025 - Cowboy AI, Inc.
//! Diagram model: nodes, edges and the nested cluster tree
//!
//! The model is renderer-neutral. Labels hold plain text with `\n` line
//! breaks; each renderer escapes them for its own markup.

use crate::domain::{ResourceType, SubnetTier};
use crate::policy::PolicyOption;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Layout direction of the whole diagram
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum LayoutDirection {
    #[default]
    #[serde(rename = "TB")]
    #[value(name = "TB", alias = "tb", alias = "TD", alias = "td")]
    TopBottom,
    #[serde(rename = "LR")]
    #[value(name = "LR", alias = "lr")]
    LeftRight,
    #[serde(rename = "BT")]
    #[value(name = "BT", alias = "bt")]
    BottomTop,
    #[serde(rename = "RL")]
    #[value(name = "RL", alias = "rl")]
    RightLeft,
}

impl PolicyOption for LayoutDirection {
    const VARIANTS: &'static [Self] = &[
        Self::TopBottom,
        Self::LeftRight,
        Self::BottomTop,
        Self::RightLeft,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::LeftRight => "LR",
            Self::BottomTop => "BT",
            Self::RightLeft => "RL",
        }
    }

    /// Case-insensitive; `TD` is accepted for top-bottom
    fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized == "TD" {
            return Some(Self::TopBottom);
        }
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.as_str() == normalized)
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nesting level of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterLevel {
    Region,
    Network,
    Tier,
    Subnet,
}

/// Where a node is placed in the cluster tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClusterKey {
    pub region: String,
    pub network_id: String,
    pub tier: SubnetTier,
    pub subnet_id: String,
}

/// Rendered resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Markup-safe identifier, unique within the diagram
    pub id: String,
    /// Natural identifier of the resource
    pub resource_id: String,
    pub kind: ResourceType,
    pub label: String,
}

/// What an edge stands for; drives the line style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Instance-to-instance traffic allowed by a rule set
    Rule,
    /// Instance-to-database traffic allowed by a rule set
    Database,
    /// Balancer to one of its targets
    Target,
    /// Hosted zone record pointing at a balancer
    Dns,
    /// Balancer listener terminating with a certificate
    Certificate,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Database => "database",
            Self::Target => "target",
            Self::Dns => "dns",
            Self::Certificate => "certificate",
        }
    }

    /// Drawn dashed rather than solid
    pub fn is_dashed(&self) -> bool {
        matches!(self, Self::Dns | Self::Certificate)
    }

    /// Drawn thick
    pub fn is_bold(&self) -> bool {
        *self == Self::Target
    }
}

/// Directed edge between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub kind: EdgeKind,
}

/// Group of nodes and nested groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    /// Markup-safe identifier
    pub id: String,
    pub label: String,
    pub level: ClusterLevel,
    /// Node ids placed directly in this cluster
    pub nodes: Vec<String>,
    pub children: Vec<Cluster>,
}

impl Cluster {
    pub fn new(id: String, label: String, level: ClusterLevel) -> Self {
        Self {
            id,
            label,
            level,
            nodes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// No node here or in any descendant
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.children.iter().all(Cluster::is_empty)
    }

    /// This cluster and every descendant, depth first
    pub fn walk(&self) -> Vec<&Cluster> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// Complete diagram ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramGraph {
    pub title: String,
    pub direction: LayoutDirection,
    /// Every node, in creation order
    pub nodes: Vec<Node>,
    /// Node ids outside any cluster
    pub top_level: Vec<String>,
    pub clusters: Vec<Cluster>,
    pub edges: Vec<Edge>,
}

impl DiagramGraph {
    pub fn new(title: impl Into<String>, direction: LayoutDirection) -> Self {
        Self {
            title: title.into(),
            direction,
            nodes: Vec::new(),
            top_level: Vec::new(),
            clusters: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Node for a natural resource id
    pub fn node_for(&self, resource_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.resource_id == resource_id)
    }

    /// Every cluster, depth first
    pub fn all_clusters(&self) -> Vec<&Cluster> {
        self.clusters.iter().flat_map(Cluster::walk).collect()
    }

    /// Edges of one kind
    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn summary(&self) -> DiagramSummary {
        let mut nodes_by_kind = BTreeMap::new();
        for node in &self.nodes {
            *nodes_by_kind.entry(node.kind).or_insert(0) += 1;
        }
        let mut edges_by_kind = BTreeMap::new();
        for edge in &self.edges {
            *edges_by_kind.entry(edge.kind.as_str()).or_insert(0) += 1;
        }
        DiagramSummary {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            clusters: self.all_clusters().len(),
            nodes_by_kind,
            edges_by_kind,
        }
    }
}

/// Counts describing a generated diagram
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DiagramSummary {
    pub nodes: usize,
    pub edges: usize,
    pub clusters: usize,
    pub nodes_by_kind: BTreeMap<ResourceType, usize>,
    pub edges_by_kind: BTreeMap<&'static str, usize>,
}

impl fmt::Display for DiagramSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} edges, {} clusters",
            self.nodes, self.edges, self.clusters
        )
    }
}

/// Markup-safe identifier: ASCII alphanumerics kept, everything else `_`
pub fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("TB", LayoutDirection::TopBottom)]
    #[test_case("td", LayoutDirection::TopBottom)]
    #[test_case("lr", LayoutDirection::LeftRight)]
    #[test_case(" RL ", LayoutDirection::RightLeft)]
    fn test_layout_direction_parse(raw: &str, expected: LayoutDirection) {
        assert_eq!(LayoutDirection::parse(raw), Some(expected));
    }

    #[test]
    fn test_layout_direction_rejects_unknown() {
        assert_eq!(LayoutDirection::parse("up"), None);
        assert_eq!(LayoutDirection::expected(), "TB, LR, BT, RL");
    }

    #[test]
    fn test_sanitize_id() {
        assert_eq!(
            sanitize_id("arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/app/web/1"),
            "arn_aws_elasticloadbalancing_us_east_1_1_loadbalancer_app_web_1"
        );
        assert_eq!(sanitize_id("i-0abc"), "i_0abc");
    }

    #[test]
    fn test_cluster_emptiness_is_recursive() {
        let mut region = Cluster::new("r".into(), "Region".into(), ClusterLevel::Region);
        let mut network = Cluster::new("n".into(), "VPC".into(), ClusterLevel::Network);
        assert!(network.is_empty());

        network.nodes.push("ec2_i_a".into());
        region.children.push(network);
        assert!(!region.is_empty());
        assert_eq!(region.walk().len(), 2);
    }
}
