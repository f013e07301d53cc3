// Copyright (c) 2025 - Cowboy AI, Inc.
//! Mermaid flowchart renderer
//!
//! Every `subgraph` line is indented one level deeper than its parent and its
//! closing `end` sits at the same indent, which the syntax checker relies on
//! to localize an unbalanced block.

use crate::diagram::{Cluster, DiagramGraph, Edge, EdgeKind, Node};
use crate::domain::ResourceType;

const INDENT: &str = "    ";

/// Render a diagram as Mermaid markup
pub fn render(graph: &DiagramGraph) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&format!("graph {}\n", graph.direction));

    for id in &graph.top_level {
        if let Some(node) = graph.node(id) {
            push_node(&mut out, node, 1);
        }
    }

    for cluster in &graph.clusters {
        push_cluster(&mut out, graph, cluster, 1);
    }

    if !graph.edges.is_empty() {
        out.push('\n');
        for edge in &graph.edges {
            push_edge(&mut out, edge);
        }
    }

    out
}

/// Markdown document embedding the markup under a title heading
pub fn to_markdown(title: &str, markup: &str) -> String {
    let mut out = format!("# {title}\n\n```mermaid\n{markup}");
    if !markup.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```\n");
    out
}

fn push_cluster(out: &mut String, graph: &DiagramGraph, cluster: &Cluster, depth: usize) {
    let pad = INDENT.repeat(depth);
    out.push_str(&format!(
        "{pad}subgraph {}[\"{}\"]\n",
        cluster.id,
        escape(&cluster.label)
    ));
    for id in &cluster.nodes {
        if let Some(node) = graph.node(id) {
            push_node(out, node, depth + 1);
        }
    }
    for child in &cluster.children {
        push_cluster(out, graph, child, depth + 1);
    }
    out.push_str(&format!("{pad}end\n"));
}

fn push_node(out: &mut String, node: &Node, depth: usize) {
    let (open, close) = shape(node.kind);
    out.push_str(&format!(
        "{}{}{open}\"{}\"{close}\n",
        INDENT.repeat(depth),
        node.id,
        escape(&node.label)
    ));
}

fn push_edge(out: &mut String, edge: &Edge) {
    let arrow = match edge.kind {
        EdgeKind::Rule | EdgeKind::Database => "-->",
        EdgeKind::Target => "==>",
        EdgeKind::Dns | EdgeKind::Certificate => "-.->",
    };
    if edge.label.is_empty() {
        out.push_str(&format!("{INDENT}{} {arrow} {}\n", edge.from, edge.to));
    } else {
        out.push_str(&format!(
            "{INDENT}{} {arrow}|\"{}\"| {}\n",
            edge.from,
            escape(&edge.label),
            edge.to
        ));
    }
}

fn shape(kind: ResourceType) -> (&'static str, &'static str) {
    match kind {
        ResourceType::LoadBalancer => ("{{", "}}"),
        ResourceType::Database => ("[(", ")]"),
        ResourceType::HostedZone => ("([", "])"),
        ResourceType::Certificate => ("[/", "/]"),
        _ => ("[", "]"),
    }
}

/// Escape a label for a quoted Mermaid string
fn escape(s: &str) -> String {
    s.replace('"', "#quot;").replace('\n', "<br/>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{ClusterLevel, LayoutDirection};
    use pretty_assertions::assert_eq;

    fn graph() -> DiagramGraph {
        let mut graph = DiagramGraph::new("Test", LayoutDirection::LeftRight);
        graph.nodes.push(Node {
            id: "zone_Z1".into(),
            resource_id: "Z1".into(),
            kind: ResourceType::HostedZone,
            label: "example.com".into(),
        });
        graph.nodes.push(Node {
            id: "ec2_i_a".into(),
            resource_id: "i-a".into(),
            kind: ResourceType::Instance,
            label: "web\n10.0.1.5".into(),
        });
        graph.top_level.push("zone_Z1".into());

        let mut subnet = Cluster::new("subnet_a".into(), "Public Subnet\n\"a\"".into(), ClusterLevel::Subnet);
        subnet.nodes.push("ec2_i_a".into());
        let mut region = Cluster::new("region_x".into(), "Region: X".into(), ClusterLevel::Region);
        region.children.push(subnet);
        graph.clusters.push(region);

        graph.edges.push(Edge {
            from: "zone_Z1".into(),
            to: "ec2_i_a".into(),
            label: String::new(),
            kind: EdgeKind::Dns,
        });
        graph.edges.push(Edge {
            from: "ec2_i_a".into(),
            to: "zone_Z1".into(),
            label: "443".into(),
            kind: EdgeKind::Rule,
        });
        graph
    }

    #[test]
    fn test_render_layout() {
        let markup = render(&graph());
        let expected = concat!(
            "graph LR\n",
            "    zone_Z1([\"example.com\"])\n",
            "    subgraph region_x[\"Region: X\"]\n",
            "        subgraph subnet_a[\"Public Subnet<br/>#quot;a#quot;\"]\n",
            "            ec2_i_a[\"web<br/>10.0.1.5\"]\n",
            "        end\n",
            "    end\n",
            "\n",
            "    zone_Z1 -.-> ec2_i_a\n",
            "    ec2_i_a -->|\"443\"| zone_Z1\n",
        );
        assert_eq!(markup, expected);
    }

    #[test]
    fn test_markdown_wrapper() {
        let doc = to_markdown("Prod", "graph TB\n");
        assert_eq!(doc, "# Prod\n\n```mermaid\ngraph TB\n```\n");
    }

    #[test]
    fn test_empty_graph_is_just_the_directive() {
        let graph = DiagramGraph::new("Empty", LayoutDirection::TopBottom);
        assert_eq!(render(&graph), "graph TB\n");
    }
}
