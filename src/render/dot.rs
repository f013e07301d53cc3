// Copyright (c) 2025 - Cowboy AI, Inc.
//! Graphviz DOT renderer
//!
//! Produces a digraph that can be laid out with Graphviz:
//!   cloud-diagram render --format dot -o infra.dot
//!   dot -Tsvg infra.dot -o infra.svg

use crate::diagram::{Cluster, ClusterLevel, DiagramGraph, Edge, EdgeKind, Node};
use crate::domain::ResourceType;

/// Render a diagram as a DOT digraph
pub fn render(graph: &DiagramGraph) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("digraph cloud_diagram {\n");
    out.push_str(&format!("    label=\"{}\";\n", escape(&graph.title)));
    out.push_str("    labelloc=t;\n");
    out.push_str(&format!("    rankdir={};\n", graph.direction));
    out.push_str("    splines=ortho;\n");
    out.push_str("    nodesep=1.0;\n");
    out.push_str("    ranksep=1.5;\n");
    out.push_str("    bgcolor=\"white\";\n");
    out.push_str("    fontname=\"Helvetica\";\n");
    out.push_str("    node [fontname=\"Helvetica\", fontsize=10];\n");
    out.push_str("    edge [fontname=\"Helvetica\", fontsize=9];\n\n");

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

    out.push_str("}\n");
    out
}

fn push_cluster(out: &mut String, graph: &DiagramGraph, cluster: &Cluster, depth: usize) {
    let pad = "    ".repeat(depth);
    let (style, color) = match cluster.level {
        ClusterLevel::Region => ("dashed", "#666666"),
        ClusterLevel::Network => ("rounded", "#1565c0"),
        ClusterLevel::Tier => ("dotted", "#999999"),
        ClusterLevel::Subnet => ("filled", "#f5f5f5"),
    };

    out.push_str(&format!("{pad}subgraph cluster_{} {{\n", cluster.id));
    out.push_str(&format!("{pad}    label=\"{}\";\n", escape(&cluster.label)));
    let color_attr = if cluster.level == ClusterLevel::Subnet {
        "fillcolor"
    } else {
        "color"
    };
    out.push_str(&format!("{pad}    style={style};\n"));
    out.push_str(&format!("{pad}    {color_attr}=\"{color}\";\n"));
    for id in &cluster.nodes {
        if let Some(node) = graph.node(id) {
            push_node(out, node, depth + 1);
        }
    }
    for child in &cluster.children {
        push_cluster(out, graph, child, depth + 1);
    }
    out.push_str(&format!("{pad}}}\n"));
}

fn push_node(out: &mut String, node: &Node, depth: usize) {
    let (shape, fill) = match node.kind {
        ResourceType::Instance => ("box", "#ffe0b2"),
        ResourceType::LoadBalancer => ("hexagon", "#e1bee7"),
        ResourceType::Database => ("cylinder", "#bbdefb"),
        ResourceType::HostedZone => ("ellipse", "#c8e6c9"),
        ResourceType::Certificate => ("note", "#fff9c4"),
        _ => ("box", "#eeeeee"),
    };
    out.push_str(&format!(
        "{}{} [label=\"{}\", shape={shape}, style=filled, fillcolor=\"{fill}\"];\n",
        "    ".repeat(depth),
        node.id,
        escape(&node.label)
    ));
}

fn push_edge(out: &mut String, edge: &Edge) {
    let mut attrs = Vec::new();
    if !edge.label.is_empty() {
        attrs.push(format!("label=\"{}\"", escape(&edge.label)));
    }
    if edge.kind.is_dashed() {
        attrs.push("style=dashed".to_string());
    }
    if edge.kind.is_bold() {
        attrs.push("style=bold".to_string());
        attrs.push("color=\"#1565c0\"".to_string());
    }
    if edge.kind == EdgeKind::Database {
        attrs.push("color=\"#c62828\"".to_string());
    }

    if attrs.is_empty() {
        out.push_str(&format!("    {} -> {};\n", edge.from, edge.to));
    } else {
        out.push_str(&format!(
            "    {} -> {} [{}];\n",
            edge.from,
            edge.to,
            attrs.join(", ")
        ));
    }
}

/// Escape a DOT string literal; newlines become centered line breaks
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
