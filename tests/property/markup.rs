// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Rendered Markup
//!
//! Every diagram renders to balanced markup, and the checker pins a removed
//! `end` on the `subgraph` it belonged to.

use super::strategies;
use cloud_diagram::diagram::{assemble_diagram, DiagramContext};
use cloud_diagram::render::{mermaid, validate_markup};
use proptest::prelude::*;

/// `(subgraph line, end line)` pairs, 1-based
fn block_pairs(markup: &str) -> Vec<(usize, usize)> {
    let mut open = Vec::new();
    let mut pairs = Vec::new();
    for (i, line) in markup.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("subgraph ") {
            open.push(i + 1);
        } else if trimmed == "end" {
            if let Some(opened) = open.pop() {
                pairs.push((opened, i + 1));
            }
        }
    }
    pairs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: rendered markup is always balanced
    #[test]
    fn prop_rendered_markup_is_balanced(
        inventory in strategies::inventory(),
        policy in strategies::policy(),
    ) {
        let ctx = DiagramContext::default().with_connections(policy);
        let graph = assemble_diagram(&inventory, &ctx);
        let markup = mermaid::render(&graph);

        let summary = validate_markup(&markup);
        prop_assert!(summary.is_ok(), "{:?}\n{}", summary, markup);
        prop_assert_eq!(summary.unwrap().subgraphs, graph.all_clusters().len());

        // Same input, same text
        prop_assert_eq!(markup, mermaid::render(&assemble_diagram(&inventory, &ctx)));
    }

    /// Property: dropping any `end` is reported at its `subgraph`
    #[test]
    fn prop_removed_end_is_localized(inventory in strategies::inventory()) {
        let graph = assemble_diagram(&inventory, &DiagramContext::default());
        let markup = mermaid::render(&graph);

        for (opened, closed) in block_pairs(&markup) {
            let broken: String = markup
                .lines()
                .enumerate()
                .filter(|(i, _)| i + 1 != closed)
                .map(|(_, l)| format!("{l}\n"))
                .collect();
            let err = validate_markup(&broken);
            prop_assert!(err.is_err(), "removing line {} went unnoticed", closed);
            prop_assert_eq!(err.unwrap_err().line(), opened);
        }
    }
}
