// Copyright (c) 2025 - Cowboy AI, Inc.
//! Diagram Assembly Layer
//!
//! Turns an inventory into a renderer-neutral graph: nested clusters
//! (region, VPC, tier, subnet), nodes keyed by natural resource id, and
//! edges for balancer targets, DNS records, certificates and the rule-set
//! connections the resolver admits.
//!
//! # Architecture
//!
//! ```text
//! Settings ─> DiagramContext ─┐
//!                             ├─> DiagramAssembler ─> DiagramGraph ─> render::*
//! Inventory ─> Placement ─────┘        │
//!                                      └─ ResourceHandler (per node kind)
//! ```

pub mod assembly;
pub mod context;
pub mod handlers;
pub mod model;

pub use assembly::{assemble_diagram, DiagramAssembler};
pub use context::DiagramContext;
pub use handlers::{HandlerEntry, Placement, ResourceHandler, DEFAULT_REGION, HANDLERS};
pub use model::{
    sanitize_id, Cluster, ClusterKey, ClusterLevel, DiagramGraph, DiagramSummary, Edge, EdgeKind,
    LayoutDirection, Node,
};
