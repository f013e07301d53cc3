// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud infrastructure diagrams from a normalized resource inventory
//!
//! The interesting part is topology inference: firewall rule sets that
//! reference each other are resolved into resource-to-resource connections,
//! classified by flow type and direction, and filtered by independent
//! display policies before they are drawn.
//!
//! # Pipeline
//!
//! ```text
//! inventory.json ─> Inventory ─┬─> ConnectionResolver ─> Vec<Connection>
//!                              │           │
//! config layers ─> Settings ───┴─> DiagramAssembler ─> DiagramGraph
//!                                                         │
//!                                     ┌───────────────────┼──────────────┐
//!                                     ▼                   ▼              ▼
//!                              mermaid (.md/.mmd)    dot (.dot)    graphviz image
//! ```

pub mod config;
pub mod diagram;
pub mod domain;
pub mod errors;
pub mod policy;
pub mod render;
pub mod topology;

pub use config::{ConfigError, LayeredConfig, Settings};
pub use diagram::{assemble_diagram, DiagramContext, DiagramGraph, LayoutDirection};
pub use domain::{Inventory, ResourceType, SubnetTier};
pub use errors::{DiagramError, DiagramResult};
pub use policy::{ConnectionPolicy, LoadBalancerPolicy, Preset};
pub use render::{ImageFormat, SyntaxError};
pub use topology::{resolve_connections, Connection, FlowType, TrafficDirection};

/// Assemble the diagram for an inventory under validated settings
pub fn build_diagram(inventory: &Inventory, settings: &Settings) -> DiagramGraph {
    assemble_diagram(inventory, &DiagramContext::new(settings))
}
