// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Inference
//!
//! Derives a network topology from flat inventory data: the [`classifier`]
//! labels instance pairs by flow type and direction, the [`resolver`] walks
//! firewall rule sets to produce the connections a policy admits, and
//! [`labels`] renders their edge labels.
//!
//! Nothing here performs I/O or keeps state between calls.

pub mod classifier;
pub mod labels;
pub mod resolver;

pub use classifier::{Classification, FlowType, TopologyClassifier, TrafficDirection};
pub use resolver::{resolve_connections, Connection, ConnectionKind, ConnectionResolver};
