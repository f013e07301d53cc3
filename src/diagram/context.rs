// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-run diagram context

use super::model::LayoutDirection;
use crate::config::Settings;
use crate::policy::{ConnectionPolicy, LoadBalancerPolicy, ResourceFilters};

/// Everything one generation run reads, passed explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramContext {
    pub title: String,
    pub direction: LayoutDirection,
    pub connections: ConnectionPolicy,
    pub load_balancers: LoadBalancerPolicy,
    pub filters: ResourceFilters,
}

impl DiagramContext {
    pub fn new(settings: &Settings) -> Self {
        Self {
            title: settings.diagram.title.clone(),
            direction: settings.diagram.direction,
            connections: settings.connections,
            load_balancers: settings.load_balancers,
            filters: settings.resources.clone(),
        }
    }

    pub fn with_connections(mut self, connections: ConnectionPolicy) -> Self {
        self.connections = connections;
        self
    }
}

impl Default for DiagramContext {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl From<&Settings> for DiagramContext {
    fn from(settings: &Settings) -> Self {
        Self::new(settings)
    }
}
