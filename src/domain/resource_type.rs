// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud Resource Type Taxonomy
//!
//! Defines the closed set of resource types the inventory can carry and the
//! diagram can render. Parsing accepts the provider's short names (`ec2`,
//! `rds`, `alb`) so command-line filters can use either vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cloud resource type taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    // Network
    /// Virtual private network (VPC)
    Vpc,
    /// Subnet inside a VPC
    Subnet,
    /// Load balancer (application, network or classic)
    LoadBalancer,

    // Compute
    /// Compute instance (EC2)
    Instance,

    // Data
    /// Managed relational database (RDS)
    Database,

    // Security
    /// Firewall rule set (security group)
    SecurityGroup,
    /// TLS certificate (ACM)
    Certificate,

    // DNS
    /// DNS hosted zone (Route53)
    HostedZone,
}

impl ResourceType {
    /// Every type, in rendering order.
    pub const ALL: [ResourceType; 8] = [
        Self::Vpc,
        Self::Subnet,
        Self::Instance,
        Self::LoadBalancer,
        Self::Database,
        Self::SecurityGroup,
        Self::HostedZone,
        Self::Certificate,
    ];

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vpc => "vpc",
            Self::Subnet => "subnet",
            Self::LoadBalancer => "load_balancer",
            Self::Instance => "instance",
            Self::Database => "database",
            Self::SecurityGroup => "security_group",
            Self::Certificate => "certificate",
            Self::HostedZone => "hosted_zone",
        }
    }

    /// Parse from string representation, accepting provider aliases
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vpc" | "network" => Some(Self::Vpc),
            "subnet" => Some(Self::Subnet),
            "load_balancer" | "lb" | "alb" | "nlb" | "elb" => Some(Self::LoadBalancer),
            "instance" | "ec2" | "vm" => Some(Self::Instance),
            "database" | "rds" | "db" | "db_instance" => Some(Self::Database),
            "security_group" | "sg" | "rule_set" => Some(Self::SecurityGroup),
            "certificate" | "acm" | "cert" => Some(Self::Certificate),
            "hosted_zone" | "route53" | "zone" => Some(Self::HostedZone),
            _ => None,
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Vpc => "VPC",
            Self::Subnet => "Subnet",
            Self::LoadBalancer => "Load Balancer",
            Self::Instance => "EC2 Instance",
            Self::Database => "RDS Database",
            Self::SecurityGroup => "Security Group",
            Self::Certificate => "ACM Certificate",
            Self::HostedZone => "Route53 Hosted Zone",
        }
    }

    /// Get the primary category for this resource type
    pub fn category(&self) -> ResourceCategory {
        match self {
            Self::Vpc | Self::Subnet | Self::LoadBalancer => ResourceCategory::Network,
            Self::Instance => ResourceCategory::Compute,
            Self::Database => ResourceCategory::Data,
            Self::SecurityGroup | Self::Certificate => ResourceCategory::Security,
            Self::HostedZone => ResourceCategory::Dns,
        }
    }

    /// Whether resources of this type become diagram nodes
    ///
    /// VPCs and subnets become clusters; security groups only contribute edges.
    pub fn is_node(&self) -> bool {
        !matches!(self, Self::Vpc | Self::Subnet | Self::SecurityGroup)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Resource category (high-level grouping)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCategory {
    /// VPCs, subnets, load balancers
    Network,
    /// Instances
    Compute,
    /// Databases
    Data,
    /// Rule sets and certificates
    Security,
    /// Hosted zones
    Dns,
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "Network"),
            Self::Compute => write!(f, "Compute"),
            Self::Data => write!(f, "Data"),
            Self::Security => write!(f, "Security"),
            Self::Dns => write!(f, "DNS"),
        }
    }
}
