// Copyright (c) 2025 - Cowboy AI, Inc.
//! Edge label generation

use crate::domain::load_balancer::DEFAULT_TARGET_PORT;
use crate::domain::{DnsRecord, Listener, Rule, TargetGroup};
use crate::policy::{DetailLevel, LbDetail};

/// Normalize a raw protocol: numeric codes to names, everything lower-case
pub fn normalize_protocol(raw: &str) -> String {
    match raw {
        "-1" => "all".to_string(),
        "6" => "tcp".to_string(),
        "17" => "udp".to_string(),
        "1" => "icmp".to_string(),
        other => other.to_lowercase(),
    }
}

/// Well-known service on a port
pub fn service_name(port: i64) -> Option<&'static str> {
    match port {
        80 => Some("http"),
        443 => Some("https"),
        22 => Some("ssh"),
        3306 => Some("mysql"),
        5432 => Some("postgres"),
        6379 => Some("redis"),
        27017 => Some("mongodb"),
        _ => None,
    }
}

/// Label for an edge derived from a firewall rule
pub fn rule_label(rule: &Rule, detail: DetailLevel) -> String {
    let protocol = normalize_protocol(rule.protocol());
    let port = rule.port();

    match (detail, port) {
        (DetailLevel::Minimal, _) => String::new(),
        (DetailLevel::Ports, Some(port)) => port.to_string(),
        (DetailLevel::Protocols, Some(port)) => match service_name(port) {
            Some(service) => format!("{service}/{protocol}"),
            None => format!("{port}/{protocol}"),
        },
        (DetailLevel::Full, Some(port)) => format!("{port}/{protocol}"),
        (_, None) => protocol,
    }
}

/// Label for a balancer-to-target edge
pub fn target_group_label(target_group: &TargetGroup, detail: LbDetail) -> String {
    let port = target_group.port.unwrap_or(DEFAULT_TARGET_PORT);

    match detail {
        LbDetail::Minimal => String::new(),
        LbDetail::Ports => port.to_string(),
        LbDetail::Full => {
            let protocol = target_group
                .protocol
                .as_deref()
                .unwrap_or("tcp")
                .to_lowercase();
            let mut label = format!("{port}/{protocol}");
            if let Some(hc) = &target_group.health_check {
                if let (Some(hc_port), Some(hc_path)) = (hc.port.as_deref(), hc.path.as_deref()) {
                    if !hc_port.is_empty() && !hc_path.is_empty() {
                        label.push_str(&format!(" (hc:{hc_port}{hc_path})"));
                    }
                }
            }
            label
        }
    }
}

/// Label for a balancer-to-certificate edge
pub fn listener_label(listener: &Listener) -> String {
    let protocol = listener.protocol.as_deref().unwrap_or("tcp").to_lowercase();
    format!("{}/{protocol}", listener.port)
}

/// Label for a zone-to-balancer edge
pub fn dns_label(record: &DnsRecord, target_dns: &str) -> String {
    if record.is_alias() {
        let short = target_dns.split('.').next().unwrap_or(target_dns);
        format!("ALIAS → {short}")
    } else {
        record.record_type.clone()
    }
}
