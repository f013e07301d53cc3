// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed settings and their validation
//!
//! The merged configuration document is read field by field. Every invalid
//! field is recorded and reported together in one
//! [`ConfigError::Validation`]; a missing field takes its default.

use super::error::{ConfigError, ConfigResult, FieldIssue};
use crate::diagram::LayoutDirection;
use crate::policy::{
    ConnectionPolicy, LoadBalancerPolicy, PolicyOption, ResourceFilters,
};
use crate::render::ImageFormat;
use serde::Serialize;
use serde_json::Value;

/// Title used when no layer sets one
pub const DEFAULT_TITLE: &str = "AWS Infrastructure Diagram";

const CONNECTION_FIELDS: &[&str] = &[
    "flows",
    "direction",
    "detail",
    "filter_internal",
    "filter_ephemeral",
    "only_ingress",
];
const LOAD_BALANCER_FIELDS: &[&str] = &["display", "detail", "filter_unhealthy"];
const DIAGRAM_FIELDS: &[&str] = &["title", "direction", "output_format"];

/// Diagram-wide presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramSettings {
    pub title: String,
    pub direction: LayoutDirection,
    pub output_format: ImageFormat,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            direction: LayoutDirection::default(),
            output_format: ImageFormat::default(),
        }
    }
}

/// Fully validated settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Settings {
    pub diagram: DiagramSettings,
    pub connections: ConnectionPolicy,
    pub load_balancers: LoadBalancerPolicy,
    pub resources: ResourceFilters,
}

impl Settings {
    /// Validate a merged settings document
    pub fn from_value(document: &Value) -> ConfigResult<Self> {
        let mut reader = FieldReader::new(document);
        let defaults = Settings::default();

        reader.known_keys("diagram", DIAGRAM_FIELDS);
        reader.known_keys("connections", CONNECTION_FIELDS);
        reader.known_keys("load_balancers", LOAD_BALANCER_FIELDS);

        let diagram = DiagramSettings {
            title: reader.text("diagram.title", &defaults.diagram.title),
            direction: reader.option("diagram.direction", defaults.diagram.direction),
            output_format: reader.option("diagram.output_format", defaults.diagram.output_format),
        };

        let c = defaults.connections;
        let connections = ConnectionPolicy {
            flows: reader.option("connections.flows", c.flows),
            direction: reader.option("connections.direction", c.direction),
            detail: reader.option("connections.detail", c.detail),
            filter_internal: reader.flag("connections.filter_internal", c.filter_internal),
            filter_ephemeral: reader.flag("connections.filter_ephemeral", c.filter_ephemeral),
            only_ingress: reader.flag("connections.only_ingress", c.only_ingress),
        };

        let lb = defaults.load_balancers;
        let load_balancers = LoadBalancerPolicy {
            display: reader.option("load_balancers.display", lb.display),
            detail: reader.option("load_balancers.detail", lb.detail),
            filter_unhealthy: reader.flag("load_balancers.filter_unhealthy", lb.filter_unhealthy),
        };

        let resources = reader.section("resources");

        reader.finish(Settings {
            diagram,
            connections,
            load_balancers,
            resources,
        })
    }
}

/// Collects issues while reading a settings document
struct FieldReader<'v> {
    root: &'v Value,
    issues: Vec<FieldIssue>,
}

impl<'v> FieldReader<'v> {
    fn new(root: &'v Value) -> Self {
        Self {
            root,
            issues: Vec::new(),
        }
    }

    /// Value at a dotted path; `null` counts as absent
    fn get(&self, path: &str) -> Option<&'v Value> {
        path.split('.')
            .try_fold(self.root, |value, key| value.get(key))
            .filter(|value| !value.is_null())
    }

    fn issue(&mut self, field: &str, value: &Value, expected: impl Into<String>) {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.issues.push(FieldIssue {
            field: field.to_string(),
            value,
            expected: expected.into(),
        });
    }

    fn option<T: PolicyOption>(&mut self, path: &str, default: T) -> T {
        let Some(value) = self.get(path) else {
            return default;
        };
        match value.as_str().and_then(T::parse) {
            Some(parsed) => parsed,
            None => {
                self.issue(path, value, format!("one of {}", T::expected()));
                default
            }
        }
    }

    fn flag(&mut self, path: &str, default: bool) -> bool {
        let Some(value) = self.get(path) else {
            return default;
        };
        match value.as_bool() {
            Some(flag) => flag,
            None => {
                self.issue(path, value, "a boolean");
                default
            }
        }
    }

    fn text(&mut self, path: &str, default: &str) -> String {
        match self.get(path) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.issue(path, other, "a string");
                default.to_string()
            }
        }
    }

    fn section<T: serde::de::DeserializeOwned + Default>(&mut self, path: &str) -> T {
        let Some(value) = self.get(path) else {
            return T::default();
        };
        match serde_json::from_value(value.clone()) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.issue(path, value, format!("a valid section ({err})"));
                T::default()
            }
        }
    }

    /// Report fields a section does not define
    fn known_keys(&mut self, section: &str, known: &[&str]) {
        let Some(value) = self.get(section) else {
            return;
        };
        let Some(map) = value.as_object() else {
            self.issue(section, value, "a mapping");
            return;
        };
        for key in map.keys() {
            if !known.contains(&key.as_str()) {
                self.issues.push(FieldIssue {
                    field: format!("{section}.{key}"),
                    value: key.clone(),
                    expected: format!("one of the fields {}", known.join(", ")),
                });
            }
        }
    }

    fn finish<T>(self, value: T) -> ConfigResult<T> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(ConfigError::Validation(self.issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DetailLevel, DirectionFilter, FlowFilter, LbDisplay};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_document_yields_defaults() {
        assert_eq!(Settings::from_value(&json!({})).unwrap(), Settings::default());
        assert_eq!(Settings::from_value(&Value::Null).unwrap(), Settings::default());
    }

    #[test]
    fn test_reads_every_policy_field() {
        let settings = Settings::from_value(&json!({
            "diagram": {"title": "Prod", "direction": "lr", "output_format": "svg"},
            "connections": {
                "flows": "tier-crossing",
                "direction": "north_south",
                "detail": "protocols",
                "filter_internal": true,
                "filter_ephemeral": true,
                "only_ingress": true
            },
            "load_balancers": {"display": "connected-only", "detail": "full", "filter_unhealthy": true}
        }))
        .unwrap();

        assert_eq!(settings.diagram.title, "Prod");
        assert_eq!(settings.diagram.direction, LayoutDirection::LeftRight);
        assert_eq!(settings.diagram.output_format, ImageFormat::Svg);
        assert_eq!(settings.connections.flows, FlowFilter::TierCrossing);
        assert_eq!(settings.connections.direction, DirectionFilter::NorthSouth);
        assert_eq!(settings.connections.detail, DetailLevel::Protocols);
        assert!(settings.connections.filter_internal);
        assert!(settings.connections.only_ingress);
        assert_eq!(settings.load_balancers.display, LbDisplay::ConnectedOnly);
        assert!(settings.load_balancers.filter_unhealthy);
    }

    #[test]
    fn test_all_invalid_fields_reported_together() {
        let err = Settings::from_value(&json!({
            "connections": {
                "flows": "sideways",
                "detail": 3,
                "only_ingress": "yes",
                "flow": "none"
            },
            "load_balancers": {"display": "some"},
            "diagram": {"output_format": "gif"}
        }))
        .unwrap_err();

        let mut fields: Vec<&str> = err.issues().iter().map(|i| i.field.as_str()).collect();
        fields.sort_unstable();
        assert_eq!(
            fields,
            vec![
                "connections.detail",
                "connections.flow",
                "connections.flows",
                "connections.only_ingress",
                "diagram.output_format",
                "load_balancers.display",
            ]
        );
    }

    #[test]
    fn test_issue_lists_accepted_values() {
        let err = Settings::from_value(&json!({"connections": {"flows": "sideways"}})).unwrap_err();
        let issue = &err.issues()[0];
        assert_eq!(issue.value, "sideways");
        assert_eq!(
            issue.expected,
            "one of none, inter-subnet, tier-crossing, external-only"
        );
    }

    #[test]
    fn test_resource_section_errors_are_collected() {
        let err = Settings::from_value(&json!({
            "resources": {"instance": {"exclude_states": "terminated"}},
            "connections": {"direction": "up"}
        }))
        .unwrap_err();
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_non_mapping_section() {
        let err = Settings::from_value(&json!({"connections": "none"})).unwrap_err();
        assert_eq!(err.issues()[0].expected, "a mapping");
    }
}
