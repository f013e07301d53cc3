// Copyright (c) 2025 - Cowboy AI, Inc.
//! Firewall Rule Sets (security groups)
//!
//! Rule sets are the only source of inferred resource-to-resource traffic.
//! A rule whose source references another rule set allows traffic from every
//! member of that set; CIDR sources never produce edges.
//!
//! The inventory supplies rule sets as a JSON object keyed by id. [`RuleSets`]
//! keeps the document's key order so that connection resolution, which walks
//! rule sets in order, is reproducible run to run.

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ports above this value are ephemeral
pub const EPHEMERAL_PORT_THRESHOLD: i64 = 32768;

/// Rule direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDirection {
    Ingress,
    Egress,
}

impl RuleDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingress => "ingress",
            Self::Egress => "egress",
        }
    }
}

/// Source of a firewall rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSource", into = "RawSource")]
pub enum SourceRef {
    /// Address range
    Cidr(String),
    /// Reference to another rule set by id
    RuleSetRef(String),
    /// Source kinds the diagram does not model (prefix lists and the like)
    Other { kind: String, value: String },
}

impl SourceRef {
    /// Referenced rule-set id, if this source is a reference
    pub fn rule_set_id(&self) -> Option<&str> {
        match self {
            Self::RuleSetRef(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawSource {
    #[serde(rename = "type", alias = "kind")]
    kind: String,
    value: String,
}

impl From<RawSource> for SourceRef {
    fn from(raw: RawSource) -> Self {
        match raw.kind.as_str() {
            "cidr" | "cidr_ipv6" => Self::Cidr(raw.value),
            "security_group" | "rule_set_ref" => Self::RuleSetRef(raw.value),
            _ => Self::Other {
                kind: raw.kind,
                value: raw.value,
            },
        }
    }
}

impl From<SourceRef> for RawSource {
    fn from(source: SourceRef) -> Self {
        match source {
            SourceRef::Cidr(value) => RawSource {
                kind: "cidr".into(),
                value,
            },
            SourceRef::RuleSetRef(value) => RawSource {
                kind: "security_group".into(),
                value,
            },
            SourceRef::Other { kind, value } => RawSource { kind, value },
        }
    }
}

/// Single firewall rule
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rule {
    /// Raw protocol, numeric (`"6"`, `"-1"`) or named (`"tcp"`)
    #[serde(default, deserialize_with = "super::de::string_or_number")]
    pub protocol: Option<String>,
    #[serde(default)]
    pub from_port: Option<i64>,
    #[serde(default)]
    pub to_port: Option<i64>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

impl Rule {
    /// Raw protocol, `-1` (all traffic) when absent
    pub fn protocol(&self) -> &str {
        self.protocol.as_deref().unwrap_or("-1")
    }

    /// Effective port: `to_port`, else `from_port`; zero and negatives mean none
    pub fn port(&self) -> Option<i64> {
        self.to_port.or(self.from_port).filter(|p| *p > 0)
    }

    /// Whether either end of the port range is ephemeral
    pub fn is_ephemeral(&self) -> bool {
        [self.from_port, self.to_port]
            .iter()
            .flatten()
            .any(|p| *p > EPHEMERAL_PORT_THRESHOLD)
    }

    /// Rule-set ids referenced by this rule's sources
    pub fn referenced_rule_sets(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().filter_map(SourceRef::rule_set_id)
    }
}

/// Ingress and egress rules of a rule set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSetRules {
    #[serde(default)]
    pub ingress: Vec<Rule>,
    #[serde(default)]
    pub egress: Vec<Rule>,
}

/// Firewall rule set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// Filled from the map key when the inventory is keyed by id
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub rules: RuleSetRules,
}

impl RuleSet {
    pub fn rules(&self, direction: RuleDirection) -> &[Rule] {
        match direction {
            RuleDirection::Ingress => &self.rules.ingress,
            RuleDirection::Egress => &self.rules.egress,
        }
    }
}

/// Rule sets in inventory order, addressable by id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSets(Vec<RuleSet>);

impl RuleSets {
    pub fn new(rule_sets: Vec<RuleSet>) -> Self {
        Self(rule_sets)
    }

    pub fn get(&self, id: &str) -> Option<&RuleSet> {
        self.0.iter().find(|rs| rs.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleSet> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<RuleSet> for RuleSets {
    fn from_iter<I: IntoIterator<Item = RuleSet>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleSets {
    type Item = &'a RuleSet;
    type IntoIter = std::slice::Iter<'a, RuleSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for RuleSets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for rule_set in &self.0 {
            map.serialize_entry(&rule_set.id, rule_set)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleSets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RuleSetsVisitor)
    }
}

struct RuleSetsVisitor;

impl<'de> Visitor<'de> for RuleSetsVisitor {
    type Value = RuleSets;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of rule-set id to rule set, or a list of rule sets")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut rule_sets = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((id, mut rule_set)) = access.next_entry::<String, RuleSet>()? {
            if rule_set.id.is_empty() {
                rule_set.id = id;
            }
            rule_sets.push(rule_set);
        }
        Ok(RuleSets(rule_sets))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut rule_sets = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(rule_set) = access.next_element::<RuleSet>()? {
            rule_sets.push(rule_set);
        }
        Ok(RuleSets(rule_sets))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(RuleSets::default())
    }
}
