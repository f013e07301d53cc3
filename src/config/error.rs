// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration error types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One offending settings field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path, e.g. `connections.flows`
    pub field: String,
    /// Offending value as written
    pub value: String,
    /// Accepted values or type
    pub expected: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: invalid value `{}` (expected {})",
            self.field, self.value, self.expected
        )
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Layer file could not be read
    #[error("Failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Layer file is not valid YAML
    #[error("Failed to parse configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Layer root is not a mapping
    #[error("Configuration {origin} must be a mapping at the top level")]
    NotAMapping { origin: String },

    /// Every invalid field found in the merged settings
    #[error("Invalid configuration ({} problem(s)): {}", .0.len(), join_issues(.0))]
    Validation(Vec<FieldIssue>),
}

impl ConfigError {
    /// Issues carried by a validation error
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            Self::Validation(issues) => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_issue() {
        let err = ConfigError::Validation(vec![
            FieldIssue {
                field: "connections.flows".into(),
                value: "sideways".into(),
                expected: "one of none, inter-subnet".into(),
            },
            FieldIssue {
                field: "connections.only_ingress".into(),
                value: "\"yes\"".into(),
                expected: "a boolean".into(),
            },
        ]);

        let message = err.to_string();
        assert!(message.starts_with("Invalid configuration (2 problem(s))"));
        assert!(message.contains("connections.flows: invalid value `sideways`"));
        assert!(message.contains("connections.only_ingress"));
        assert_eq!(err.issues().len(), 2);
    }
}
