// Copyright (c) 2025 - Cowboy AI, Inc.
//! Ordered configuration layers
//!
//! # Precedence (lowest first)
//!
//! ```text
//! Defaults ─> Provider ─> Project ─> User ─> Preset ─> Cli
//! (built in)  (built in)  (search    ($XDG_   (--sg-    (explicit
//!                          upward)    CONFIG)  preset)   flags)
//! ```
//!
//! Layers are kept in precedence order no matter the order they are added in,
//! and merged with [`deep_merge`](super::merge::deep_merge).

use super::error::{ConfigError, ConfigResult};
use super::merge::merge_all;
use super::settings::Settings;
use crate::policy::Preset;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names searched for the project layer, in priority order
pub const PROJECT_FILE_NAMES: [&str; 3] = [
    "cloud_diagram_config.yaml",
    "cloud_diagram.yaml",
    ".cloud_diagram.yaml",
];

const DEFAULTS_YAML: &str = include_str!("defaults.yaml");
const PROVIDER_YAML: &str = include_str!("aws.yaml");

/// Where a layer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerSource {
    Defaults,
    Provider,
    Project,
    User,
    Preset,
    Cli,
}

impl LayerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Defaults => "defaults",
            Self::Provider => "provider",
            Self::Project => "project",
            Self::User => "user",
            Self::Preset => "preset",
            Self::Cli => "cli",
        }
    }
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One settings document and its origin
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayer {
    pub source: LayerSource,
    /// File the layer was read from, if any
    pub origin: Option<PathBuf>,
    pub value: Value,
}

impl ConfigLayer {
    pub fn new(source: LayerSource, value: Value) -> Self {
        Self {
            source,
            origin: None,
            value,
        }
    }

    /// Parse a YAML document; an empty document is an empty mapping
    pub fn from_yaml(source: LayerSource, yaml: &str) -> ConfigResult<Self> {
        let value = parse_yaml(yaml, source.as_str()).map_err(|err| match err {
            YamlError::Syntax(source_err) => ConfigError::Parse {
                path: PathBuf::from(format!("<{source}>")),
                source: source_err,
            },
            YamlError::NotAMapping => ConfigError::NotAMapping {
                origin: source.to_string(),
            },
        })?;
        Ok(Self::new(source, value))
    }

    /// Read a YAML layer file
    pub fn from_file(source: LayerSource, path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        let value = parse_yaml(&yaml, &path.display().to_string()).map_err(|err| match err {
            YamlError::Syntax(source_err) => ConfigError::Parse {
                path: path.to_path_buf(),
                source: source_err,
            },
            YamlError::NotAMapping => ConfigError::NotAMapping {
                origin: path.display().to_string(),
            },
        })?;
        debug!(source = %source, path = %path.display(), "Loaded configuration layer");
        Ok(Self {
            source,
            origin: Some(path.to_path_buf()),
            value,
        })
    }
}

enum YamlError {
    Syntax(serde_yaml::Error),
    NotAMapping,
}

fn parse_yaml(yaml: &str, origin: &str) -> Result<Value, YamlError> {
    if yaml.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    match serde_yaml::from_str::<Value>(yaml).map_err(YamlError::Syntax)? {
        Value::Null => Ok(Value::Object(Default::default())),
        value @ Value::Object(_) => Ok(value),
        _ => {
            debug!(origin, "Configuration root is not a mapping");
            Err(YamlError::NotAMapping)
        }
    }
}

/// Project configuration file at or above `start`
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        PROJECT_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Per-user configuration file location
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cloud_diagram").join("config.yaml"))
}

/// Settings layers in precedence order
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    layers: Vec<ConfigLayer>,
}

impl LayeredConfig {
    /// No layers at all; merges to an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in defaults and provider layers
    pub fn builtin() -> ConfigResult<Self> {
        let mut config = Self::new();
        config.push(ConfigLayer::from_yaml(LayerSource::Defaults, DEFAULTS_YAML)?);
        config.push(ConfigLayer::from_yaml(LayerSource::Provider, PROVIDER_YAML)?);
        Ok(config)
    }

    /// Built-in layers plus the project and user files
    ///
    /// `explicit` replaces the upward search for a project file.
    pub fn discover(working_dir: &Path, explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut config = Self::builtin()?;

        let project = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_project_config(working_dir),
        };
        if let Some(path) = project {
            config.push(ConfigLayer::from_file(LayerSource::Project, path)?);
        }

        if let Some(path) = user_config_path().filter(|p| p.is_file()) {
            config.push(ConfigLayer::from_file(LayerSource::User, path)?);
        }

        Ok(config)
    }

    /// Add a layer at its precedence position, after layers of the same source
    pub fn push(&mut self, layer: ConfigLayer) {
        let position = self
            .layers
            .iter()
            .position(|existing| existing.source > layer.source)
            .unwrap_or(self.layers.len());
        self.layers.insert(position, layer);
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.push(ConfigLayer::new(LayerSource::Preset, preset.overrides()));
        self
    }

    pub fn with_cli(mut self, overrides: Value) -> Self {
        self.push(ConfigLayer::new(LayerSource::Cli, overrides));
        self
    }

    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }

    /// Merged settings document
    pub fn merged(&self) -> Value {
        merge_all(self.layers.iter().map(|layer| layer.value.clone()))
    }

    /// Merged and validated settings
    pub fn settings(&self) -> ConfigResult<Settings> {
        Settings::from_value(&self.merged())
    }
}
