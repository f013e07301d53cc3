// Copyright (c) 2025 - Cowboy AI, Inc.
//! Layered Configuration
//!
//! Settings come from ordered YAML layers merged into one document, which is
//! then validated into a typed [`Settings`] value in a single pass.
//!
//! # Architecture
//!
//! ```text
//! defaults.yaml ┐
//! aws.yaml      ├─ LayeredConfig ─ deep_merge ─> Value ─ Settings::from_value ─> Settings
//! project file  │                                          │
//! user file     │                                          └─ ConfigError::Validation
//! preset        │                                             (every bad field)
//! CLI flags     ┘
//! ```

pub mod error;
pub mod layers;
pub mod merge;
pub mod settings;

pub use error::{ConfigError, ConfigResult, FieldIssue};
pub use layers::{
    find_project_config, user_config_path, ConfigLayer, LayerSource, LayeredConfig,
    PROJECT_FILE_NAMES,
};
pub use merge::{deep_merge, merge_all};
pub use settings::{DiagramSettings, Settings, DEFAULT_TITLE};
