// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for diagram generation

use crate::config::ConfigError;
use crate::render::SyntaxError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading inputs or producing diagrams
///
/// Missing references inside an inventory are never errors; they only cause
/// elements to be left out of the diagram.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed inventory or metadata document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Emitted markup failed the syntax check
    #[error("Invalid diagram markup: {0}")]
    Syntax(#[from] SyntaxError),

    /// External renderer could not produce the requested artifact
    #[error("Rendering failed for {path}: {reason}")]
    Render { path: PathBuf, reason: String },

    /// Renderer binary could not be started
    #[error("Renderer `{program}` is not available: {source}")]
    RendererUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for diagram operations
pub type DiagramResult<T> = Result<T, DiagramError>;

impl DiagramError {
    pub fn render(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Render {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
