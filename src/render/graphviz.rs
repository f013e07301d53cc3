// Copyright (c) 2025 - Cowboy AI, Inc.
//! Image rendering through an external layout engine
//!
//! # Flow
//!
//! ```text
//! DiagramGraph ─ dot::render ─> {stem}.dot ─ LayoutEngine ─> {stem}.{png|svg|pdf}
//!                                                  │
//!                                                  └─ failure: DOT source and partial image removed
//! ```
//!
//! Only artifacts confirmed on disk afterwards are reported.

use super::dot;
use crate::diagram::DiagramGraph;
use crate::errors::{DiagramError, DiagramResult};
use crate::policy::PolicyOption;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Output format of a rendered diagram
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
    Pdf,
    /// DOT source only, no layout run
    Dot,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Whether producing this format needs the layout engine
    pub fn needs_layout(&self) -> bool {
        *self != Self::Dot
    }
}

impl PolicyOption for ImageFormat {
    const VARIANTS: &'static [Self] = &[Self::Png, Self::Svg, Self::Pdf, Self::Dot];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Dot => "dot",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lays out a DOT file into an image
pub trait LayoutEngine {
    /// Program or engine name, for messages
    fn name(&self) -> &str;

    /// Write `output` in `format` from the DOT file at `source`
    fn layout(&self, source: &Path, format: ImageFormat, output: &Path) -> DiagramResult<()>;
}

/// Graphviz `dot` run as a child process
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: String,
}

impl GraphvizRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl LayoutEngine for GraphvizRenderer {
    fn name(&self) -> &str {
        &self.program
    }

    fn layout(&self, source: &Path, format: ImageFormat, output: &Path) -> DiagramResult<()> {
        debug!(program = %self.program, source = %source.display(), "Running layout engine");
        let result = Command::new(&self.program)
            .arg(format!("-T{}", format.extension()))
            .arg(source)
            .arg("-o")
            .arg(output)
            .output()
            .map_err(|source| DiagramError::RendererUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(DiagramError::render(output, stderr.trim()));
        }
        Ok(())
    }
}

/// Files a render run left on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArtifacts {
    pub format: ImageFormat,
    pub dot_file: Option<PathBuf>,
    pub image_file: Option<PathBuf>,
}

impl RenderedArtifacts {
    /// Every confirmed file
    pub fn files(&self) -> Vec<&Path> {
        self.dot_file
            .iter()
            .chain(self.image_file.iter())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Force the output path's extension to match the format
pub fn normalize_output_path(path: &Path, format: ImageFormat) -> PathBuf {
    path.with_extension(format.extension())
}

fn confirmed(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

fn discard(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(err) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %err, "Could not remove output of a failed render");
    }
}

/// Write the DOT source next to `output` and lay it out in `format`
pub fn render_image(
    graph: &DiagramGraph,
    output: &Path,
    format: ImageFormat,
    engine: &dyn LayoutEngine,
) -> DiagramResult<RenderedArtifacts> {
    let image_path = normalize_output_path(output, format);
    let dot_path = image_path.with_extension(ImageFormat::Dot.extension());

    if let Some(parent) = dot_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dot_path, dot::render(graph))?;

    if !format.needs_layout() {
        return Ok(RenderedArtifacts {
            format,
            dot_file: confirmed(dot_path),
            image_file: None,
        });
    }

    if let Err(err) = engine.layout(&dot_path, format, &image_path) {
        discard(&image_path);
        discard(&dot_path);
        return Err(err);
    }

    let artifacts = RenderedArtifacts {
        format,
        dot_file: confirmed(dot_path),
        image_file: confirmed(image_path),
    };
    info!(engine = engine.name(), files = artifacts.files().len(), "Rendered diagram");
    Ok(artifacts)
}
