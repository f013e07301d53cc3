// Copyright (c) 2025 - Cowboy AI, Inc.
//! Writing rendered diagrams and their metadata to disk

use super::mermaid;
use super::syntax::validate_markup;
use crate::diagram::{DiagramGraph, DiagramSummary};
use crate::errors::DiagramResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name recorded as the producer of every artifact
pub const GENERATOR: &str = concat!("cloud-diagram ", env!("CARGO_PKG_VERSION"));

/// Render, check and write Mermaid markup
///
/// A `.md` path gets a Markdown document with a fenced block; any other path
/// gets the raw markup.
pub fn write_mermaid(graph: &DiagramGraph, path: &Path) -> DiagramResult<PathBuf> {
    let markup = mermaid::render(graph);
    validate_markup(&markup)?;

    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    let content = if is_markdown {
        mermaid::to_markdown(&graph.title, &markup)
    } else {
        markup
    };

    ensure_parent(path)?;
    fs::write(path, content)?;
    info!(path = %path.display(), "Wrote Mermaid diagram");
    Ok(path.to_path_buf())
}

/// Description of one generation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramMetadata {
    pub generator: String,
    pub title: String,
    pub format: String,
    pub files: Vec<PathBuf>,
    pub summary: DiagramSummary,
    pub generated_at: DateTime<Utc>,
}

impl DiagramMetadata {
    pub fn new(graph: &DiagramGraph, format: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            generator: GENERATOR.to_string(),
            title: graph.title.clone(),
            format: format.into(),
            files,
            summary: graph.summary(),
            generated_at: Utc::now(),
        }
    }
}

/// `{dir}/{stem}_metadata.json` for an output path
pub fn metadata_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "diagram".to_string());
    output.with_file_name(format!("{stem}_metadata.json"))
}

/// Write metadata next to the output it describes
pub fn write_metadata(metadata: &DiagramMetadata, output: &Path) -> DiagramResult<PathBuf> {
    let path = metadata_path(output);
    ensure_parent(&path)?;
    fs::write(&path, serde_json::to_string_pretty(metadata)?)?;
    info!(path = %path.display(), "Wrote diagram metadata");
    Ok(path)
}

fn ensure_parent(path: &Path) -> DiagramResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
