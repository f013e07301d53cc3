// Copyright (c) 2025 - Cowboy AI, Inc.
//! Output renderers for assembled diagrams
//!
//! - [`mermaid`]: text markup, embeddable in Markdown
//! - [`dot`]: Graphviz source
//! - [`graphviz`]: image output through an external layout engine
//! - [`syntax`]: block-structure check for Mermaid markup
//! - [`output`]: file writing and run metadata

pub mod dot;
pub mod graphviz;
pub mod mermaid;
pub mod output;
pub mod syntax;

pub use graphviz::{
    normalize_output_path, render_image, GraphvizRenderer, ImageFormat, LayoutEngine,
    RenderedArtifacts,
};
pub use output::{metadata_path, write_mermaid, write_metadata, DiagramMetadata, GENERATOR};
pub use syntax::{validate_document, validate_markup, MarkupSummary, SyntaxError};
