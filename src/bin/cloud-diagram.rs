// Copyright (c) 2025 - Cowboy AI, Inc.
//! cloud-diagram
//!
//! Generates architecture diagrams from a normalized cloud inventory.
//!
//! ```text
//! cloud-diagram mermaid --inventory inventory.json -o infra.md --sg-preset network
//! cloud-diagram render  --inventory inventory.json -o infra.svg --format svg
//! cloud-diagram validate infra.md
//! cloud-diagram list-services --kind rds
//! cloud-diagram config-sources --merged
//! ```
//!
//! Settings are layered: built-in defaults, provider defaults, the project
//! file, the user file, the `--sg-preset` bundle and finally explicit flags.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use cloud_diagram::config::{LayerSource, LayeredConfig, Settings};
use cloud_diagram::diagram::{
    assemble_diagram, DiagramContext, DiagramGraph, HandlerEntry, LayoutDirection, ResourceHandler,
    HANDLERS,
};
use cloud_diagram::domain::{Inventory, ResourceType};
use cloud_diagram::policy::{
    DetailLevel, DirectionFilter, FlowFilter, LbDetail, LbDisplay, PolicyOption, Preset,
};
use cloud_diagram::render::{
    render_image, validate_document, write_mermaid, write_metadata, DiagramMetadata,
    GraphvizRenderer, ImageFormat,
};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "cloud-diagram")]
#[command(version, about = "Architecture diagrams from cloud inventories")]
struct Cli {
    /// More log output (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write Mermaid markup (.md wraps it in a Markdown document)
    Mermaid {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Output file
        #[arg(short, long, default_value = "aws_infrastructure.md")]
        output: PathBuf,
    },

    /// Render an image through Graphviz
    Render {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Output file; its extension follows the format
        #[arg(short, long, default_value = "aws_infrastructure.png")]
        output: PathBuf,

        /// Image format
        #[arg(short, long, value_enum)]
        format: Option<ImageFormat>,

        /// Layout program
        #[arg(long, default_value = "dot")]
        layout_program: String,
    },

    /// Check the block structure of Mermaid markup or a Markdown file
    Validate {
        /// File to check
        file: PathBuf,
    },

    /// List the supported services and resource kinds
    ListServices {
        /// Only this kind (`instance`, `ec2`, `rds`, `alb`, ...)
        #[arg(long)]
        kind: Option<String>,
    },

    /// Show the configuration layers in effect
    ConfigSources {
        /// Project configuration file instead of searching upward
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also print the merged, validated settings
        #[arg(long)]
        merged: bool,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Inventory JSON document
    #[arg(short, long)]
    inventory: PathBuf,

    /// Only these regions (repeatable)
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Only this VPC
    #[arg(long)]
    vpc_id: Option<String>,

    /// Diagram title
    #[arg(long)]
    title: Option<String>,

    /// Layout direction
    #[arg(long, value_enum)]
    direction: Option<LayoutDirection>,

    /// Project configuration file instead of searching upward
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which rule-set flows to draw
    #[arg(long, value_enum)]
    sg_flows: Option<FlowFilter>,

    /// Which traffic directions to draw
    #[arg(long, value_enum)]
    sg_direction: Option<DirectionFilter>,

    /// Rule-set edge label detail
    #[arg(long, value_enum)]
    sg_detail: Option<DetailLevel>,

    /// Hide flows inside one subnet
    #[arg(long)]
    sg_filter_internal: bool,

    /// Skip rules on ephemeral ports
    #[arg(long)]
    sg_filter_ephemeral: bool,

    /// Scan ingress rules only
    #[arg(long)]
    sg_only_ingress: bool,

    /// Named bundle of display settings; explicit flags still win
    #[arg(long, value_enum)]
    sg_preset: Option<Preset>,

    /// Which load balancers to draw
    #[arg(long, value_enum)]
    lb_display: Option<LbDisplay>,

    /// Balancer-to-target label detail
    #[arg(long, value_enum)]
    lb_detail: Option<LbDetail>,

    /// Ignore targets that are not healthy
    #[arg(long)]
    lb_filter_unhealthy: bool,
}

impl GenerateArgs {
    /// Settings document holding only the flags given on the command line
    fn overrides(&self, format: Option<ImageFormat>) -> Value {
        let mut diagram = Map::new();
        if let Some(title) = &self.title {
            diagram.insert("title".into(), json!(title));
        }
        insert_option(&mut diagram, "direction", self.direction);
        insert_option(&mut diagram, "output_format", format);

        let mut connections = Map::new();
        insert_option(&mut connections, "flows", self.sg_flows);
        insert_option(&mut connections, "direction", self.sg_direction);
        insert_option(&mut connections, "detail", self.sg_detail);
        insert_flag(&mut connections, "filter_internal", self.sg_filter_internal);
        insert_flag(&mut connections, "filter_ephemeral", self.sg_filter_ephemeral);
        insert_flag(&mut connections, "only_ingress", self.sg_only_ingress);

        let mut load_balancers = Map::new();
        insert_option(&mut load_balancers, "display", self.lb_display);
        insert_option(&mut load_balancers, "detail", self.lb_detail);
        insert_flag(&mut load_balancers, "filter_unhealthy", self.lb_filter_unhealthy);

        let mut root = Map::new();
        for (key, section) in [
            ("diagram", diagram),
            ("connections", connections),
            ("load_balancers", load_balancers),
        ] {
            if !section.is_empty() {
                root.insert(key.into(), Value::Object(section));
            }
        }
        Value::Object(root)
    }

    fn settings(&self, format: Option<ImageFormat>) -> Result<Settings> {
        let cwd = std::env::current_dir().context("Cannot determine the working directory")?;
        let mut layers = LayeredConfig::discover(&cwd, self.config.as_deref())?;
        if let Some(preset) = self.sg_preset {
            debug!(preset = %preset, "Applying preset");
            layers = layers.with_preset(preset);
        }
        Ok(layers.with_cli(self.overrides(format)).settings()?)
    }

    fn diagram(&self, settings: &Settings) -> Result<DiagramGraph> {
        let inventory = Inventory::load(&self.inventory)
            .with_context(|| format!("Failed to load inventory {}", self.inventory.display()))?;
        let inventory = if self.regions.is_empty() && self.vpc_id.is_none() {
            inventory
        } else {
            inventory.scoped(&self.regions, self.vpc_id.as_deref())
        };
        info!(resources = inventory.len(), "Loaded inventory");
        for (kind, count) in inventory.counts() {
            debug!(%kind, count, "Inventory section");
        }
        Ok(assemble_diagram(&inventory, &DiagramContext::new(settings)))
    }
}

fn insert_option<T: PolicyOption>(section: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        section.insert(key.into(), json!(value.as_str()));
    }
}

fn insert_flag(section: &mut Map<String, Value>, key: &str, set: bool) {
    if set {
        section.insert(key.into(), json!(true));
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Mermaid { generate, output } => run_mermaid(&generate, &output),
        Command::Render {
            generate,
            output,
            format,
            layout_program,
        } => run_render(&generate, &output, format, &layout_program),
        Command::Validate { file } => run_validate(&file),
        Command::ListServices { kind } => list_services(kind.as_deref()),
        Command::ConfigSources { config, merged } => config_sources(config.as_deref(), merged),
    }
}

fn run_mermaid(args: &GenerateArgs, output: &Path) -> Result<()> {
    let settings = args.settings(None)?;
    let graph = args.diagram(&settings)?;
    let path = write_mermaid(&graph, output)?;
    let metadata = write_metadata(&DiagramMetadata::new(&graph, "mermaid", vec![path.clone()]), &path)?;

    println!("Mermaid diagram: {}", path.display());
    println!("Metadata:        {}", metadata.display());
    println!("{}", graph.summary());
    Ok(())
}

fn run_render(
    args: &GenerateArgs,
    output: &Path,
    format: Option<ImageFormat>,
    layout_program: &str,
) -> Result<()> {
    let settings = args.settings(format)?;
    let format = settings.diagram.output_format;
    let graph = args.diagram(&settings)?;

    let engine = GraphvizRenderer::new(layout_program);
    let artifacts = render_image(&graph, output, format, &engine)?;
    let files: Vec<PathBuf> = artifacts.files().into_iter().map(Path::to_path_buf).collect();
    let anchor = artifacts
        .image_file
        .clone()
        .or_else(|| artifacts.dot_file.clone())
        .unwrap_or_else(|| output.to_path_buf());
    let metadata = write_metadata(&DiagramMetadata::new(&graph, format.as_str(), files), &anchor)?;

    for file in artifacts.files() {
        println!("Wrote {}", file.display());
    }
    println!("Metadata: {}", metadata.display());
    println!("{}", graph.summary());
    Ok(())
}

fn run_validate(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let summary = validate_document(&content)
        .with_context(|| format!("{} is not valid Mermaid markup", file.display()))?;
    println!(
        "{}: OK ({} subgraphs, nesting depth {})",
        file.display(),
        summary.subgraphs,
        summary.max_depth
    );
    Ok(())
}

fn list_services(kind: Option<&str>) -> Result<()> {
    let entries: Vec<&HandlerEntry> = match kind {
        Some(raw) => {
            let wanted = ResourceType::from_str(raw)
                .with_context(|| format!("Unknown resource kind `{raw}`"))?;
            if !wanted.is_node() {
                bail!("{wanted} is drawn as a cluster or edge, not a node");
            }
            ResourceHandler::for_type(wanted)
                .map(|handler| handler.entries().collect())
                .unwrap_or_default()
        }
        None => HANDLERS.iter().collect(),
    };

    println!(
        "{:<10} {:<14} {:<20} {:<10} DESCRIPTION",
        "SERVICE", "RESOURCE", "KIND", "CATEGORY"
    );
    for entry in entries {
        let resource_type = entry.handler.resource_type();
        println!(
            "{:<10} {:<14} {:<20} {:<10} {}",
            entry.service,
            entry.resource,
            entry.handler.to_string(),
            resource_type.category().to_string(),
            entry.description
        );
    }
    Ok(())
}

fn config_sources(config: Option<&Path>, merged: bool) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot determine the working directory")?;
    let layers = LayeredConfig::discover(&cwd, config)?;

    for layer in layers.layers() {
        let origin = match (&layer.origin, layer.source) {
            (Some(path), _) => path.display().to_string(),
            (None, LayerSource::Defaults | LayerSource::Provider) => "(built in)".to_string(),
            (None, _) => "(command line)".to_string(),
        };
        println!("{:<10} {}", layer.source, origin);
    }

    if merged {
        let settings = layers.settings()?;
        println!();
        print!("{}", serde_yaml::to_string(&settings)?);
    }
    Ok(())
}
