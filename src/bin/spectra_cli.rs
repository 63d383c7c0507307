//! Spectra Command Line Interface
//!
//! Headless tool for inspecting persisted conversation trees.
//!
//! # Usage
//!
//! ```bash
//! # Check a snapshot for structural errors
//! spectra_cli validate --snapshot session.json
//!
//! # Print the render graph at a viewport zoom
//! spectra_cli render --snapshot session.json --zoom 0.45
//!
//! # Print the raw layout at a named tier with a custom config
//! spectra_cli layout --snapshot session.json --tier full --config config/spectra.yaml
//! ```

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use spectra::layout::ZoomTier;
use spectra::tree::{PersistedTree, TreeState};
use spectra::{Canvas, SpectraConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "spectra_cli")]
#[command(version = "0.1.0")]
#[command(about = "Validate, lay out and render persisted conversation trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a snapshot against the tree invariants
    Validate {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Print node positions for a snapshot
    Layout(ViewArgs),

    /// Print the full render graph for a snapshot
    Render(ViewArgs),
}

#[derive(Args)]
struct ViewArgs {
    /// Snapshot JSON file
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Viewport zoom factor, mapped to a tier by the configured thresholds
    #[arg(long, conflicts_with = "tier")]
    zoom: Option<f32>,

    /// Tier name or index: dot, label, preview, full, 0-3
    #[arg(long)]
    tier: Option<ZoomTier>,

    /// YAML config (built-in defaults when omitted)
    #[arg(short, long, env = "SPECTRA_CONFIG")]
    config: Option<PathBuf>,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { snapshot } => cmd_validate(&snapshot),
        Commands::Layout(args) => cmd_layout(&args),
        Commands::Render(args) => cmd_render(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_validate(snapshot: &Path) -> anyhow::Result<()> {
    let persisted = read_snapshot(snapshot)?;
    let nodes = persisted.nodes.len();

    let state = match TreeState::try_from(persisted) {
        Ok(state) => state,
        Err(err) => bail!("[{}] {}", err.code(), err),
    };

    println!(
        "OK: {nodes} node(s), {} highlighted, focus {}",
        state.highlighted_node_ids().len(),
        state.focused_node_id().map_or("none", |id| id.as_str())
    );
    Ok(())
}

fn cmd_layout(args: &ViewArgs) -> anyhow::Result<()> {
    let mut canvas = open_canvas(args)?;
    let layout = canvas.layout();
    println!("{}", serde_json::to_string_pretty(&*layout)?);
    Ok(())
}

fn cmd_render(args: &ViewArgs) -> anyhow::Result<()> {
    let mut canvas = open_canvas(args)?;
    let graph = canvas.render();
    info!(
        tier = %graph.tier,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "rendered"
    );
    println!("{}", serde_json::to_string_pretty(&*graph)?);
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn read_snapshot(path: &Path) -> anyhow::Result<PersistedTree> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let persisted = PersistedTree::from_json(&json)?;
    Ok(persisted)
}

fn open_canvas(args: &ViewArgs) -> anyhow::Result<Canvas<spectra::layout::ParagraphEstimator>> {
    let config = match &args.config {
        Some(path) => SpectraConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SpectraConfig::default(),
    };

    let mut canvas = Canvas::with_paragraph_estimator(config);
    canvas.store_mut().load_state(read_snapshot(&args.snapshot)?)?;

    if let Some(zoom) = args.zoom {
        canvas.set_viewport_zoom(zoom);
    } else if let Some(tier) = args.tier {
        canvas.set_zoom_tier(tier);
    }
    Ok(canvas)
}
