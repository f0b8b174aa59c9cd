//! YMRS Preparation - Main Entry Point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feature_engine::Modality;
use label_engine::RowRange;
use serde::Serialize;
use tracing::info;

use prep_cli::{
    init_logging, prepare_features, prepare_labels, run_all, FeatureSummary, LabelSummary,
    PrepConfig, RunSummary,
};

#[derive(Parser)]
#[command(name = "ymrs-prep")]
#[command(author, version, about = "Prepare audio/visual features and YMRS labels for model input", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the summary as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and reshape the feature set of one modality
    Features {
        /// audio or visual
        #[arg(short, long)]
        modality: Modality,

        /// Feature directory (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Extract, scale, and reshape one label split
    Labels {
        /// Label file (defaults to the configured one)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// First row (defaults to the configured training split)
        #[arg(long)]
        start: Option<usize>,

        /// Row after the last one
        #[arg(long)]
        end: Option<usize>,
    },

    /// Prepare both modalities and both label splits from configuration
    Run,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose).context("installing tracing subscriber")?;

    info!("=== YMRS Prep v{} ===", env!("CARGO_PKG_VERSION"));

    let config = PrepConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Features { modality, dir } => {
            let dir = dir
                .or_else(|| config.source(modality).dir.clone())
                .with_context(|| format!("no directory given for {modality} features"))?;
            let summary = prepare_features(&config, modality, &dir)?;
            emit(&summary, cli.json, print_features)
        }
        Commands::Labels { file, start, end } => {
            let file = file
                .or_else(|| config.labels.path.clone())
                .context("no label file given")?;
            let range = RowRange::new(
                start.unwrap_or(config.train.start),
                end.unwrap_or(config.train.end),
            );
            let summary = prepare_labels(&config, &file, range)?;
            emit(&summary, cli.json, print_labels)
        }
        Commands::Run => {
            let summary = run_all(&config)?;
            emit(&summary, cli.json, print_run)
        }
    }
}

fn emit<T: Serialize>(summary: &T, json: bool, print: fn(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print(summary);
    }
    Ok(())
}

fn print_features(summary: &FeatureSummary) {
    println!("{} features from {}", summary.modality, summary.dir.display());
    for file in &summary.files {
        println!(
            "  {:<40} {:>6} rows x {:>4} features",
            file.path.display(),
            file.rows,
            file.features
        );
    }
    println!("  reshaped: {:?}", summary.reshaped);
}

fn print_labels(summary: &LabelSummary) {
    println!(
        "labels {}..{} from {}",
        summary.range.start,
        summary.range.end,
        summary.path.display()
    );
    println!("  rows:     {}", summary.rows);
    println!("  scaled:   [{:.4}, {:.4}]", summary.scaled_min, summary.scaled_max);
    println!("  raw:      [{:.2}, {:.2}]", summary.raw_min, summary.raw_max);
    println!("  reshaped: {:?}", summary.reshaped);
}

fn print_run(summary: &RunSummary) {
    print_features(&summary.audio);
    print_features(&summary.visual);
    print_labels(&summary.train);
    print_labels(&summary.predict);
}
