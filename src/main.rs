//! compressor-sentinel - Rotary-Screw Compressor Diagnostic System
//!
//! Rule-based per-sensor severity bands plus a learned overall severity
//! classifier, served over HTTP or queried one-shot from the CLI.
//!
//! # Usage
//!
//! ```bash
//! # Train a model on a labeled CSV and publish the artifact
//! compressor-sentinel train --data compressor_data.csv --out compressor_model.json
//!
//! # Train on generated synthetic data (bench / demo)
//! compressor-sentinel train --synthetic 3000 --out compressor_model.json
//!
//! # Serve the diagnostic API (default command)
//! compressor-sentinel --model compressor_model.json --addr 0.0.0.0:8080
//!
//! # One-shot diagnosis at the bench
//! compressor-sentinel diagnose --current 65 --temperature 95 --pressure 2.6 \
//!     --dp 0.3 --hours 1000 --vibration 5
//! ```
//!
//! # Environment Variables
//!
//! - `SENTINEL_CONFIG`: path to the TOML config file
//! - `SENTINEL_CORS_ORIGINS`: comma-separated allowed CORS origins
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use compressor_sentinel::api::{self, ApiState};
use compressor_sentinel::config::SentinelConfig;
use compressor_sentinel::dataset::{self, LabeledDataset};
use compressor_sentinel::forest::{
    evaluate, fit_forest, stratified_split, ForestArtifact, ForestParams, TreeParams,
};
use compressor_sentinel::report::DiagnosticEngine;
use compressor_sentinel::types::SensorReading;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "compressor-sentinel")]
#[command(about = "Rotary-Screw Compressor Diagnostic System")]
#[command(version)]
struct CliArgs {
    /// Override the server bind address (default: config / "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Override the model artifact path
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Explicit config file (otherwise SENTINEL_CONFIG / ./sentinel.toml / defaults)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Train the severity classifier and publish the model artifact
    Train {
        /// Labeled CSV dataset (six feature columns + Label)
        #[arg(long, conflicts_with = "synthetic")]
        data: Option<PathBuf>,

        /// Generate N synthetic rows instead of loading a CSV
        #[arg(long, value_name = "N")]
        synthetic: Option<usize>,

        /// Output artifact path (default: config model.artifact_path)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of trees (default: config training.trees)
        #[arg(long)]
        trees: Option<usize>,

        /// RNG seed (default: config training.seed)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Diagnose one reading and print the report
    Diagnose {
        /// Motor current (A)
        #[arg(long)]
        current: f64,
        /// Oil temperature (°C)
        #[arg(long)]
        temperature: f64,
        /// Line pressure (bar)
        #[arg(long)]
        pressure: f64,
        /// Filter differential pressure (bar)
        #[arg(long)]
        dp: f64,
        /// Running hours since service
        #[arg(long)]
        hours: u32,
        /// Vibration RMS (mm/s)
        #[arg(long)]
        vibration: f64,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => SentinelConfig::from_file(path)?,
        None => SentinelConfig::load()?,
    };
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if let Some(model) = args.model {
        config.model.artifact_path = model;
    }

    match args.command {
        Some(SubCommand::Train {
            data,
            synthetic,
            out,
            trees,
            seed,
        }) => run_train(&config, data, synthetic, out, trees, seed),
        Some(SubCommand::Diagnose {
            current,
            temperature,
            pressure,
            dp,
            hours,
            vibration,
            json,
        }) => {
            let reading = SensorReading {
                motor_current_a: current,
                oil_temperature_c: temperature,
                line_pressure_bar: pressure,
                filter_delta_p_bar: dp,
                running_hours: hours,
                vibration_mm_s: vibration,
            };
            run_diagnose(&config, &reading, json)
        }
        None => run_serve(&config).await,
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Load the artifact (fail fast on any mismatch) and serve the API.
async fn run_serve(config: &SentinelConfig) -> Result<()> {
    let artifact = ForestArtifact::load(&config.model.artifact_path)
        .context("refusing to serve without a valid model artifact")?;
    let engine = DiagnosticEngine::new(Arc::new(artifact));
    api::serve(&config.server.addr, ApiState { engine }).await
}

/// Offline training: load or generate data, fit, evaluate, publish.
fn run_train(
    config: &SentinelConfig,
    data: Option<PathBuf>,
    synthetic: Option<usize>,
    out: Option<PathBuf>,
    trees: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let t = &config.training;
    let params = ForestParams {
        n_trees: trees.unwrap_or(t.trees),
        tree: TreeParams {
            max_depth: t.max_depth,
            min_samples_split: t.min_samples_split,
            ..TreeParams::default()
        },
        seed: seed.unwrap_or(t.seed),
    };

    let dataset: LabeledDataset = match (data, synthetic) {
        (Some(path), _) => dataset::load_csv(&path)?,
        (None, Some(n)) => dataset::generate_synthetic(n, params.seed),
        (None, None) => anyhow::bail!("train requires either --data <csv> or --synthetic <n>"),
    };

    let dist = dataset.label_distribution();
    println!("Dataset rows: {}", dataset.len());
    println!(
        "Label distribution: NORMAL={} WARNING={} CRITICAL={}",
        dist[0], dist[1], dist[2]
    );

    let (train, test) = stratified_split(&dataset, t.test_fraction, params.seed);
    let forest = fit_forest(&train, &params);
    let eval = evaluate(&forest, &test);
    println!("\n{eval}");

    let artifact = ForestArtifact::new(forest, &params, &eval, train.len());
    let out_path = out.unwrap_or_else(|| config.model.artifact_path.clone());
    artifact.save(&out_path)?;
    println!("Model saved to {}", out_path.display());
    Ok(())
}

/// One-shot diagnosis against the published artifact.
fn run_diagnose(config: &SentinelConfig, reading: &SensorReading, json: bool) -> Result<()> {
    let artifact = ForestArtifact::load(&config.model.artifact_path)?;
    let engine = DiagnosticEngine::new(Arc::new(artifact));
    let report = engine.assemble(reading)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
