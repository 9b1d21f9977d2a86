//! PQ-kNN Command Line Interface
//!
//! Trains a product-quantization kNN classifier from labelled CSV files and
//! evaluates it or classifies single vectors.

mod commands;
mod dataset;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{evaluate, predict};
use crate::error::Result;

/// PQ-kNN Command Line Interface
///
/// Compresses a labelled training set with product quantization and
/// classifies vectors by majority vote among their approximate nearest neighbors.
#[derive(Parser, Debug)]
#[command(name = "pqknn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
}

/// Options controlling how the model is trained.
#[derive(Args, Debug, Clone)]
pub struct TrainingArgs {
    /// CSV file of training rows: label followed by integer features
    #[arg(long, env = "PQKNN_TRAIN")]
    pub train: PathBuf,

    /// Number of sub-vectors each vector is split into
    #[arg(short = 'n', long, default_value = "30")]
    pub subvectors: usize,

    /// Cluster bits; each position gets 2^c centroids
    #[arg(short = 'c', long, default_value = "8")]
    pub cluster_bits: u32,

    /// Read at most this many training rows
    #[arg(long)]
    pub train_limit: Option<usize>,

    /// Seed for centroid initialisation
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Maximum k-means iterations per position
    #[arg(long, default_value = "25")]
    pub max_iterations: usize,

    /// Train and predict on a single thread
    #[arg(long)]
    pub sequential: bool,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train on one CSV file and report accuracy on another
    Evaluate {
        /// Training options.
        #[command(flatten)]
        training: TrainingArgs,

        /// CSV file of test rows, same layout as the training file
        #[arg(long, env = "PQKNN_TEST")]
        test: PathBuf,

        /// Number of nearest neighbors that vote
        #[arg(short = 'm', long, default_value = "100")]
        neighbors: usize,

        /// Read at most this many test rows
        #[arg(long)]
        test_limit: Option<usize>,
    },

    /// Train, then classify a single vector
    Predict {
        /// Training options.
        #[command(flatten)]
        training: TrainingArgs,

        /// Comma-separated integer features, e.g. "0,12,255,..."
        #[arg(long)]
        vector: String,

        /// Number of nearest neighbors that vote
        #[arg(short = 'm', long, default_value = "100")]
        neighbors: usize,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pqknn=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Evaluate { training, test, neighbors, test_limit } => {
            evaluate::run(&training, &test, test_limit, neighbors, cli.format)
        }
        Commands::Predict { training, vector, neighbors } => {
            predict::run(&training, &vector, neighbors, cli.format)
        }
    }
}
