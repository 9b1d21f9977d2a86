//! Command implementations.

pub mod evaluate;
pub mod predict;

use std::time::{Duration, Instant};

use pqknn::{PqKnn, PqKnnConfig};
use tracing::info;

use crate::dataset::LabeledDataset;
use crate::error::Result;
use crate::TrainingArgs;

/// A model trained from the command line, with how long training took.
pub struct TrainedRun {
    /// The trained model.
    pub model: PqKnn,
    /// Number of training rows read.
    pub records: usize,
    /// Wall-clock training time, excluding file parsing.
    pub elapsed: Duration,
}

/// Build the model configuration from the training options.
pub fn model_config(args: &TrainingArgs) -> PqKnnConfig {
    PqKnnConfig::new(args.subvectors, args.cluster_bits)
        .with_seed(args.seed)
        .with_max_iterations(args.max_iterations)
        .with_parallel(!args.sequential)
}

/// Read the training file and train a model on it.
pub fn train_model(args: &TrainingArgs) -> Result<TrainedRun> {
    let mut model = PqKnn::new(model_config(args))?;

    let dataset = LabeledDataset::from_path(&args.train, args.train_limit)?;
    info!(path = %args.train.display(), rows = dataset.len(), "loaded training set");

    let started = Instant::now();
    model.train(&dataset.vectors, &dataset.labels)?;

    Ok(TrainedRun { model, records: dataset.len(), elapsed: started.elapsed() })
}
