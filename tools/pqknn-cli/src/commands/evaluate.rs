//! Evaluate command implementation.

use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::commands::train_model;
use crate::dataset::LabeledDataset;
use crate::error::{CliError, Result};
use crate::output::{format_evaluation, EvaluationReport};
use crate::{OutputFormat, TrainingArgs};

/// Run the evaluate command - trains, classifies every test row and reports accuracy.
pub fn run(
    training: &TrainingArgs,
    test_path: &Path,
    test_limit: Option<usize>,
    neighbors: usize,
    format: OutputFormat,
) -> Result<()> {
    let test = LabeledDataset::from_path(test_path, test_limit)?;
    if test.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "test set {} has no rows",
            test_path.display()
        )));
    }

    let run = train_model(training)?;
    info!(path = %test_path.display(), rows = test.len(), "loaded test set");

    let started = Instant::now();
    let evaluation = run.model.evaluate(&test.vectors, &test.labels, neighbors)?;
    let predict_elapsed = started.elapsed();

    let report = EvaluationReport {
        train_records: run.records,
        test_records: test.len(),
        dimension: run.model.dimension().unwrap_or_default(),
        num_subvectors: run.model.config().num_subvectors,
        num_clusters: run.model.config().num_clusters(),
        neighbors,
        train_ms: run.elapsed.as_secs_f64() * 1000.0,
        predict_ms: predict_elapsed.as_secs_f64() * 1000.0,
        compressed_bytes: run.model.compressed_size_bytes(),
        compression_ratio: run.model.compression_ratio().unwrap_or_default(),
        correct: evaluation.correct,
        total: evaluation.total,
        accuracy: evaluation.accuracy(),
    };

    println!("{}", format_evaluation(&report, format)?);
    Ok(())
}
