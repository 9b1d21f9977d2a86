//! Predict command implementation.

use crate::commands::train_model;
use crate::error::{CliError, Result};
use crate::output::{format_prediction, NeighborRow, PredictionReport};
use crate::{OutputFormat, TrainingArgs};

/// Run the predict command - trains, then classifies one vector.
pub fn run(
    training: &TrainingArgs,
    vector: &str,
    neighbors: usize,
    format: OutputFormat,
) -> Result<()> {
    let query = parse_vector(vector)?;
    let run = train_model(training)?;

    let (label, voters) = run.model.classify(&query, neighbors)?;
    let nearest = voters
        .into_iter()
        .map(|n| NeighborRow { record: n.index, label: n.label, distance: n.distance })
        .collect();

    let report = PredictionReport { label, neighbors: nearest };
    println!("{}", format_prediction(&report, format)?);
    Ok(())
}

/// Parse a comma-separated list of non-negative integers.
fn parse_vector(input: &str) -> Result<Vec<u32>> {
    if input.trim().is_empty() {
        return Err(CliError::InvalidInput("vector is empty".to_string()));
    }

    input
        .split(',')
        .map(|field| {
            let field = field.trim();
            field.parse::<u32>().map_err(|e| CliError::Parse(format!("feature {field:?}: {e}")))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("0, 12,255").unwrap(), vec![0, 12, 255]);
        assert_eq!(parse_vector("7").unwrap(), vec![7]);
    }

    #[test]
    fn test_parse_vector_rejects_bad_fields() {
        assert!(matches!(parse_vector("1,,2"), Err(CliError::Parse(_))));
        assert!(matches!(parse_vector("1,-2"), Err(CliError::Parse(_))));
        assert!(matches!(parse_vector("  "), Err(CliError::InvalidInput(_))));
    }
}
