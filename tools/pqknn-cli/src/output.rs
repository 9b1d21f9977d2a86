//! Output formatting utilities.

use std::fmt::Write as _;

use pqknn::Label;
use serde::Serialize;

use crate::error::Result;
use crate::OutputFormat;

/// Summary of an `evaluate` run.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Training rows compressed.
    pub train_records: usize,
    /// Test rows classified.
    pub test_records: usize,
    /// Feature count `D`.
    pub dimension: usize,
    /// Sub-vectors per vector (`n`).
    pub num_subvectors: usize,
    /// Centroids per position (`k`).
    pub num_clusters: usize,
    /// Neighbors voting per query (`m`).
    pub neighbors: usize,
    /// Training time in milliseconds.
    pub train_ms: f64,
    /// Total prediction time in milliseconds.
    pub predict_ms: f64,
    /// Size of codes, codebooks and labels.
    pub compressed_bytes: usize,
    /// Raw training-set size over compressed size.
    pub compression_ratio: f64,
    /// Correctly classified test rows.
    pub correct: usize,
    /// Test rows evaluated.
    pub total: usize,
    /// `correct / total`.
    pub accuracy: f64,
}

/// One voting neighbor in a `predict` report.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborRow {
    /// Training record index.
    pub record: usize,
    /// Its label.
    pub label: Label,
    /// Approximate squared distance to the query.
    pub distance: f64,
}

/// Result of a `predict` run.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    /// Winning label.
    pub label: Label,
    /// The neighbors that voted, nearest first.
    pub neighbors: Vec<NeighborRow>,
}

/// Format an evaluation report according to the specified format.
pub fn format_evaluation(report: &EvaluationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(evaluation_as_text(report)),
    }
}

/// Format a prediction report according to the specified format.
pub fn format_prediction(report: &PredictionReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(prediction_as_text(report)),
    }
}

fn evaluation_as_text(report: &EvaluationReport) -> String {
    let rows = [
        ("Training rows", report.train_records.to_string()),
        ("Test rows", report.test_records.to_string()),
        ("Dimension", report.dimension.to_string()),
        ("Sub-vectors (n)", report.num_subvectors.to_string()),
        ("Clusters (k)", report.num_clusters.to_string()),
        ("Neighbors (m)", report.neighbors.to_string()),
        ("Training time", format_millis(report.train_ms)),
        ("Prediction time", format_millis(report.predict_ms)),
        ("Compressed size", format!("{} bytes", report.compressed_bytes)),
        ("Compression ratio", format!("{:.2}x", report.compression_ratio)),
        (
            "Accuracy",
            format!("{:.2}% ({}/{})", report.accuracy * 100.0, report.correct, report.total),
        ),
    ];

    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut output = String::new();
    for (key, value) in rows {
        let _ = writeln!(output, "{key:<width$}  {value}");
    }
    output.truncate(output.trim_end().len());
    output
}

fn prediction_as_text(report: &PredictionReport) -> String {
    let mut output = format!("Predicted label: {}", report.label);
    if !report.neighbors.is_empty() {
        output.push_str("\n\nNearest neighbors:");
        for row in &report.neighbors {
            let _ = write!(
                output,
                "\n  #{:<8} label {:<6} distance {:.1}",
                row.record, row.label, row.distance
            );
        }
    }
    output
}

/// Format milliseconds, switching to seconds above one second.
fn format_millis(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2} s", ms / 1000.0)
    } else {
        format!("{ms:.1} ms")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_report() -> EvaluationReport {
        EvaluationReport {
            train_records: 100,
            test_records: 20,
            dimension: 784,
            num_subvectors: 28,
            num_clusters: 256,
            neighbors: 10,
            train_ms: 1500.0,
            predict_ms: 12.5,
            compressed_bytes: 4096,
            compression_ratio: 3.5,
            correct: 19,
            total: 20,
            accuracy: 0.95,
        }
    }

    #[test]
    fn test_evaluation_text() {
        let text = format_evaluation(&sample_report(), OutputFormat::Text).unwrap();
        assert!(text.contains("95.00% (19/20)"));
        assert!(text.contains("1.50 s"));
        assert!(text.contains("12.5 ms"));
        assert!(text.contains("3.50x"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_evaluation_json() {
        let json = format_evaluation(&sample_report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["correct"], 19);
        assert_eq!(value["num_clusters"], 256);
        assert!((value["accuracy"].as_f64().unwrap() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_prediction_formats() {
        let report = PredictionReport {
            label: 3,
            neighbors: vec![NeighborRow { record: 7, label: 3, distance: 12.0 }],
        };

        let text = format_prediction(&report, OutputFormat::Text).unwrap();
        assert!(text.starts_with("Predicted label: 3"));
        assert!(text.contains("#7"));

        let json = format_prediction(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["label"], 3);
        assert_eq!(value["neighbors"][0]["record"], 7);
    }
}
