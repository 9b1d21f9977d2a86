//! Labelled CSV datasets.
//!
//! Each row is `label,f1,f2,...,fD` with no header: an integer label followed
//! by `D` non-negative integer features. Every row must have the same `D`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use pqknn::Label;

use crate::error::{CliError, Result};

/// Feature vectors with their labels, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledDataset {
    /// One feature vector per row.
    pub vectors: Vec<Vec<u32>>,
    /// One label per row.
    pub labels: Vec<Label>,
}

impl LabeledDataset {
    /// Read a dataset file, keeping at most `limit` rows.
    pub fn from_path(path: &Path, limit: Option<usize>) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        read_labeled_csv(BufReader::new(file), limit)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Feature count of the rows, if any were read.
    pub fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }
}

/// Parse labelled rows from `reader`, stopping after `limit` rows if given.
pub fn read_labeled_csv<R: Read>(reader: R, limit: Option<usize>) -> Result<LabeledDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut dataset = LabeledDataset::default();

    for result in csv_reader.records() {
        if limit.is_some_and(|limit| dataset.len() >= limit) {
            break;
        }

        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let mut fields = record.iter();

        let label_field = fields
            .next()
            .filter(|field| !field.is_empty())
            .ok_or_else(|| CliError::Dataset { line, message: "empty row".to_string() })?;
        let label = label_field.parse::<Label>().map_err(|e| CliError::Dataset {
            line,
            message: format!("invalid label {label_field:?}: {e}"),
        })?;

        let features = fields
            .map(|field| {
                field.parse::<u32>().map_err(|e| CliError::Dataset {
                    line,
                    message: format!("invalid feature {field:?}: {e}"),
                })
            })
            .collect::<Result<Vec<u32>>>()?;

        if features.is_empty() {
            return Err(CliError::Dataset { line, message: "row has no features".to_string() });
        }
        if let Some(expected) = dataset.dimension() {
            if features.len() != expected {
                return Err(CliError::Dataset {
                    line,
                    message: format!("expected {expected} features, found {}", features.len()),
                });
            }
        }

        dataset.vectors.push(features);
        dataset.labels.push(label);
    }

    Ok(dataset)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_rows_in_order() {
        let data = "0,0,0,0,0\n1,10,10,10,10\n-3, 1, 2, 3, 4\n";
        let dataset = read_labeled_csv(data.as_bytes(), None).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.dimension(), Some(4));
        assert_eq!(dataset.labels, vec![0, 1, -3]);
        assert_eq!(dataset.vectors[2], vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_limit_stops_early() {
        let data = "0,1,2\n1,3,4\n2,5,6\n";
        let dataset = read_labeled_csv(data.as_bytes(), Some(2)).unwrap();
        assert_eq!(dataset.labels, vec![0, 1]);

        let none = read_labeled_csv(data.as_bytes(), Some(0)).unwrap();
        assert!(none.is_empty());
        assert_eq!(none.dimension(), None);
    }

    #[test]
    fn test_rejects_inconsistent_feature_counts() {
        let data = "0,1,2,3\n1,4,5\n";
        let err = read_labeled_csv(data.as_bytes(), None).unwrap_err();
        assert!(matches!(err, CliError::Dataset { line: 2, .. }), "unexpected error: {err}");
    }

    #[test]
    fn test_rejects_non_integer_fields() {
        let err = read_labeled_csv("0,1,x\n".as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("invalid feature"));

        let err = read_labeled_csv("cat,1,2\n".as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("invalid label"));

        let err = read_labeled_csv("0,1,-2\n".as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("invalid feature"));
    }

    #[test]
    fn test_rejects_rows_without_features() {
        let err = read_labeled_csv("7\n".as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("no features"));

        let err = read_labeled_csv(",1,2\n".as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("empty row"));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "5,1,2,3").unwrap();
        writeln!(file, "6,4,5,6").unwrap();

        let dataset = LabeledDataset::from_path(file.path(), None).unwrap();
        assert_eq!(dataset.labels, vec![5, 6]);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            LabeledDataset::from_path(&missing, None),
            Err(CliError::FileNotFound(_))
        ));
    }
}
