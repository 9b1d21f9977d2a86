//! Error types for PQ-kNN training and prediction.

use thiserror::Error;

/// Result type for PQ-kNN operations.
pub type Result<T> = std::result::Result<T, PqError>;

/// Errors that can occur while training or querying a PQ-kNN model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PqError {
    /// Invalid model or clustering parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A query does not have the dimension the model was trained on.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The expected dimension.
        expected: usize,
        /// The actual dimension.
        actual: usize,
    },

    /// A training vector's length differs from the first training vector's.
    #[error("training vector {record} has dimension {actual}, expected {expected}")]
    TrainingDimensionMismatch {
        /// Index of the offending training vector.
        record: usize,
        /// The dimension set by the first training vector.
        expected: usize,
        /// The offending vector's dimension.
        actual: usize,
    },

    /// Training vectors and labels have different lengths.
    #[error("length mismatch: {vectors} vectors but {labels} labels")]
    LengthMismatch {
        /// Number of vectors supplied.
        vectors: usize,
        /// Number of labels supplied.
        labels: usize,
    },

    /// No training vectors were supplied.
    #[error("cannot train on an empty training set")]
    EmptyTrainingSet,

    /// Prediction was attempted before training.
    #[error("model has not been trained")]
    NotTrained,

    /// The neighbor count is outside `[1, num_records]`.
    #[error("invalid neighbor count {requested}: must be between 1 and {available}")]
    InvalidNeighborCount {
        /// The requested neighbor count.
        requested: usize,
        /// The number of stored training records.
        available: usize,
    },

    /// The clustering collaborator failed or returned malformed output.
    #[error("clustering failed: {0}")]
    Clustering(String),
}

/// Broad classification of [`PqError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad construction parameters or model/data shape disagreement.
    Configuration,
    /// Operation not valid in the model's current state.
    State,
    /// Bad arguments to a training or prediction call.
    Input,
    /// Failure inside the clustering collaborator.
    Clustering,
}

impl PqError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration(_) | Self::TrainingDimensionMismatch { .. } => {
                ErrorKind::Configuration
            }
            Self::NotTrained => ErrorKind::State,
            Self::DimensionMismatch { .. }
            | Self::LengthMismatch { .. }
            | Self::EmptyTrainingSet
            | Self::InvalidNeighborCount { .. } => ErrorKind::Input,
            Self::Clustering(_) => ErrorKind::Clustering,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PqError::LengthMismatch { vectors: 4, labels: 3 };
        assert_eq!(err.to_string(), "length mismatch: 4 vectors but 3 labels");

        let err = PqError::InvalidNeighborCount { requested: 0, available: 10 };
        assert_eq!(err.to_string(), "invalid neighbor count 0: must be between 1 and 10");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(PqError::NotTrained.kind(), ErrorKind::State);
        assert_eq!(PqError::EmptyTrainingSet.kind(), ErrorKind::Input);
        assert_eq!(
            PqError::InvalidConfiguration("n must be > 0".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(PqError::Clustering("boom".into()).kind(), ErrorKind::Clustering);
        assert_eq!(
            PqError::TrainingDimensionMismatch { record: 1, expected: 4, actual: 3 }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(PqError::DimensionMismatch { expected: 4, actual: 3 }.kind(), ErrorKind::Input);
    }
}
