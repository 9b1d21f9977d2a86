//! `pqknn` - Product-Quantization k-Nearest-Neighbors
//!
//! This crate compresses a labelled set of fixed-length integer vectors (for
//! example flattened 28×28 images) with product quantization, and classifies
//! new vectors by majority vote among their approximately nearest compressed
//! neighbors.
//!
//! # Overview
//!
//! - **Training**: every vector is split into `n` sub-vectors; each sub-vector
//!   position gets its own codebook of `k = 2^c` centroids, and every training
//!   vector is replaced by `n` centroid indices (codes).
//! - **Prediction**: the query's sub-vectors are compared once against every
//!   centroid to build a `k × n` distance table; each stored record's distance
//!   is then a sum of `n` lookups. The `m` closest records vote on the label.
//!
//! # Example
//!
//! ```ignore
//! use pqknn::{PqKnn, PqKnnConfig};
//!
//! // 30 sub-vectors, 2^8 = 256 centroids per position
//! let mut model = PqKnn::new(PqKnnConfig::new(30, 8).with_seed(7))?;
//! model.train(&train_vectors, &train_labels)?;
//!
//! // Majority vote among the 100 nearest compressed records
//! let label = model.predict(&query, 100)?;
//! ```
//!
//! # Modules
//!
//! - [`knn`] - The [`PqKnn`] model: training, prediction, evaluation
//! - [`quantization`] - Sub-vector layout, codebooks, k-means, distance tables
//! - [`distance`] - Squared Euclidean distance primitives
//! - [`error`] - Error types ([`PqError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod distance;
pub mod error;
pub mod knn;
pub mod quantization;

// Re-export commonly used types
pub use error::{ErrorKind, PqError, Result};
pub use knn::{majority_label, Evaluation, Label, Neighbor, PqKnn};
pub use quantization::{
    split, Clusterer, Codebook, DistanceTable, KMeans, KMeansClusterer, KMeansConfig,
    PqKnnConfig, SubvectorLayout,
};
