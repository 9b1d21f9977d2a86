//! Product Quantization for vector compression.
//!
//! # Overview
//!
//! Product Quantization works by:
//! 1. Splitting vectors into `n` contiguous sub-vectors (the last ones zero-padded)
//! 2. Training `k = 2^c` centroids per sub-vector position with a [`Clusterer`]
//! 3. Encoding each vector as `n` indices into the per-position [`Codebook`]s
//!
//! For example, a 784-pixel image with `n = 30` and `k = 256` is stored as 30
//! codes instead of 784 integers.
//!
//! # Distance Computation
//!
//! Queries are never compressed. A [`DistanceTable`] holds the squared distance
//! from each query sub-vector to every centroid at that position, after which
//! the distance to any stored record is `n` table lookups
//! (asymmetric distance computation).

mod clusterer;
mod codebook;
mod config;
mod layout;
mod training;

pub use clusterer::{Clusterer, KMeansClusterer};
pub use codebook::{Codebook, DistanceTable};
pub use config::{PqKnnConfig, MAX_CLUSTER_BITS};
pub use layout::{split, SubvectorLayout};
pub use training::{KMeans, KMeansConfig};
