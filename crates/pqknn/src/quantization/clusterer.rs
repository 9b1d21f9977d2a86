//! The clustering capability the trainer depends on.

use crate::distance::nearest_centroid;
use crate::error::{PqError, Result};

use super::training::{KMeans, KMeansConfig};

/// A clustering algorithm usable for learning codebooks.
///
/// Implementations must assign samples to centroids by squared Euclidean
/// distance, since that is the metric the predictor uses for its distance
/// table. The trainer validates whatever `fit` returns, so a misbehaving
/// implementation surfaces as [`PqError::Clustering`] rather than bad codes.
pub trait Clusterer: Send + Sync {
    /// Cluster `samples` into exactly `k` centroids.
    ///
    /// `seed` is derived from the model configuration and the sub-vector
    /// position; deterministic implementations should honour it.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples cannot be clustered into `k` groups.
    fn fit(&self, samples: &[&[f32]], k: usize, seed: u64) -> Result<Vec<Vec<f32>>>;

    /// Index of the centroid nearest to `sample`.
    ///
    /// # Errors
    ///
    /// The default implementation fails only when `centroids` is empty.
    fn predict(&self, sample: &[f32], centroids: &[Vec<f32>]) -> Result<usize> {
        nearest_centroid(sample, centroids)
            .ok_or_else(|| PqError::Clustering("no centroids to assign to".to_string()))
    }
}

/// [`Clusterer`] backed by [`KMeans`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansClusterer {
    max_iterations: usize,
    convergence_threshold: f32,
}

impl Default for KMeansClusterer {
    fn default() -> Self {
        let defaults = KMeansConfig::default();
        Self::new(defaults.max_iterations, defaults.convergence_threshold)
    }
}

impl KMeansClusterer {
    /// Create a k-means clusterer.
    #[must_use]
    pub const fn new(max_iterations: usize, convergence_threshold: f32) -> Self {
        Self { max_iterations, convergence_threshold }
    }
}

impl Clusterer for KMeansClusterer {
    fn fit(&self, samples: &[&[f32]], k: usize, seed: u64) -> Result<Vec<Vec<f32>>> {
        let config = KMeansConfig::new(k)
            .with_max_iterations(self.max_iterations)
            .with_convergence_threshold(self.convergence_threshold)
            .with_seed(seed);

        let kmeans = KMeans::train(samples, &config)?;
        tracing::debug!(
            k,
            samples = samples.len(),
            iterations = kmeans.iterations,
            inertia = kmeans.inertia,
            "k-means finished"
        );
        Ok(kmeans.centroids)
    }
}
