//! PQ-kNN model configuration.

use crate::error::{PqError, Result};

/// Largest supported `cluster_bits`; codes are stored as `u16`.
pub const MAX_CLUSTER_BITS: u32 = 16;

/// Configuration for a PQ-kNN model.
///
/// # Parameters
///
/// - `num_subvectors` (`n`): number of contiguous sub-vectors each vector is split into
/// - `cluster_bits` (`c`): the number of centroids per sub-vector position is `k = 2^c`
///
/// Both are fixed for the lifetime of a model: a model trained with one `n`
/// cannot score vectors split with a different `n`.
///
/// # Memory Usage
///
/// - Codebooks: `n × k × ceil(D/n) × 4` bytes
/// - Per-record codes: `n × 2` bytes
///
/// For MNIST-like settings (D=784, n=30, c=8):
/// - Codebooks: 30 × 256 × 27 × 4 ≈ 810KB
/// - Per-record: 60 bytes instead of 3136 bytes of raw `u32` pixels
#[derive(Debug, Clone, PartialEq)]
pub struct PqKnnConfig {
    /// Number of sub-vectors per vector.
    pub num_subvectors: usize,
    /// Cluster count exponent: `k = 2^cluster_bits`.
    pub cluster_bits: u32,
    /// Maximum number of k-means iterations per position.
    pub max_iterations: usize,
    /// Stop k-means once no centroid moves further than this.
    pub convergence_threshold: f32,
    /// Base seed; position `p` clusters with `seed + p`.
    pub seed: u64,
    /// Train positions and batch predictions on the rayon thread pool.
    pub parallel: bool,
}

impl PqKnnConfig {
    /// Create a new configuration.
    ///
    /// # Defaults
    ///
    /// - `max_iterations`: 25
    /// - `convergence_threshold`: 1e-6
    /// - `seed`: 42
    /// - `parallel`: true
    #[must_use]
    pub fn new(num_subvectors: usize, cluster_bits: u32) -> Self {
        Self {
            num_subvectors,
            cluster_bits,
            max_iterations: 25,
            convergence_threshold: 1e-6,
            seed: 42,
            parallel: true,
        }
    }

    /// Set the maximum number of k-means iterations.
    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the k-means convergence threshold.
    #[must_use]
    pub const fn with_convergence_threshold(mut self, threshold: f32) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Set the base random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable rayon parallelism.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of centroids per sub-vector position (`k = 2^c`).
    ///
    /// Saturates for out-of-range `cluster_bits`; [`validate`](Self::validate)
    /// rejects those.
    #[must_use]
    pub fn num_clusters(&self) -> usize {
        1usize.checked_shl(self.cluster_bits).unwrap_or(usize::MAX)
    }

    /// Seed used to cluster sub-vector position `position`.
    #[must_use]
    pub const fn position_seed(&self, position: usize) -> u64 {
        self.seed.wrapping_add(position as u64)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PqError::InvalidConfiguration`] if:
    /// - `num_subvectors` is 0
    /// - `cluster_bits` exceeds [`MAX_CLUSTER_BITS`]
    /// - `max_iterations` is 0
    /// - `convergence_threshold` is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if self.num_subvectors == 0 {
            return Err(PqError::InvalidConfiguration("num_subvectors must be > 0".to_string()));
        }

        if self.cluster_bits > MAX_CLUSTER_BITS {
            return Err(PqError::InvalidConfiguration(format!(
                "cluster_bits ({}) must be at most {}",
                self.cluster_bits, MAX_CLUSTER_BITS
            )));
        }

        if self.max_iterations == 0 {
            return Err(PqError::InvalidConfiguration("max_iterations must be > 0".to_string()));
        }

        if !self.convergence_threshold.is_finite() || self.convergence_threshold < 0.0 {
            return Err(PqError::InvalidConfiguration(format!(
                "convergence_threshold ({}) must be a finite, non-negative number",
                self.convergence_threshold
            )));
        }

        Ok(())
    }
}
