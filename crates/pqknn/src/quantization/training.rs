//! K-means clustering for codebook training.
//!
//! This module provides the k-means routine used to learn one codebook per
//! sub-vector position. All distances are squared Euclidean, matching the
//! distance used for re-encoding and for the query distance table.

use crate::distance::euclidean_distance_squared;
use crate::error::{PqError, Result};

/// Configuration for k-means clustering.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters (centroids).
    pub k: usize,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Convergence threshold (stop if centroid movement < threshold).
    pub convergence_threshold: f32,
    /// Seed for centroid initialisation and empty-cluster reseeding.
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self { k: 256, max_iterations: 25, convergence_threshold: 1e-6, seed: 42 }
    }
}

impl KMeansConfig {
    /// Create a new k-means configuration.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self { k, ..Default::default() }
    }

    /// Set the maximum number of iterations.
    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the convergence threshold.
    #[must_use]
    pub const fn with_convergence_threshold(mut self, threshold: f32) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// K-means clustering result.
#[derive(Debug, Clone)]
pub struct KMeans {
    /// The cluster centroids, exactly `k` of them.
    pub centroids: Vec<Vec<f32>>,
    /// The dimension of each centroid.
    pub dimension: usize,
    /// Number of iterations run.
    pub iterations: usize,
    /// Final inertia (sum of squared distances to nearest centroid).
    pub inertia: f32,
}

impl KMeans {
    /// Train k-means on the given data.
    ///
    /// # Arguments
    ///
    /// - `data`: Training vectors, each with the same dimension
    /// - `config`: K-means configuration
    ///
    /// # Errors
    ///
    /// Returns [`PqError::Clustering`] if:
    /// - `data` is empty
    /// - `k` is 0 or greater than the number of data points
    ///
    /// Returns [`PqError::DimensionMismatch`] if vectors have inconsistent dimensions.
    pub fn train(data: &[&[f32]], config: &KMeansConfig) -> Result<Self> {
        if data.is_empty() {
            return Err(PqError::Clustering("cannot train k-means on empty data".to_string()));
        }

        let dimension = data[0].len();
        if dimension == 0 {
            return Err(PqError::Clustering("cannot cluster zero-length vectors".to_string()));
        }

        if let Some(v) = data.iter().find(|v| v.len() != dimension) {
            return Err(PqError::DimensionMismatch { expected: dimension, actual: v.len() });
        }

        let k = config.k;
        if k == 0 {
            return Err(PqError::Clustering("k must be > 0".to_string()));
        }
        if k > data.len() {
            return Err(PqError::Clustering(format!(
                "k ({k}) exceeds the number of samples ({})",
                data.len()
            )));
        }

        let mut rng_state = seed_state(config.seed);
        let mut centroids = Self::kmeans_plus_plus_init(data, k, &mut rng_state);

        let mut assignments = vec![0usize; data.len()];
        let mut iterations = 0;
        let mut inertia = f32::MAX;

        for _ in 0..config.max_iterations {
            iterations += 1;

            // E-step
            inertia = Self::assign_clusters(data, &centroids, &mut assignments);

            // M-step
            let new_centroids =
                Self::update_centroids(data, &assignments, k, dimension, &mut rng_state);

            let max_movement = Self::max_centroid_movement(&centroids, &new_centroids);
            centroids = new_centroids;

            if max_movement < config.convergence_threshold {
                break;
            }
        }

        Ok(Self { centroids, dimension, iterations, inertia })
    }

    /// K-means++ initialization: select initial centroids with probability
    /// proportional to squared distance from existing centroids.
    fn kmeans_plus_plus_init(data: &[&[f32]], k: usize, rng_state: &mut u64) -> Vec<Vec<f32>> {
        let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(k);

        let first_idx = random_index(rng_state, data.len());
        centroids.push(data[first_idx].to_vec());

        // Running D(x)^2 to the nearest chosen centroid
        let mut min_dists: Vec<f32> =
            data.iter().map(|p| euclidean_distance_squared(p, &centroids[0])).collect();

        for _ in 1..k {
            let total_dist: f64 = min_dists.iter().map(|&d| f64::from(d)).sum();

            let selected_idx = if total_dist <= 0.0 {
                // Every point already coincides with a centroid
                random_index(rng_state, data.len())
            } else {
                let threshold = random_f64(rng_state) * total_dist;
                let mut cumsum = 0.0f64;
                let mut selected = data.len() - 1;

                for (i, &d) in min_dists.iter().enumerate() {
                    cumsum += f64::from(d);
                    if cumsum >= threshold && d > 0.0 {
                        selected = i;
                        break;
                    }
                }
                selected
            };

            let centroid = data[selected_idx].to_vec();
            for (dist, point) in min_dists.iter_mut().zip(data.iter()) {
                *dist = dist.min(euclidean_distance_squared(point, &centroid));
            }
            centroids.push(centroid);
        }

        centroids
    }

    /// Assign each data point to its nearest centroid.
    /// Returns the total inertia (sum of squared distances).
    fn assign_clusters(data: &[&[f32]], centroids: &[Vec<f32>], assignments: &mut [usize]) -> f32 {
        let mut total_inertia = 0.0f32;

        for (point, assignment) in data.iter().zip(assignments.iter_mut()) {
            let mut min_dist = f32::MAX;
            let mut min_idx = 0;

            for (j, centroid) in centroids.iter().enumerate() {
                let dist = euclidean_distance_squared(point, centroid);
                if dist < min_dist {
                    min_dist = dist;
                    min_idx = j;
                }
            }

            *assignment = min_idx;
            total_inertia += min_dist;
        }

        total_inertia
    }

    /// Update centroids based on current assignments.
    fn update_centroids(
        data: &[&[f32]],
        assignments: &[usize],
        k: usize,
        dimension: usize,
        rng_state: &mut u64,
    ) -> Vec<Vec<f32>> {
        let mut new_centroids = vec![vec![0.0f32; dimension]; k];
        let mut counts = vec![0usize; k];

        for (point, &cluster) in data.iter().zip(assignments.iter()) {
            counts[cluster] += 1;
            for (acc, &val) in new_centroids[cluster].iter_mut().zip(point.iter()) {
                *acc += val;
            }
        }

        for (centroid, &count) in new_centroids.iter_mut().zip(counts.iter()) {
            if count > 0 {
                let count_f32 = count as f32;
                for val in centroid.iter_mut() {
                    *val /= count_f32;
                }
            } else {
                // Empty cluster: reseed from a random data point
                let idx = random_index(rng_state, data.len());
                centroid.copy_from_slice(data[idx]);
            }
        }

        new_centroids
    }

    /// Compute maximum (Euclidean) centroid movement between iterations.
    fn max_centroid_movement(old: &[Vec<f32>], new: &[Vec<f32>]) -> f32 {
        old.iter()
            .zip(new.iter())
            .map(|(o, n)| euclidean_distance_squared(o, n).sqrt())
            .fold(0.0f32, f32::max)
    }
}

/// Seed the xorshift state. Xorshift never leaves the all-zero state, so the
/// seed is mixed with a non-zero constant first.
fn seed_state(seed: u64) -> u64 {
    let mixed = seed ^ 0x9E37_79B9_7F4A_7C15;
    if mixed == 0 {
        0x9E37_79B9_7F4A_7C15
    } else {
        mixed
    }
}

/// Simple xorshift64 PRNG.
#[inline]
fn random_u64(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

/// Random index in [0, max).
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn random_index(state: &mut u64, max: usize) -> usize {
    (random_u64(state) % max as u64) as usize
}

/// Random f64 in [0, 1).
#[inline]
#[allow(clippy::cast_precision_loss)]
fn random_f64(state: &mut u64) -> f64 {
    (random_u64(state) >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn refs(data: &[Vec<f32>]) -> Vec<&[f32]> {
        data.iter().map(Vec::as_slice).collect()
    }

    #[test]
    fn test_kmeans_simple() {
        // Simple 2D data with two obvious clusters
        let data: Vec<Vec<f32>> = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![0.2, 0.0],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
            vec![10.2, 10.0],
        ];

        let config = KMeansConfig::new(2).with_seed(42);
        let result = KMeans::train(&refs(&data), &config).unwrap();

        assert_eq!(result.centroids.len(), 2);
        assert_eq!(result.dimension, 2);

        let near_origin = result.centroids.iter().filter(|c| c[0] < 5.0).count();
        let near_ten = result.centroids.iter().filter(|c| c[0] > 5.0).count();
        assert_eq!((near_origin, near_ten), (1, 1));
    }

    #[test]
    fn test_kmeans_single_cluster() {
        let data: Vec<Vec<f32>> = vec![vec![1.0, 2.0], vec![1.1, 2.1], vec![0.9, 1.9]];

        let config = KMeansConfig::new(1).with_seed(42);
        let result = KMeans::train(&refs(&data), &config).unwrap();

        assert_eq!(result.centroids.len(), 1);
        assert!((result.centroids[0][0] - 1.0).abs() < 1e-4);
        assert!((result.centroids[0][1] - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_kmeans_empty_data() {
        let data: Vec<&[f32]> = vec![];
        let result = KMeans::train(&data, &KMeansConfig::new(2));
        assert!(matches!(result, Err(PqError::Clustering(_))));
    }

    #[test]
    fn test_kmeans_k_larger_than_data() {
        let data: Vec<Vec<f32>> = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let config = KMeansConfig::new(10).with_seed(42);
        let result = KMeans::train(&refs(&data), &config);
        assert!(matches!(result, Err(PqError::Clustering(_))));
    }

    #[test]
    fn test_kmeans_k_equals_data_recovers_points() {
        let data: Vec<Vec<f32>> = vec![vec![0.0], vec![5.0], vec![9.0]];
        let config = KMeansConfig::new(3).with_seed(1);
        let result = KMeans::train(&refs(&data), &config).unwrap();

        let mut centers: Vec<f32> = result.centroids.iter().map(|c| c[0]).collect();
        centers.sort_by(f32::total_cmp);
        assert_eq!(centers, vec![0.0, 5.0, 9.0]);
        assert!(result.inertia.abs() < 1e-6);
    }

    #[test]
    fn test_kmeans_inconsistent_dimensions() {
        let data: Vec<Vec<f32>> = vec![vec![1.0, 2.0], vec![3.0]];
        let result = KMeans::train(&refs(&data), &KMeansConfig::new(1));
        assert_eq!(result.unwrap_err(), PqError::DimensionMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_kmeans_identical_points() {
        let data: Vec<Vec<f32>> = vec![vec![3.0, 3.0]; 8];
        let config = KMeansConfig::new(4).with_seed(9);
        let result = KMeans::train(&refs(&data), &config).unwrap();

        assert_eq!(result.centroids.len(), 4);
        assert!(result.centroids.iter().all(|c| c == &vec![3.0, 3.0]));
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data: Vec<Vec<f32>> = (0..50).map(|i| vec![(i % 7) as f32, (i % 11) as f32]).collect();
        let config = KMeansConfig::new(4).with_seed(1234);

        let a = KMeans::train(&refs(&data), &config).unwrap();
        let b = KMeans::train(&refs(&data), &config).unwrap();
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_default_seed_is_fixed() {
        let data: Vec<Vec<f32>> = (0..40).map(|i| vec![(i % 5) as f32, (i % 13) as f32]).collect();
        let config = KMeansConfig::new(3);
        assert_eq!(config.seed, 42);

        let a = KMeans::train(&refs(&data), &config).unwrap();
        let b = KMeans::train(&refs(&data), &config).unwrap();
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn test_zero_seed_still_produces_randomness() {
        let mut state = seed_state(0);
        let first = random_u64(&mut state);
        let second = random_u64(&mut state);
        assert_ne!(first, 0);
        assert_ne!(first, second);
    }
}
