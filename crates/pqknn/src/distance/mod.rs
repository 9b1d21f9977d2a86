//! Distance primitives for sub-vector comparison.
//!
//! Product quantization only ever compares sub-vectors with squared Euclidean
//! distance: k-means assignment, re-encoding of training records, and the
//! per-query distance table all go through [`euclidean_distance_squared`].
//! Ranking never needs the square root, so it is never taken on the hot path.
//!
//! # Features
//!
//! - default: SIMD implementation using the `wide` crate (`f32x8`)
//! - `scalar`: force the portable implementation (useful for debugging)

#[cfg(not(feature = "scalar"))]
mod simd;

#[cfg(feature = "scalar")]
mod scalar;

#[cfg(not(feature = "scalar"))]
pub use simd::euclidean_distance_squared;

#[cfg(feature = "scalar")]
pub use scalar::euclidean_distance_squared;

/// Find the index of the nearest centroid to `sample` by squared Euclidean distance.
///
/// Ties resolve to the lowest index. Returns `None` when `centroids` is empty.
#[must_use]
pub fn nearest_centroid(sample: &[f32], centroids: &[Vec<f32>]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = euclidean_distance_squared(sample, centroid);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }

    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_centroid() {
        let centroids = vec![vec![0.0, 0.0], vec![10.0, 10.0], vec![5.0, 5.0]];
        assert_eq!(nearest_centroid(&[1.0, 0.5], &centroids), Some(0));
        assert_eq!(nearest_centroid(&[9.0, 11.0], &centroids), Some(1));
        assert_eq!(nearest_centroid(&[4.0, 6.0], &centroids), Some(2));
    }

    #[test]
    fn test_nearest_centroid_tie_prefers_lowest_index() {
        let centroids = vec![vec![0.0], vec![2.0]];
        assert_eq!(nearest_centroid(&[1.0], &centroids), Some(0));
    }

    #[test]
    fn test_nearest_centroid_empty() {
        assert_eq!(nearest_centroid(&[1.0], &[]), None);
    }
}
