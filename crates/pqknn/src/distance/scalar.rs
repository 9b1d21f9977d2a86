//! Scalar (non-SIMD) distance functions.
//!
//! Used when the `scalar` feature is enabled.

/// Calculate the squared Euclidean (L2) distance between two vectors.
///
/// # Panics
///
/// Debug-panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_distance() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 6.0, 3.0];
        assert!((euclidean_distance_squared(&a, &b) - 25.0).abs() < 1e-6);
    }
}
