//! Codebooks and query distance tables.

use crate::distance::euclidean_distance_squared;

/// The `k` centroids learned for one sub-vector position.
#[derive(Debug, Clone, PartialEq)]
pub struct Codebook {
    centroids: Vec<Vec<f32>>,
}

impl Codebook {
    pub(crate) fn new(centroids: Vec<Vec<f32>>) -> Self {
        Self { centroids }
    }

    /// Number of centroids (`k`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    /// Whether the codebook has no centroids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    /// Get a centroid by code.
    #[must_use]
    pub fn centroid(&self, code: usize) -> Option<&[f32]> {
        self.centroids.get(code).map(Vec::as_slice)
    }

    /// All centroids, indexed by code.
    #[must_use]
    pub fn centroids(&self) -> &[Vec<f32>] {
        &self.centroids
    }
}

/// Precomputed query-to-centroid distances for asymmetric distance computation.
///
/// A `k × n` matrix: row = centroid index, column = sub-vector position, entry =
/// squared Euclidean distance from the query's sub-vector at that position to
/// that centroid. Built fresh for every query.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable {
    /// Row-major `[centroid][position]`.
    table: Vec<f32>,
    num_centroids: usize,
    num_positions: usize,
}

impl DistanceTable {
    /// Build the table for a query already split into sub-vectors.
    pub(crate) fn build(query_subvectors: &[Vec<f32>], codebooks: &[Codebook]) -> Self {
        let num_positions = codebooks.len();
        let num_centroids = codebooks.first().map_or(0, Codebook::len);
        let mut table = vec![0.0f32; num_centroids * num_positions];

        for (position, (subvector, codebook)) in
            query_subvectors.iter().zip(codebooks.iter()).enumerate()
        {
            for (centroid_idx, centroid) in codebook.centroids().iter().enumerate() {
                table[centroid_idx * num_positions + position] =
                    euclidean_distance_squared(subvector, centroid);
            }
        }

        Self { table, num_centroids, num_positions }
    }

    /// Distance from the query's sub-vector at `position` to centroid `centroid`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    #[inline]
    pub fn get(&self, centroid: usize, position: usize) -> f32 {
        assert!(position < self.num_positions, "position {position} out of range");
        self.table[centroid * self.num_positions + position]
    }

    /// Number of centroids per position (`k`, the row count).
    #[must_use]
    pub const fn num_centroids(&self) -> usize {
        self.num_centroids
    }

    /// Number of sub-vector positions (`n`, the column count).
    #[must_use]
    pub const fn num_positions(&self) -> usize {
        self.num_positions
    }

    /// Approximate squared distance from the query to a record with `codes`.
    ///
    /// One lookup per position instead of a full `D`-dimensional distance.
    /// Lookups are summed in `f64`: image-sized totals exceed the 2^24 range
    /// where `f32` still resolves unit differences.
    #[must_use]
    #[inline]
    pub fn approximate_distance(&self, codes: &[u16]) -> f64 {
        codes
            .iter()
            .enumerate()
            .map(|(position, &code)| {
                f64::from(self.table[usize::from(code) * self.num_positions + position])
            })
            .sum()
    }
}
