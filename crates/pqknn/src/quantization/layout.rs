//! Sub-vector splitting.
//!
//! Training and prediction must split vectors identically or approximate
//! distances stop being comparable, so both go through [`SubvectorLayout::split`].

use crate::error::{PqError, Result};

/// How a `dimension`-length vector is cut into `num_subvectors` contiguous blocks.
///
/// Every block has length `ceil(dimension / num_subvectors)`. Slots past the
/// end of the original vector are zero-filled, so the trailing block(s) may
/// be partly or wholly padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubvectorLayout {
    dimension: usize,
    num_subvectors: usize,
    subvector_len: usize,
}

impl SubvectorLayout {
    /// Create a layout.
    ///
    /// # Errors
    ///
    /// Returns [`PqError::InvalidConfiguration`] if `num_subvectors` is 0 or
    /// greater than `dimension`.
    pub fn new(dimension: usize, num_subvectors: usize) -> Result<Self> {
        if num_subvectors == 0 {
            return Err(PqError::InvalidConfiguration("num_subvectors must be > 0".to_string()));
        }
        if num_subvectors > dimension {
            return Err(PqError::InvalidConfiguration(format!(
                "num_subvectors ({num_subvectors}) exceeds the vector dimension ({dimension})"
            )));
        }

        Ok(Self { dimension, num_subvectors, subvector_len: dimension.div_ceil(num_subvectors) })
    }

    /// Length of the vectors this layout splits.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of sub-vectors produced per vector.
    #[must_use]
    pub const fn num_subvectors(&self) -> usize {
        self.num_subvectors
    }

    /// Length of every sub-vector, padding included.
    #[must_use]
    pub const fn subvector_len(&self) -> usize {
        self.subvector_len
    }

    /// Split `vector` into `num_subvectors` zero-padded blocks.
    ///
    /// # Errors
    ///
    /// Returns [`PqError::DimensionMismatch`] if `vector` is not `dimension` long.
    pub fn split(&self, vector: &[u32]) -> Result<Vec<Vec<f32>>> {
        if vector.len() != self.dimension {
            return Err(PqError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let subvectors = (0..self.num_subvectors)
            .map(|position| {
                let start = (position * self.subvector_len).min(self.dimension);
                let end = (start + self.subvector_len).min(self.dimension);

                let mut block = Vec::with_capacity(self.subvector_len);
                block.extend(vector[start..end].iter().map(|&v| v as f32));
                block.resize(self.subvector_len, 0.0);
                block
            })
            .collect();

        Ok(subvectors)
    }
}

/// Split `vector` into `num_subvectors` blocks of length `ceil(len / num_subvectors)`.
///
/// Convenience wrapper over [`SubvectorLayout::split`] with the layout inferred
/// from `vector.len()`.
///
/// # Errors
///
/// Returns [`PqError::InvalidConfiguration`] if `num_subvectors` is 0 or
/// greater than `vector.len()`.
pub fn split(vector: &[u32], num_subvectors: usize) -> Result<Vec<Vec<f32>>> {
    SubvectorLayout::new(vector.len(), num_subvectors)?.split(vector)
}
