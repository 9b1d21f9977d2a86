//! SIMD-optimized distance functions using the `wide` crate.
//!
//! Processes 8 floats at a time using `f32x8`, with a scalar loop for the
//! remainder. The `wide` crate picks the best instruction set available
//! (SSE2/AVX on x86, NEON on ARM, SIMD128 on WebAssembly).

use wide::f32x8;

/// Number of f32 elements processed per SIMD iteration.
const SIMD_WIDTH: usize = 8;

/// Convert a slice to a fixed-size array for SIMD.
/// Returns zero array if conversion fails (cannot happen with correct loop bounds).
#[inline]
fn slice_to_simd_array(slice: &[f32]) -> [f32; SIMD_WIDTH] {
    slice.try_into().unwrap_or([0.0; SIMD_WIDTH])
}

/// Calculate the squared Euclidean (L2) distance between two vectors.
///
/// # Panics
///
/// Debug-panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let len = a.len().min(b.len());
    let simd_len = len - (len % SIMD_WIDTH);

    let mut sum = f32x8::ZERO;

    for i in (0..simd_len).step_by(SIMD_WIDTH) {
        let va = f32x8::new(slice_to_simd_array(&a[i..i + SIMD_WIDTH]));
        let vb = f32x8::new(slice_to_simd_array(&b[i..i + SIMD_WIDTH]));
        let diff = va - vb;
        sum += diff * diff;
    }

    let mut result = horizontal_sum(sum);

    for i in simd_len..len {
        let diff = a[i] - b[i];
        result += diff * diff;
    }

    result
}

#[inline]
fn horizontal_sum(v: f32x8) -> f32 {
    let arr: [f32; 8] = v.to_array();
    arr.iter().sum()
}
