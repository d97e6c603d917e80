//! Cosine similarity over embedding vectors.

/// Added to the denominator so zero-norm vectors divide to 0 instead of NaN.
pub const NORM_EPSILON: f32 = 1e-8;

/// L2 norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity: `dot(a, b) / (||a|| * ||b|| + NORM_EPSILON)`.
///
/// Mismatched lengths are compared over the shorter prefix; the model
/// always produces fixed-length vectors so this only matters for stubs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (l2_norm(a) * l2_norm(b) + NORM_EPSILON)
}
