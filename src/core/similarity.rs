/// Convert a coded vector to floating point
#[inline]
pub fn to_vector(codes: &[i32]) -> Vec<f64> {
    codes.iter().map(|c| f64::from(*c)).collect()
}

/// Euclidean norm of a vector
#[inline]
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine similarity between two vectors
///
/// A zero vector has no direction, so its similarity to anything is 0.
///
/// # Returns
/// Similarity in [-1, 1]
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    cosine_with_norms(a, norm(a), b, norm(b))
}

/// Cosine similarity with precomputed norms
#[inline]
pub fn cosine_with_norms(a: &[f64], norm_a: f64, b: &[f64], norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Euclidean distance between two vectors
#[inline]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Map a distance onto a similarity in (0, 1]
///
/// Identical vectors score exactly 1.
#[inline]
pub fn distance_to_similarity(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}
