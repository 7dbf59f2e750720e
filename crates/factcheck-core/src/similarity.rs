/// Euclidean (L2) distance between two f32 slices.
///
/// Panics if slices have different lengths.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    squared_l2_distance(a, b).sqrt()
}

/// Squared Euclidean distance, the quantity the flat index ranks by.
pub fn squared_l2_distance(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(
        a.len(),
        b.len(),
        "vector dimension mismatch: {} vs {}",
        a.len(),
        b.len()
    );

    let mut sum = 0.0f32;
    for i in 0..a.len() {
        let d = a[i] - b[i];
        sum += d * d;
    }
    sum
}

/// Map an L2 distance onto a similarity in (0, 1].
///
/// `1 / (1 + d)`: exactly 1.0 at distance zero and strictly decreasing
/// as the distance grows. Negative or NaN distances are clamped to zero.
pub fn similarity_from_distance(distance: f32) -> f32 {
    let d = if distance.is_nan() { 0.0 } else { distance.max(0.0) };
    1.0 / (1.0 + d)
}

/// L2 normalize a vector in place. Zero vectors are left untouched.
pub fn normalize_in_place(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
