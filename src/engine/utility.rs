/// Computes the arithmetic mean of a slice of values. Returns `None` for empty
/// input rather than NaN.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `part / total` as a fraction in `[0, 1]`. Defined as 0.0 when `total` is 0.
pub fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
