/// Score given to every element of a set with no spread.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Min-max scale `scores` onto `[0, 1]`, preserving length and order.
///
/// An empty input yields an empty output. When every value is equal there
/// is nothing to rank, so every element gets [`NEUTRAL_SCORE`] rather than
/// an arbitrary 0 or 1.
///
/// # Examples
///
/// ```
/// use opportunity_evaluator::scoring::normalize::normalize;
///
/// assert_eq!(normalize(&[10.0, 20.0, 30.0]), vec![0.0, 0.5, 1.0]);
/// assert_eq!(normalize(&[7.0, 7.0]), vec![0.5, 0.5]);
/// assert!(normalize(&[]).is_empty());
/// ```
pub fn normalize(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return vec![NEUTRAL_SCORE; scores.len()];
    }

    let span = max - min;
    scores
        .iter()
        .map(|score| ((score - min) / span).clamp(0.0, 1.0))
        .collect()
}
