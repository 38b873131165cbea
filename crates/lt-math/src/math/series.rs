//! Element-wise operations on count series.
//!
//! Series are row-ordered; a `None` element is a missing observation.

/// Replace missing values with `fill`.
pub fn fill_missing(values: &[Option<i64>], fill: i64) -> Vec<i64> {
    values.iter().map(|v| v.unwrap_or(fill)).collect()
}

/// First difference of a cumulative series.
///
/// `out[i] = values[i] - values[i - 1]`. The first element has no baseline
/// and is 0; a difference with a missing operand is also 0.
///
/// Returns `None` if a difference overflows `i64`.
pub fn first_difference(values: &[Option<i64>]) -> Option<Vec<i64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<i64> = None;
    for (i, &cur) in values.iter().enumerate() {
        let delta = match (i, prev, cur) {
            (0, _, _) => 0,
            (_, Some(p), Some(c)) => c.checked_sub(p)?,
            _ => 0,
        };
        out.push(delta);
        prev = cur;
    }
    Some(out)
}

/// Running total of a delta series, starting from zero.
pub fn prefix_sum(deltas: &[i64]) -> Vec<i64> {
    deltas
        .iter()
        .scan(0i64, |acc, &d| {
            *acc += d;
            Some(*acc)
        })
        .collect()
}
