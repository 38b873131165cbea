//! Column summary statistics.

use std::collections::BTreeMap;

/// Most frequent value. Ties resolve to the smallest value; `None` for an
/// empty input.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        // BTreeMap iterates in ascending order, so only a strictly larger
        // count may replace the current best.
        let replace = match &best {
            Some((_, best_count)) => count > *best_count,
            None => true,
        };
        if replace {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Percentage (0–100) of missing elements. `NaN` for an empty column.
pub fn missing_percentage<T>(values: &[Option<T>]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let missing = values.iter().filter(|v| v.is_none()).count();
    100.0 * missing as f64 / values.len() as f64
}
