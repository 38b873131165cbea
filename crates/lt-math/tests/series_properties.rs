//! Property-based tests for series primitives.

use lt_math::{first_difference, mode, prefix_sum};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Prefix-summing the deltas of a dense cumulative series gives the
    /// series shifted to start at zero.
    #[test]
    fn prefix_sum_inverts_difference(values in prop::collection::vec(0i64..1_000_000, 1..200)) {
        let dense: Vec<Option<i64>> = values.iter().copied().map(Some).collect();
        let rebuilt = prefix_sum(&first_difference(&dense).unwrap());
        for (i, total) in rebuilt.iter().enumerate() {
            prop_assert_eq!(*total, values[i] - values[0]);
        }
    }

    /// Differencing never changes the length and always starts at zero.
    #[test]
    fn difference_shape(values in prop::collection::vec(prop::option::of(0i64..10_000), 0..100)) {
        let deltas = first_difference(&values).unwrap();
        prop_assert_eq!(deltas.len(), values.len());
        if let Some(first) = deltas.first() {
            prop_assert_eq!(*first, 0);
        }
    }

    /// Differences of a non-decreasing series are non-negative.
    #[test]
    fn non_decreasing_gives_non_negative(steps in prop::collection::vec(0i64..500, 1..100)) {
        let cumulative: Vec<Option<i64>> = prefix_sum(&steps).into_iter().map(Some).collect();
        prop_assert!(first_difference(&cumulative).unwrap().iter().all(|d| *d >= 0));
    }

    /// The mode is always an element of the input.
    #[test]
    fn mode_is_member(values in prop::collection::vec(-50i64..50, 1..60)) {
        let m = mode(values.iter().copied()).unwrap();
        prop_assert!(values.contains(&m));
    }
}
