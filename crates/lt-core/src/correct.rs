//! Applying revision tables.
//!
//! A correction table has the same shape as the data it corrects but only
//! holds the rows that were revised. Its counts are added to the base rows
//! with the same day index. Every correction row and column must match the
//! base table; if any does not, nothing is applied.

use lt_common::{Error, LossTable, Result};
use tracing::debug;

/// What to do with the free-text "greatest losses direction" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionColumn {
    #[default]
    Drop,
    Keep,
}

/// Add `corrections` to `base`, joined on day index.
///
/// With no corrections this returns a copy of `base`. The direction column is
/// dropped unless `direction` is [`DirectionColumn::Keep`].
///
/// A missing correction cell leaves the base value alone. A missing base
/// value with a correction takes the correction value, rather than staying
/// missing. Only count cells change; dates and day indexes are never touched.
pub fn apply_corrections(
    base: &LossTable,
    corrections: Option<&LossTable>,
    direction: DirectionColumn,
) -> Result<LossTable> {
    let mut corrected = base.clone();

    if let Some(corrections) = corrections {
        let targets: Vec<Option<usize>> = corrections
            .days()
            .iter()
            .map(|day| base.position_of_day(*day))
            .collect();
        let unmatched_days: Vec<i64> = corrections
            .days()
            .iter()
            .zip(&targets)
            .filter(|(_, target)| target.is_none())
            .map(|(day, _)| *day)
            .collect();
        let unknown_columns: Vec<String> = corrections
            .category_names()
            .filter(|name| base.category(name).is_none())
            .map(str::to_string)
            .collect();
        if !unmatched_days.is_empty() || !unknown_columns.is_empty() {
            return Err(Error::CorrectionAlignment {
                unmatched_days,
                unknown_columns,
            });
        }

        let mut cells = 0usize;
        for (row, target) in targets.into_iter().enumerate() {
            let Some(target) = target else { continue };
            for column in corrections.categories() {
                if let Some(delta) = column.values[row] {
                    if corrected.adjust(target, &column.name, delta)? {
                        cells += 1;
                    }
                }
            }
        }
        debug!(rows = corrections.len(), cells, "corrections applied");
    }

    Ok(match direction {
        DirectionColumn::Drop => corrected.without_direction(),
        DirectionColumn::Keep => corrected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lt_common::CategoryColumn;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 3, day).unwrap()
    }

    fn base() -> LossTable {
        LossTable::new(
            vec![date(1), date(2), date(3)],
            vec![1, 2, 3],
            vec![
                CategoryColumn::dense("tank", [10, 12, 15]),
                CategoryColumn::new("drone", vec![None, Some(4), Some(6)]),
            ],
            Some(vec![None, Some("Izium".to_string()), None]),
        )
        .unwrap()
    }

    #[test]
    fn corrects_matching_day() {
        let corrections = LossTable::new(
            vec![date(2)],
            vec![2],
            vec![CategoryColumn::dense("tank", [1])],
            None,
        )
        .unwrap();

        let out = apply_corrections(&base(), Some(&corrections), DirectionColumn::Drop).unwrap();
        assert_eq!(
            out.category("tank").unwrap().values,
            vec![Some(10), Some(13), Some(15)]
        );
        assert_eq!(out.category("drone"), base().category("drone"));
        assert!(out.direction().is_none());
    }

    #[test]
    fn none_is_identity_apart_from_direction() {
        let out = apply_corrections(&base(), None, DirectionColumn::Drop).unwrap();
        assert_eq!(out, base().without_direction());

        let kept = apply_corrections(&base(), None, DirectionColumn::Keep).unwrap();
        assert_eq!(kept, base());
    }

    #[test]
    fn missing_cells() {
        let corrections = LossTable::new(
            vec![date(1), date(3)],
            vec![1, 3],
            vec![
                CategoryColumn::new("tank", vec![None, Some(-2)]),
                CategoryColumn::new("drone", vec![Some(1), None]),
            ],
            None,
        )
        .unwrap();

        let out = apply_corrections(&base(), Some(&corrections), DirectionColumn::Keep).unwrap();
        assert_eq!(
            out.category("tank").unwrap().values,
            vec![Some(10), Some(12), Some(13)]
        );
        // Missing base value with a correction takes the correction.
        assert_eq!(
            out.category("drone").unwrap().values,
            vec![Some(1), Some(4), Some(6)]
        );
    }

    #[test]
    fn only_count_cells_change() {
        let corrections = LossTable::new(
            vec![date(1), date(3)],
            vec![1, 3],
            vec![CategoryColumn::dense("tank", [5, -1])],
            None,
        )
        .unwrap();

        let out = apply_corrections(&base(), Some(&corrections), DirectionColumn::Keep).unwrap();
        assert_eq!(out.days(), base().days());
        assert_eq!(out.dates(), base().dates());
        assert_eq!(out.direction(), base().direction());
        assert_eq!(out.category("tank").unwrap().values[1], Some(12));
    }

    #[test]
    fn overflowing_correction_is_malformed() {
        let corrections = LossTable::new(
            vec![date(1)],
            vec![1],
            vec![CategoryColumn::dense("tank", [i64::MAX])],
            None,
        )
        .unwrap();

        let err = apply_corrections(&base(), Some(&corrections), DirectionColumn::Drop).unwrap_err();
        assert!(matches!(err, Error::MalformedData(_)));
    }

    #[test]
    fn unmatched_day_is_alignment_error() {
        let corrections = LossTable::new(
            vec![date(9)],
            vec![9],
            vec![CategoryColumn::dense("tank", [1])],
            None,
        )
        .unwrap();

        let err = apply_corrections(&base(), Some(&corrections), DirectionColumn::Drop).unwrap_err();
        match err {
            Error::CorrectionAlignment { unmatched_days, .. } => assert_eq!(unmatched_days, vec![9]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_column_is_alignment_error() {
        let corrections = LossTable::new(
            vec![date(2)],
            vec![2],
            vec![CategoryColumn::dense("submarines", [1])],
            None,
        )
        .unwrap();

        let err = apply_corrections(&base(), Some(&corrections), DirectionColumn::Drop).unwrap_err();
        assert!(matches!(
            err,
            Error::CorrectionAlignment { ref unknown_columns, .. } if unknown_columns == &["submarines"]
        ));
    }
}
