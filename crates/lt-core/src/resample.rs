//! Turning cumulative counts into per-period losses.
//!
//! With [`PeriodSpec::None`] the table stays cumulative and only missing
//! counts are replaced by zero. Any other period differences each category
//! (first row 0), shifts the day index back by one, and sums the daily deltas
//! into right-closed buckets `(edge - period, edge]` labelled by their right
//! edge. Each bucket keeps the largest day index it covers. Buckets without
//! rows are not emitted.
//!
//! Bucket edges are anchored on the first date:
//! - `nD`: `first + k·n` days
//! - `nW`: Sundays, from the first Sunday on or after `first`, every `n` weeks
//! - `nM`: month ends, from the end of `first`'s month, every `n` months
//!
//! Resampling an already resampled table differences it a second time.

use chrono::{Datelike, Days, Months, NaiveDate};
use lt_common::{CategoryColumn, Error, LossTable, PeriodSpec, Result, DAY_COLUMN};
use lt_math::{fill_missing, first_difference};
use tracing::{info, warn};

/// Resample `table` to `period`.
pub fn resample(table: &LossTable, period: PeriodSpec) -> Result<LossTable> {
    if period.is_none() {
        return sanitize(table);
    }

    let Some(&first) = table.dates().first() else {
        let empty = table
            .categories()
            .iter()
            .map(|c| CategoryColumn::new(c.name.clone(), Vec::new()))
            .collect();
        return LossTable::new(Vec::new(), Vec::new(), empty, None);
    };
    let bucketer = Bucketer::new(period, first)?;

    let deltas: Vec<Vec<i64>> = table
        .categories()
        .iter()
        .map(|col| {
            first_difference(&col.values).ok_or_else(|| {
                Error::MalformedData(format!("daily change of '{}' overflows i64", col.name))
            })
        })
        .collect::<Result<_>>()?;
    for (col, delta) in table.categories().iter().zip(&deltas) {
        let decreases = delta.iter().filter(|d| **d < 0).count();
        if decreases > 0 {
            warn!(
                category = %col.name,
                decreases,
                "cumulative count decreased; negative deltas kept"
            );
        }
    }

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut days: Vec<i64> = Vec::new();
    let mut sums: Vec<Vec<i64>> = vec![Vec::new(); deltas.len()];

    for (row, (&date, &day)) in table.dates().iter().zip(table.days()).enumerate() {
        let edge = bucketer.edge_for(date)?;
        let day = day.checked_sub(1).ok_or_else(|| overflow(DAY_COLUMN, edge))?;

        if dates.last() == Some(&edge) {
            if let Some(last) = days.last_mut() {
                *last = (*last).max(day);
            }
            for ((sum, delta), col) in sums.iter_mut().zip(&deltas).zip(table.categories()) {
                if let Some(last) = sum.last_mut() {
                    *last = last
                        .checked_add(delta[row])
                        .ok_or_else(|| overflow(&col.name, edge))?;
                }
            }
        } else {
            dates.push(edge);
            days.push(day);
            for (sum, delta) in sums.iter_mut().zip(&deltas) {
                sum.push(delta[row]);
            }
        }
    }

    let categories = table
        .categories()
        .iter()
        .zip(sums)
        .map(|(col, values)| CategoryColumn::dense(col.name.clone(), values))
        .collect();

    info!(
        period = %period,
        rows = table.len(),
        buckets = dates.len(),
        "resampled"
    );
    LossTable::new(dates, days, categories, None)
}

/// Replace missing counts with zero, leaving everything else untouched.
fn sanitize(table: &LossTable) -> Result<LossTable> {
    let (dates, days, categories, direction) = table.clone().into_parts();
    let categories = categories
        .into_iter()
        .map(|col| CategoryColumn::dense(col.name, fill_missing(&col.values, 0)))
        .collect();
    LossTable::new(dates, days, categories, direction)
}

/// `ceil(a / b)` for `b > 0`.
fn ceil_div(a: i64, b: i64) -> i64 {
    -((-a).div_euclid(b))
}

fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

fn month_end(index: i64) -> Option<NaiveDate> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Maps a date to the right edge of its bucket.
#[derive(Debug, Clone, Copy)]
enum Bucketer {
    Days { anchor: NaiveDate, step: i64 },
    Weeks { first_edge: NaiveDate, step: i64 },
    Months { anchor: i64, step: i64 },
}

impl Bucketer {
    fn new(period: PeriodSpec, first: NaiveDate) -> Result<Self> {
        match period {
            PeriodSpec::None => Err(Error::InvalidPeriod(
                "no buckets for period 'none'".to_string(),
            )),
            PeriodSpec::Days(n) => Ok(Bucketer::Days {
                anchor: first,
                step: i64::from(n),
            }),
            PeriodSpec::Weeks(n) => {
                let to_sunday = (7 - first.weekday().num_days_from_sunday()) % 7;
                let first_edge = first
                    .checked_add_days(Days::new(u64::from(to_sunday)))
                    .ok_or_else(|| out_of_range(first))?;
                Ok(Bucketer::Weeks {
                    first_edge,
                    step: 7 * i64::from(n),
                })
            }
            PeriodSpec::Months(n) => Ok(Bucketer::Months {
                anchor: month_index(first),
                step: i64::from(n),
            }),
        }
    }

    fn edge_for(&self, date: NaiveDate) -> Result<NaiveDate> {
        let edge = match *self {
            Bucketer::Days { anchor, step } => {
                let k = ceil_div((date - anchor).num_days(), step).max(0);
                anchor.checked_add_days(Days::new((k * step) as u64))
            }
            Bucketer::Weeks { first_edge, step } => {
                let k = ceil_div((date - first_edge).num_days(), step).max(0);
                first_edge.checked_add_days(Days::new((k * step) as u64))
            }
            Bucketer::Months { anchor, step } => {
                let k = ceil_div(month_index(date) - anchor, step).max(0);
                month_end(anchor + k * step)
            }
        };
        edge.ok_or_else(|| out_of_range(date))
    }
}

fn overflow(column: &str, edge: NaiveDate) -> Error {
    Error::MalformedData(format!("'{column}' overflows i64 in the bucket ending {edge}"))
}

fn out_of_range(date: NaiveDate) -> Error {
    Error::MalformedData(format!("bucket edge for {date} is out of the calendar range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Consecutive days starting 2022-02-24 (a Thursday), day index from 1.
    fn daily(tank: &[i64]) -> LossTable {
        let start = ymd(2022, 2, 24);
        let dates = (0..tank.len() as u64)
            .map(|i| start + Days::new(i))
            .collect();
        let days = (1..=tank.len() as i64).collect();
        LossTable::new(
            dates,
            days,
            vec![CategoryColumn::dense("tank", tank.iter().copied())],
            None,
        )
        .unwrap()
    }

    fn tank(table: &LossTable) -> Vec<i64> {
        table
            .category("tank")
            .unwrap()
            .values
            .iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn none_keeps_cumulative_counts() {
        let table = daily(&[0, 3, 3, 7]);
        let out = resample(&table, PeriodSpec::None).unwrap();
        assert_eq!(out, table);
    }

    #[test]
    fn none_fills_missing_and_keeps_direction() {
        let table = LossTable::new(
            vec![ymd(2022, 3, 1), ymd(2022, 3, 2)],
            vec![6, 7],
            vec![CategoryColumn::new("drone", vec![None, Some(2)])],
            Some(vec![Some("Kyiv".to_string()), None]),
        )
        .unwrap();
        let out = resample(&table, PeriodSpec::None).unwrap();
        assert_eq!(out.category("drone").unwrap().values, vec![Some(0), Some(2)]);
        assert_eq!(out.direction(), table.direction());
    }

    #[test]
    fn daily_gives_deltas() {
        let out = resample(&daily(&[0, 3, 3, 7]), PeriodSpec::DAILY).unwrap();
        assert_eq!(tank(&out), vec![0, 3, 0, 4]);
        assert_eq!(out.days(), &[0, 1, 2, 3]);
        assert_eq!(out.dates()[0], ymd(2022, 2, 24));
    }

    #[test]
    fn three_day_buckets_are_right_closed() {
        // Deltas: 0, 1, 2, 3, 4, 5, 6
        let out = resample(&daily(&[0, 1, 3, 6, 10, 15, 21]), PeriodSpec::Days(3)).unwrap();
        assert_eq!(
            out.dates(),
            &[ymd(2022, 2, 24), ymd(2022, 2, 27), ymd(2022, 3, 2)]
        );
        assert_eq!(tank(&out), vec![0, 1 + 2 + 3, 4 + 5 + 6]);
        assert_eq!(out.days(), &[0, 3, 6]);
    }

    #[test]
    fn weekly_buckets_end_on_sunday() {
        // 2022-02-24 (Thu) .. 2022-03-02 (Wed)
        let out = resample(&daily(&[0, 1, 2, 3, 4, 5, 6]), PeriodSpec::Weeks(1)).unwrap();
        assert_eq!(out.dates(), &[ymd(2022, 2, 27), ymd(2022, 3, 6)]);
        assert_eq!(tank(&out), vec![3, 3]);
        assert_eq!(out.days(), &[3, 6]);
    }

    #[test]
    fn monthly_buckets_end_on_month_end() {
        let table = LossTable::new(
            vec![ymd(2022, 2, 25), ymd(2022, 2, 28), ymd(2022, 3, 1), ymd(2022, 4, 30)],
            vec![2, 5, 6, 66],
            vec![CategoryColumn::dense("tank", [80, 290, 300, 1000])],
            None,
        )
        .unwrap();
        let out = resample(&table, PeriodSpec::Months(1)).unwrap();
        assert_eq!(
            out.dates(),
            &[ymd(2022, 2, 28), ymd(2022, 3, 31), ymd(2022, 4, 30)]
        );
        assert_eq!(tank(&out), vec![210, 10, 700]);
    }

    #[test]
    fn empty_buckets_are_skipped() {
        let table = LossTable::new(
            vec![ymd(2022, 3, 1), ymd(2022, 3, 11)],
            vec![6, 16],
            vec![CategoryColumn::dense("tank", [10, 50])],
            None,
        )
        .unwrap();
        let out = resample(&table, PeriodSpec::Days(3)).unwrap();
        assert_eq!(out.dates(), &[ymd(2022, 3, 1), ymd(2022, 3, 13)]);
        assert_eq!(tank(&out), vec![0, 40]);
    }

    #[test]
    fn bucketing_drops_direction() {
        let table = LossTable::new(
            vec![ymd(2022, 3, 1)],
            vec![6],
            vec![CategoryColumn::dense("tank", [1])],
            Some(vec![Some("Kyiv".to_string())]),
        )
        .unwrap();
        let out = resample(&table, PeriodSpec::DAILY).unwrap();
        assert!(out.direction().is_none());
    }

    #[test]
    fn gaps_in_cumulative_series_are_zero() {
        let table = LossTable::new(
            vec![ymd(2022, 3, 1), ymd(2022, 3, 2), ymd(2022, 3, 3)],
            vec![6, 7, 8],
            vec![CategoryColumn::new("drone", vec![None, Some(5), Some(9)])],
            None,
        )
        .unwrap();
        let out = resample(&table, PeriodSpec::DAILY).unwrap();
        assert_eq!(out.category("drone").unwrap().values, vec![Some(0), Some(0), Some(4)]);
    }

    #[test]
    fn empty_table_keeps_columns() {
        let table = LossTable::new(
            vec![],
            vec![],
            vec![CategoryColumn::new("tank", vec![])],
            None,
        )
        .unwrap();
        let out = resample(&table, PeriodSpec::Weeks(2)).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.categories().len(), 1);
    }

    #[test]
    fn resampling_twice_differences_twice() {
        let once = resample(&daily(&[0, 3, 3, 7]), PeriodSpec::DAILY).unwrap();
        let twice = resample(&once, PeriodSpec::DAILY).unwrap();
        assert_eq!(tank(&twice), vec![0, 3, -3, 4]);
    }

    #[test]
    fn overflowing_difference_is_malformed() {
        let table = LossTable::new(
            vec![ymd(2022, 3, 1), ymd(2022, 3, 2)],
            vec![6, 7],
            vec![CategoryColumn::dense("tank", [-5, i64::MAX])],
            None,
        )
        .unwrap();
        let err = resample(&table, PeriodSpec::DAILY).unwrap_err();
        assert!(matches!(err, Error::MalformedData(ref m) if m.contains("tank")));
    }

    #[test]
    fn overflowing_bucket_sum_is_malformed() {
        // Each daily change fits; their sum within one bucket does not.
        let table = LossTable::new(
            vec![ymd(2022, 3, 1), ymd(2022, 3, 2), ymd(2022, 3, 3)],
            vec![6, 7, 8],
            vec![CategoryColumn::dense("tank", [i64::MIN + 1, 0, 1])],
            None,
        )
        .unwrap();
        let err = resample(&table, PeriodSpec::Days(3)).unwrap_err();
        assert!(matches!(err, Error::MalformedData(_)));
    }

    #[test]
    fn lowest_day_index_is_malformed() {
        let table = LossTable::new(
            vec![ymd(2022, 3, 1)],
            vec![i64::MIN],
            vec![CategoryColumn::dense("tank", [1])],
            None,
        )
        .unwrap();
        assert!(matches!(
            resample(&table, PeriodSpec::DAILY),
            Err(Error::MalformedData(_))
        ));
    }

    #[test]
    fn ceil_div_handles_signs() {
        assert_eq!(ceil_div(0, 3), 0);
        assert_eq!(ceil_div(5, 3), 2);
        assert_eq!(ceil_div(6, 3), 2);
        assert_eq!(ceil_div(-6, 7), 0);
        assert_eq!(ceil_div(-7, 7), -1);
    }

    #[test]
    fn month_end_of_december() {
        assert_eq!(month_end(2022 * 12 + 11), Some(ymd(2022, 12, 31)));
        assert_eq!(month_end(2024 * 12 + 1), Some(ymd(2024, 2, 29)));
    }
}
