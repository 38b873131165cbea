//! Columnar loss table.
//!
//! A [`LossTable`] holds one row per reporting date: the date, the day index
//! (days since tracking started) and one count per equipment category. The
//! same type carries cumulative counts as loaded, additive corrections, and
//! per-period deltas after resampling.
//!
//! Invariants checked by [`LossTable::new`]:
//! - every column has the same number of rows
//! - day indexes are strictly increasing
//! - dates are non-decreasing
//! - category names are unique and not reserved

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{self, DATE_COLUMN, DAY_COLUMN, DIRECTION_COLUMN};

/// One equipment category and its per-row counts. `None` is a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColumn {
    pub name: String,
    pub values: Vec<Option<i64>>,
}

impl CategoryColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a column with no missing values.
    pub fn dense(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Option::is_none)
    }
}

/// Borrowed view of any column, in display order.
#[derive(Debug, Clone, Copy)]
pub enum ColumnView<'a> {
    Date(&'a [NaiveDate]),
    Day(&'a [i64]),
    Count(&'a CategoryColumn),
    Text(&'a [Option<String>]),
}

impl<'a> ColumnView<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ColumnView::Date(_) => DATE_COLUMN,
            ColumnView::Day(_) => DAY_COLUMN,
            ColumnView::Count(col) => &col.name,
            ColumnView::Text(_) => DIRECTION_COLUMN,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnView::Date(v) => v.len(),
            ColumnView::Day(v) => v.len(),
            ColumnView::Count(col) => col.values.len(),
            ColumnView::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Table of loss counts keyed by date and day index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LossTable {
    dates: Vec<NaiveDate>,
    days: Vec<i64>,
    categories: Vec<CategoryColumn>,
    direction: Option<Vec<Option<String>>>,
}

impl LossTable {
    /// Build a table, checking the structural invariants.
    pub fn new(
        dates: Vec<NaiveDate>,
        days: Vec<i64>,
        categories: Vec<CategoryColumn>,
        direction: Option<Vec<Option<String>>>,
    ) -> Result<Self> {
        let rows = dates.len();
        if days.len() != rows {
            return Err(Error::MalformedData(format!(
                "column '{DAY_COLUMN}' has {} rows, expected {rows}",
                days.len()
            )));
        }

        let mut seen = HashSet::new();
        for col in &categories {
            if schema::is_reserved(&col.name) {
                return Err(Error::MalformedData(format!(
                    "'{}' is reserved and cannot be a category",
                    col.name
                )));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(Error::MalformedData(format!(
                    "duplicate column '{}'",
                    col.name
                )));
            }
            if col.values.len() != rows {
                return Err(Error::MalformedData(format!(
                    "column '{}' has {} rows, expected {rows}",
                    col.name,
                    col.values.len()
                )));
            }
        }

        if let Some(text) = &direction {
            if text.len() != rows {
                return Err(Error::MalformedData(format!(
                    "column '{DIRECTION_COLUMN}' has {} rows, expected {rows}",
                    text.len()
                )));
            }
        }

        if let Some(pair) = days.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::MalformedData(format!(
                "day index must be strictly increasing, found {} after {}",
                pair[1], pair[0]
            )));
        }
        if let Some(pair) = dates.windows(2).find(|w| w[1] < w[0]) {
            return Err(Error::MalformedData(format!(
                "dates must be in order, found {} after {}",
                pair[1], pair[0]
            )));
        }

        Ok(Self {
            dates,
            days,
            categories,
            direction,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of columns, including date and day.
    pub fn column_count(&self) -> usize {
        2 + self.categories.len() + usize::from(self.direction.is_some())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn days(&self) -> &[i64] {
        &self.days
    }

    pub fn categories(&self) -> &[CategoryColumn] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryColumn> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn direction(&self) -> Option<&[Option<String>]> {
        self.direction.as_deref()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Row position of a day index.
    pub fn position_of_day(&self, day: i64) -> Option<usize> {
        self.days.binary_search(&day).ok()
    }

    /// All columns in display order: date, day, categories, direction.
    pub fn columns(&self) -> Vec<ColumnView<'_>> {
        let mut out = Vec::with_capacity(self.column_count());
        out.push(ColumnView::Date(&self.dates));
        out.push(ColumnView::Day(&self.days));
        out.extend(self.categories.iter().map(ColumnView::Count));
        if let Some(text) = &self.direction {
            out.push(ColumnView::Text(text));
        }
        out
    }

    /// Add `delta` to the count at (`row`, `category`). A missing base value
    /// is treated as zero.
    ///
    /// Returns `Ok(false)` if the category does not exist or the row is out
    /// of range, and [`Error::MalformedData`] if the sum overflows.
    pub fn adjust(&mut self, row: usize, category: &str, delta: i64) -> Result<bool> {
        let Some(col) = self.categories.iter_mut().find(|c| c.name == category) else {
            return Ok(false);
        };
        let Some(cell) = col.values.get_mut(row) else {
            return Ok(false);
        };
        let value = cell.unwrap_or(0).checked_add(delta).ok_or_else(|| {
            Error::MalformedData(format!(
                "correction of {delta} to '{category}' at day {} overflows i64",
                self.days[row]
            ))
        })?;
        *cell = Some(value);
        Ok(true)
    }

    /// Remove the free-text direction column, if any.
    pub fn without_direction(mut self) -> Self {
        self.direction = None;
        self
    }

    pub fn into_parts(
        self,
    ) -> (
        Vec<NaiveDate>,
        Vec<i64>,
        Vec<CategoryColumn>,
        Option<Vec<Option<String>>>,
    ) {
        (self.dates, self.days, self.categories, self.direction)
    }
}
