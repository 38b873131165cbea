//! Per-column diagnostic table.
//!
//! One row per column with its type, the table's total element count, the
//! percentage of missing values and the most frequent value. The element
//! count is the whole table's cell count (`rows × columns`) repeated on every
//! row, not a per-column count.

use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use lt_common::{ColumnView, LossTable};
use lt_math::{missing_percentage, mode};
use serde::Serialize;

use crate::error::Result;

/// Diagnostic summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRow {
    pub feature: String,
    pub dtype: String,
    pub n_elems: i64,
    pub null_pct: f64,
    /// `None` when the column has no non-missing values.
    pub most_freq: Option<String>,
}

/// Diagnostic summary of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub rows: Vec<DiagnosticRow>,
}

/// Summarize every column of `table`.
pub fn inspect(table: &LossTable) -> DiagnosticReport {
    let n_elems = (table.len() * table.column_count()) as i64;
    let rows = table
        .columns()
        .into_iter()
        .map(|col| describe(col, n_elems))
        .collect();
    DiagnosticReport { rows }
}

fn describe(col: ColumnView<'_>, n_elems: i64) -> DiagnosticRow {
    // Date and day columns never hold missing values.
    let dense_pct = if col.is_empty() { f64::NAN } else { 0.0 };

    let (dtype, null_pct, most_freq) = match col {
        ColumnView::Date(dates) => (
            "date",
            dense_pct,
            mode(dates.iter().copied()).map(|d| d.format("%Y-%m-%d").to_string()),
        ),
        ColumnView::Day(days) => (
            "int64",
            dense_pct,
            mode(days.iter().copied()).map(|d| d.to_string()),
        ),
        ColumnView::Count(category) => (
            if category.has_missing() { "int64?" } else { "int64" },
            missing_percentage(&category.values),
            mode(category.values.iter().flatten().copied()).map(|v| v.to_string()),
        ),
        ColumnView::Text(text) => (
            "string",
            missing_percentage(text),
            mode(text.iter().flatten().map(String::as_str)).map(str::to_string),
        ),
    };

    DiagnosticRow {
        feature: col.name().to_string(),
        dtype: dtype.to_string(),
        n_elems,
        null_pct,
        most_freq,
    }
}

impl DiagnosticReport {
    pub fn row(&self, feature: &str) -> Option<&DiagnosticRow> {
        self.rows.iter().find(|r| r.feature == feature)
    }

    /// The report as an Arrow record batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("features", DataType::Utf8, false),
            Field::new("dtypes", DataType::Utf8, false),
            Field::new("N. of elems", DataType::Int64, false),
            Field::new("NULL perc.", DataType::Float64, false),
            Field::new("most freq. val", DataType::Utf8, true),
        ]));

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(
                self.rows.iter().map(|r| r.feature.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                self.rows.iter().map(|r| r.dtype.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                self.rows.iter().map(|r| r.n_elems).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                self.rows.iter().map(|r| r.null_pct).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                self.rows
                    .iter()
                    .map(|r| r.most_freq.as_deref())
                    .collect::<Vec<_>>(),
            )),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Render as a plain-text table.
    pub fn render(&self) -> Result<String> {
        let batch = self.to_record_batch()?;
        Ok(pretty_format_batches(&[batch])?.to_string())
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
