//! Event-aligned plots.
//!
//! Events split a table into consecutive segments `[event, next_event)`, the
//! last one open-ended. For each requested category the figure gets one
//! subplot where every segment is drawn from x = 0, so the x axis reads as
//! "periods since the event" and campaigns can be compared side by side.

use std::ops::Range;
use std::path::Path;

use chrono::NaiveDate;
use lt_common::{EventMarker, LossTable, PeriodSpec};
use plotters::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ReportError, Result};
use crate::render;

/// Figure size and line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub stroke_width: u32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 1200,
            stroke_width: 2,
        }
    }
}

/// Rows of a table belonging to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSegment {
    pub event: NaiveDate,
    pub label: String,
    pub rows: Range<usize>,
}

/// One line on a subplot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub label: String,
    pub event: NaiveDate,
    /// y values; the x value is the position in this vector.
    pub values: Vec<Option<i64>>,
}

/// One subplot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axes {
    pub column: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// Vertically stacked subplots, one per requested column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub stroke_width: u32,
    pub axes: Vec<Axes>,
}

/// Split `table` into one segment per event, in chronological order.
///
/// Rows dated before the first event belong to no segment; every other row
/// belongs to exactly one. Events outside the table's range yield empty
/// segments.
pub fn event_segments(table: &LossTable, events: &[EventMarker]) -> Vec<EventSegment> {
    let mut ordered: Vec<&EventMarker> = events.iter().collect();
    ordered.sort_by_key(|e| e.date);

    let dates = table.dates();
    let first_row_on_or_after = |date: NaiveDate| dates.partition_point(|d| *d < date);

    ordered
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let start = first_row_on_or_after(event.date);
            let end = ordered
                .get(i + 1)
                .map(|next| first_row_on_or_after(next.date))
                .unwrap_or(dates.len());
            EventSegment {
                event: event.date,
                label: event.legend(),
                rows: start..end.max(start),
            }
        })
        .collect()
}

/// Build the event-aligned figure for `columns`.
///
/// `period` only affects axis labels; the table is plotted as given.
pub fn plot(
    table: &LossTable,
    period: PeriodSpec,
    columns: &[String],
    events: &[EventMarker],
    options: PlotOptions,
) -> Result<Figure> {
    let segments = event_segments(table, events);
    let unit = period.axis_unit();

    let mut axes = Vec::with_capacity(columns.len());
    for column in columns {
        let category = table
            .category(column)
            .ok_or_else(|| ReportError::UnknownColumn(column.clone()))?;

        let series = segments
            .iter()
            .map(|segment| Series {
                label: segment.label.clone(),
                event: segment.event,
                values: category.values[segment.rows.clone()].to_vec(),
            })
            .collect();

        axes.push(Axes {
            column: column.clone(),
            title: format!("Losses of {column}"),
            x_label: format!("{unit}s from the event"),
            y_label: format!("N. of pieces / {unit}"),
            series,
        });
    }

    debug!(
        columns = axes.len(),
        events = segments.len(),
        period = %period,
        "built event-aligned figure"
    );

    Ok(Figure {
        width: options.width,
        height: options.height,
        stroke_width: options.stroke_width,
        axes,
    })
}

impl Figure {
    /// Render the figure as an SVG document.
    pub fn render_svg(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            render::draw_figure(self, &root)?;
        }
        Ok(svg)
    }

    /// Render and write the figure to `path`.
    pub fn save_svg(&self, path: &Path) -> Result<()> {
        let svg = self.render_svg()?;
        std::fs::write(path, svg)?;
        info!(path = %path.display(), subplots = self.axes.len(), "figure written");
        Ok(())
    }
}
