//! Drawing a [`Figure`] with `plotters`.

use std::fmt::Display;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{ReportError, Result};
use crate::plot::{Axes, Figure};

fn render_err<E: Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

/// Draw every subplot of `figure` stacked vertically on `root`.
pub(crate) fn draw_figure<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let panels = root.split_evenly((figure.axes.len().max(1), 1));
    for (axes, area) in figure.axes.iter().zip(panels.iter()) {
        draw_axes(axes, area, figure.stroke_width)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

/// y range covering every value and zero, with some headroom.
fn value_range(axes: &Axes) -> (f64, f64) {
    let values = axes
        .series
        .iter()
        .flat_map(|s| s.values.iter().flatten().copied());
    let (lo, hi) = values.fold((0i64, 0i64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (lo, hi) = (lo as f64, hi as f64);
    if hi <= lo {
        return (lo, lo + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (if lo < 0.0 { lo - pad } else { lo }, hi + pad)
}

fn draw_axes<DB: DrawingBackend>(
    axes: &Axes,
    area: &DrawingArea<DB, Shift>,
    stroke_width: u32,
) -> Result<()> {
    let longest = axes.series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    let x_max = longest.saturating_sub(1).max(1) as f64;
    let (y_min, y_max) = value_range(axes);

    let mut chart = ChartBuilder::on(area)
        .caption(&axes.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .draw()
        .map_err(render_err)?;

    for (idx, series) in axes.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        // Missing values are skipped; the line joins the neighbours.
        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .filter_map(|(x, v)| v.map(|v| (x as f64, v as f64)))
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(stroke_width)))
            .map_err(render_err)?
            .label(series.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(stroke_width))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_err)?;

    Ok(())
}
