//! Reports over loss tables.
//!
//! - [`inspect`]: per-column diagnostic table (types, missing values, mode)
//! - [`plot`]: event-aligned subplots, one per category, rendered to SVG

pub mod error;
pub mod inspect;
pub mod plot;
mod render;

pub use error::{ReportError, Result};
pub use inspect::{inspect, DiagnosticReport, DiagnosticRow};
pub use plot::{event_segments, plot, Axes, EventSegment, Figure, PlotOptions, Series};
