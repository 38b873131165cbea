//! Loss Tracker core.
//!
//! Loads cumulative equipment-loss tables, applies corrections, resamples
//! them into per-period losses, and hands the result to `lt-report`.

pub mod correct;
pub mod exit_codes;
pub mod load;
pub mod logging;
pub mod pipeline;
pub mod resample;
pub mod tracker;

pub use correct::{apply_corrections, DirectionColumn};
pub use exit_codes::ExitCode;
pub use load::{load, parse_csv, parse_json, Fetch, HttpFetcher, Loader, SourceFormat};
pub use pipeline::{run, run_with, PipelineOutput};
pub use resample::resample;
pub use tracker::LossTracker;

pub use lt_common::{Error, EventMarker, LossTable, PeriodSpec, Result};
