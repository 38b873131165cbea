//! Loss Tracker common types and errors.
//!
//! This crate provides foundational types shared across the loss-tracker crates:
//! - The columnar loss table and its invariants
//! - Resampling period specifications
//! - Event markers used to align plots
//! - The unified error type

pub mod error;
pub mod event;
pub mod period;
pub mod schema;
pub mod table;

pub use error::{Error, Result};
pub use event::EventMarker;
pub use period::PeriodSpec;
pub use schema::{DATE_COLUMN, DAY_COLUMN, DIRECTION_COLUMN};
pub use table::{CategoryColumn, ColumnView, LossTable};
