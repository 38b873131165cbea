//! Core math modules.

pub mod series;
pub mod stats;
