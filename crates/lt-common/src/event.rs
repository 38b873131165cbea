//! Event markers used to align plotted series.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A dated event that starts a plotted segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EventMarker {
    pub date: NaiveDate,

    /// Legend label; the date is used when absent.
    #[serde(default)]
    pub label: Option<String>,
}

impl EventMarker {
    pub fn new(date: NaiveDate) -> Self {
        Self { date, label: None }
    }

    pub fn labeled(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            label: Some(label.into()),
        }
    }

    pub fn legend(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.date.format("%Y-%m-%d").to_string(),
        }
    }
}
