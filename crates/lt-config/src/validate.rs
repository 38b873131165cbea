//! Semantic validation of a parsed configuration.

use std::collections::HashSet;
use std::fmt;

use lt_common::schema::is_reserved;

use crate::pipeline::PipelineConfig;

/// Every problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.issues.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Check a configuration, collecting all issues instead of stopping at the first.
pub fn validate(config: &PipelineConfig) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    if config.source.trim().is_empty() {
        issues.push("source must not be empty".to_string());
    }
    if let Some(corrections) = &config.corrections {
        if corrections.trim().is_empty() {
            issues.push("corrections must be omitted rather than empty".to_string());
        }
    }

    let plot = &config.plot;
    if plot.columns.is_empty() {
        issues.push("plot.columns must name at least one category".to_string());
    }
    let mut seen = HashSet::new();
    for column in &plot.columns {
        if is_reserved(column) {
            issues.push(format!("plot.columns: '{column}' is not a loss category"));
        }
        if !seen.insert(column.as_str()) {
            issues.push(format!("plot.columns: '{column}' listed twice"));
        }
    }

    if plot.events.is_empty() {
        issues.push("plot.events must contain at least one event".to_string());
    }
    for pair in plot.events.windows(2) {
        if pair[1].date <= pair[0].date {
            issues.push(format!(
                "plot.events must be in chronological order: {} follows {}",
                pair[1].date, pair[0].date
            ));
        }
    }

    if plot.width == 0 || plot.height == 0 {
        issues.push("plot.width and plot.height must be positive".to_string());
    }
    if plot.stroke_width == 0 {
        issues.push("plot.stroke_width must be positive".to_string());
    }

    if config.fetch_timeout_secs == Some(0) {
        issues.push("fetch_timeout_secs must be positive when set".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lt_common::EventMarker;

    #[test]
    fn default_is_valid() {
        assert!(validate(&PipelineConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_issue() {
        let mut config = PipelineConfig::default();
        config.source = "  ".to_string();
        config.plot.columns = vec!["day".to_string(), "tank".to_string(), "tank".to_string()];
        config.plot.stroke_width = 0;

        let err = validate(&config).unwrap_err();
        assert_eq!(err.issues.len(), 4, "{err}");
    }

    #[test]
    fn events_must_be_increasing() {
        let mut config = PipelineConfig::default();
        let d = NaiveDate::from_ymd_opt(2022, 5, 1).unwrap();
        config.plot.events = vec![EventMarker::new(d), EventMarker::new(d)];
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("chronological"));
    }

    #[test]
    fn empty_corrections_string_rejected() {
        let mut config = PipelineConfig::default();
        config.corrections = Some(String::new());
        assert!(validate(&config).is_err());
    }
}
