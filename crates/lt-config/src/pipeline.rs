//! Pipeline configuration types.
//!
//! Every field has a default; the defaults reproduce the standard report:
//! the public equipment-loss dataset, resampled into 3-day buckets, with four
//! categories plotted against three campaign start dates.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use lt_common::{EventMarker, PeriodSpec};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validate::validate;
use crate::ConfigError;

/// Public dataset of cumulative equipment losses, one record per day.
pub const DEFAULT_SOURCE: &str = "https://raw.githubusercontent.com/PetroIvaniuk/2022-Ukraine-Russia-War-Dataset/main/data/russia_losses_equipment.json";

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path or URL of the cumulative dataset (`.csv` or `.json`).
    pub source: String,

    /// Path or URL of an additive correction dataset.
    pub corrections: Option<String>,

    /// Keep the free-text "greatest losses direction" column.
    pub keep_losses_direction: bool,

    /// Resampling period: `none`, `D`, `3D`, `W`, `M`, ...
    #[schemars(with = "String")]
    pub period: PeriodSpec,

    /// Timeout for remote sources. No timeout when absent.
    pub fetch_timeout_secs: Option<u64>,

    pub plot: PlotConfig,

    pub logging: LoggingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            corrections: None,
            keep_losses_direction: false,
            period: PeriodSpec::Days(3),
            fetch_timeout_secs: None,
            plot: PlotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        validate(&config)?;
        Ok(config)
    }

    /// Load from file with full error reporting.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

/// Event-aligned plot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlotConfig {
    /// Categories to plot, one subplot each.
    pub columns: Vec<String>,

    /// Events, in chronological order.
    pub events: Vec<EventMarker>,

    /// Figure width in pixels.
    pub width: u32,

    /// Figure height in pixels.
    pub height: u32,

    /// Line width in pixels.
    pub stroke_width: u32,

    /// Where the binary writes the SVG figure.
    pub output: PathBuf,
}

impl Default for PlotConfig {
    fn default() -> Self {
        let event = |y, m, d, label: &str| {
            // Literal calendar dates; always valid.
            NaiveDate::from_ymd_opt(y, m, d).map(|date| EventMarker::labeled(date, label))
        };
        Self {
            columns: vec![
                "field artillery".to_string(),
                "special equipment".to_string(),
                "anti-aircraft warfare".to_string(),
                "tank".to_string(),
            ],
            events: [
                event(2022, 2, 24, "Invasion Feb 2022"),
                event(2022, 8, 1, "Kherson+Kharkiv Aug 2022"),
                event(2023, 5, 1, "Zaporizhzhia+Donetsk Jun 2023"),
            ]
            .into_iter()
            .flatten()
            .collect(),
            width: 800,
            height: 1200,
            stroke_width: 2,
            output: PathBuf::from("losses.svg"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}
