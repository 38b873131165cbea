//! Loss Tracker configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the pipeline configuration file
//! - Config resolution (explicit path → working directory → XDG → defaults)
//! - Semantic validation
//! - JSON Schema export for editors

pub mod pipeline;
pub mod resolve;
pub mod validate;

pub use pipeline::{LogFormat, LoggingConfig, PipelineConfig, PlotConfig};
pub use resolve::{resolve_config, ConfigSource};
pub use validate::{validate, ValidationError};

/// File name searched for in the working directory.
pub const CONFIG_FILE_NAME: &str = "loss_tracker.json";

/// Errors that can occur while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

impl From<ConfigError> for lt_common::Error {
    fn from(err: ConfigError) -> Self {
        lt_common::Error::Config(err.to_string())
    }
}

/// JSON Schema of [`PipelineConfig`].
pub fn config_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(PipelineConfig);
    serde_json::to_value(&schema).unwrap_or(serde_json::Value::Null)
}
