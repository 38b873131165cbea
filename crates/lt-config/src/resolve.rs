//! Configuration resolution.
//!
//! Order: explicit path → `./loss_tracker.json` → `<config dir>/loss-tracker/config.json`
//! → built-in defaults. An explicit path that cannot be read is an error; the
//! implicit locations are only used when the file exists.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::pipeline::PipelineConfig;
use crate::{ConfigError, CONFIG_FILE_NAME};

/// Where a resolved configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    WorkingDir(PathBuf),
    UserConfig(PathBuf),
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "explicit:{}", p.display()),
            ConfigSource::WorkingDir(p) => write!(f, "cwd:{}", p.display()),
            ConfigSource::UserConfig(p) => write!(f, "user:{}", p.display()),
            ConfigSource::Default => write!(f, "built-in defaults"),
        }
    }
}

/// Candidate config paths, in priority order, excluding the explicit one.
pub fn candidate_paths(working_dir: &Path) -> Vec<(PathBuf, bool)> {
    let mut out = vec![(working_dir.join(CONFIG_FILE_NAME), false)];
    if let Some(dir) = dirs::config_dir() {
        out.push((dir.join("loss-tracker").join("config.json"), true));
    }
    out
}

/// Resolve the pipeline configuration relative to the current directory.
pub fn resolve_config(
    explicit: Option<&Path>,
) -> Result<(PipelineConfig, ConfigSource), ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_config_in(explicit, &cwd)
}

/// Resolve the pipeline configuration relative to `working_dir`.
pub fn resolve_config_in(
    explicit: Option<&Path>,
    working_dir: &Path,
) -> Result<(PipelineConfig, ConfigSource), ConfigError> {
    if let Some(path) = explicit {
        let config = PipelineConfig::load_from_file(path)?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    for (path, is_user) in candidate_paths(working_dir) {
        if path.is_file() {
            let config = PipelineConfig::load_from_file(&path)?;
            let source = if is_user {
                ConfigSource::UserConfig(path)
            } else {
                ConfigSource::WorkingDir(path)
            };
            return Ok((config, source));
        }
    }

    Ok((PipelineConfig::default(), ConfigSource::Default))
}
