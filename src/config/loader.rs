use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::RunnerConfig;
use crate::errors::{Result, RunError};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "batchmap.toml";

/// Parse and validate config from a TOML string.
pub fn parse_config(contents: &str) -> std::result::Result<RunnerConfig, String> {
    let config = toml::from_str::<RunnerConfig>(contents).map_err(|e| e.to_string())?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn load_from_path(path: &Path) -> Result<RunnerConfig> {
    let contents = fs::read_to_string(path).map_err(|e| RunError::ConfigFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let config = parse_config(&contents).map_err(|message| RunError::ConfigFile {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load configuration.
///
/// An explicit path must exist and parse. Without one, `batchmap.toml` in
/// `dir` is used when present, otherwise defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<RunnerConfig> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    match fs::metadata(&candidate) {
        Ok(_) => load_from_path(&candidate),
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!("Failed to read config file {}: {}", candidate.display(), e);
            }
            Ok(RunnerConfig::default())
        }
    }
}
