//! CLI command implementations for `qaflow`.
//!
//! - [`ask`] -- Run a question through the pipeline.
//! - [`config_cmd`] -- Display the resolved configuration.

pub mod ask;
pub mod config_cmd;

use std::path::PathBuf;

use anyhow::Context;
use qaflow_types::QaflowConfig;
use tracing::{debug, warn};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "QAFLOW_CONFIG";

/// Load and validate configuration.
///
/// Looks at `config_override` first, then the `QAFLOW_CONFIG` env var.
/// Returns the defaults when neither is set or the file does not exist.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<QaflowConfig> {
    let env_path = std::env::var(CONFIG_ENV).ok();
    let config = match config_path(config_override, env_path.as_deref()) {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "loading config");
            QaflowConfig::from_file(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        }
        Some(path) => {
            warn!(path = %path.display(), "config file not found, using defaults");
            QaflowConfig::default()
        }
        None => QaflowConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Pick the config path: explicit override, then env var.
fn config_path(config_override: Option<&str>, env_path: Option<&str>) -> Option<PathBuf> {
    config_override
        .or(env_path)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
}
