//! Configuration loading and discovery for `plainweave.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::WeaveConfig;
use crate::color::Palette;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "plainweave.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse plainweave.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub dir: Option<PathBuf>,
    /// Override harness count
    pub harnesses: Option<u32>,
    /// Override explicit thread count
    pub size: Option<usize>,
    /// Override automatic sizing target
    pub max_size: Option<usize>,
    /// Override cell size
    pub grid_size: Option<u32>,
    /// Replace the color table
    pub colors: Option<Palette>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
    /// Stop batch on first failure
    pub fail_fast: Option<bool>,
}

/// Find plainweave.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for plainweave.toml
/// 2. Check XDG_CONFIG_HOME/plainweave/plainweave.toml (or ~/.config/plainweave/plainweave.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find plainweave.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("plainweave").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find plainweave.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a plainweave.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// default configuration.
pub fn load_config(path: Option<&Path>) -> Result<WeaveConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(WeaveConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<WeaveConfig, ConfigError> {
    tracing::debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path)?;
    let config: WeaveConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut WeaveConfig, overrides: &CliOverrides) {
    if let Some(ref dir) = overrides.dir {
        config.weave.dir = dir.clone();
    }
    if let Some(harnesses) = overrides.harnesses {
        config.weave.harnesses = harnesses;
    }
    if let Some(size) = overrides.size {
        config.weave.size = Some(size);
    }
    if let Some(max_size) = overrides.max_size {
        config.weave.max_size = max_size;
    }
    if let Some(grid_size) = overrides.grid_size {
        config.weave.grid_size = grid_size;
    }
    if let Some(ref colors) = overrides.colors {
        config.colors = colors.clone();
    }
    if let Some(jobs) = overrides.jobs {
        config.batch.jobs = Some(jobs);
    }
    if let Some(fail_fast) = overrides.fail_fast {
        config.batch.fail_fast = fail_fast;
    }
}
