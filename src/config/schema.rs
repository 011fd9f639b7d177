//! Configuration schema types for `plainweave.toml`
//!
//! Defines the structure and validation rules for weave defaults.

use crate::color::{parse_rgb, Palette};
use crate::options::Options;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Loom and output defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaveDefaults {
    /// Number of harnesses (shafts)
    #[serde(default = "default_harnesses")]
    pub harnesses: u32,
    /// Target thread count for automatic sizing
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Rendered cell edge in pixels
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    /// Fixed thread count (disables automatic sizing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Output directory
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for WeaveDefaults {
    fn default() -> Self {
        Self {
            harnesses: default_harnesses(),
            max_size: default_max_size(),
            grid_size: default_grid_size(),
            size: None,
            dir: default_dir(),
        }
    }
}

fn default_harnesses() -> u32 {
    2
}

fn default_max_size() -> usize {
    50
}

fn default_grid_size() -> u32 {
    9
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Credit fields written to the TEXT section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Batch driver settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Worker count (defaults to available parallelism)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    /// Stop scheduling new patterns after the first failure
    #[serde(default)]
    pub fail_fast: bool,
}

/// Root configuration structure for `plainweave.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaveConfig {
    /// Loom and output defaults
    #[serde(default)]
    pub weave: WeaveDefaults,
    /// Ordered color table (`"1" = "0,0,128"`)
    #[serde(default)]
    pub colors: Palette,
    /// Author credits
    #[serde(default)]
    pub author: AuthorConfig,
    /// Batch settings
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "weave.harnesses")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "plainweave.toml: '{}' {}", self.field, self.message)
    }
}

impl WeaveConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: &str| {
            errors.push(ConfigValidationError { field, message: message.to_string() });
        };

        if self.weave.harnesses == 0 {
            push("weave.harnesses".to_string(), "must be a positive integer");
        }
        if self.weave.grid_size == 0 {
            push("weave.grid_size".to_string(), "must be a positive integer");
        }
        if self.weave.size == Some(0) {
            push("weave.size".to_string(), "must be a positive integer");
        }
        if self.colors.is_empty() {
            push("colors".to_string(), "must contain at least one color");
        }
        for (key, color) in self.colors.iter() {
            if parse_rgb(color).is_err() {
                push(format!("colors.{}", key), "must be R,G,B with components 0-255");
            }
        }
        if self.batch.jobs == Some(0) {
            push("batch.jobs".to_string(), "must be a positive integer");
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Weave options seeded from this configuration.
    pub fn to_options(&self) -> Options {
        Options {
            harnesses: self.weave.harnesses,
            size: self.weave.size,
            max_size: self.weave.max_size,
            grid_size: self.weave.grid_size,
            colors: self.colors.clone(),
            dir: self.weave.dir.clone(),
            author: self.author.name.clone(),
            email: self.author.email.clone(),
            ..Options::default()
        }
    }
}
