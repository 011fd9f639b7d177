//! Error type shared by the weave pipeline

use crate::color::ColorError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building, rendering, or writing a weave.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WeaveError {
    /// Invalid options or pattern (empty pattern, zero colors, zero harnesses...)
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A color table entry is not `R,G,B` with components in 0-255
    #[error("malformed color {value:?} for color table key {key:?}: {source}")]
    MalformedColor {
        key: String,
        value: String,
        #[source]
        source: ColorError,
    },

    /// The document references a key that its target section does not contain
    #[error("missing reference: [{section}] has no entry {key:?}")]
    MissingReference { section: String, key: String },

    /// File write failure
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding failure
    #[error("failed to encode image: {0}")]
    Encode(String),
}

impl WeaveError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        WeaveError::Configuration(message.into())
    }

    /// Shorthand for a missing-reference error.
    pub fn missing(section: impl Into<String>, key: impl Into<String>) -> Self {
        WeaveError::MissingReference { section: section.into(), key: key.into() }
    }

    /// Short machine-friendly name of the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            WeaveError::Configuration(_) => "configuration",
            WeaveError::MalformedColor { .. } => "malformed_color",
            WeaveError::MissingReference { .. } => "missing_reference",
            WeaveError::Io { .. } => "io",
            WeaveError::Encode(_) => "encode",
        }
    }
}

impl From<png::EncodingError> for WeaveError {
    fn from(e: png::EncodingError) -> Self {
        WeaveError::Encode(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = WeaveError> = std::result::Result<T, E>;
