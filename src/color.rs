//! Color parsing and the ordered color table
//!
//! Colors in a WIF color table are written as `R,G,B` with each component an
//! integer in 0-255 (the `COLOR PALETTE` range). The [`Palette`] keeps the
//! table's insertion order, which is also the order it is serialized in.

use image::Rgba;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Wrong number of comma-separated components
    #[error("expected 3 components, got {0}")]
    ComponentCount(usize),
    /// A component is not an integer
    #[error("invalid component '{0}'")]
    InvalidComponent(String),
    /// A component is outside 0-255
    #[error("component {0} out of range 0-255")]
    OutOfRange(i64),
}

/// Parse an `R,G,B` color string into an opaque RGBA color.
///
/// Whitespace around components is ignored. Values are never clamped: a
/// component outside 0-255 is an error.
///
/// # Examples
///
/// ```
/// use plainweave::color::parse_rgb;
///
/// let navy = parse_rgb("0,0,128").unwrap();
/// assert_eq!(navy, image::Rgba([0, 0, 128, 255]));
///
/// assert!(parse_rgb("256,0,0").is_err());
/// assert!(parse_rgb("0,0").is_err());
/// ```
pub fn parse_rgb(s: &str) -> Result<Rgba<u8>, ColorError> {
    if s.trim().is_empty() {
        return Err(ColorError::Empty);
    }

    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(ColorError::ComponentCount(parts.len()));
    }

    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = parse_component(part)?;
    }
    Ok(Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

fn parse_component(part: &str) -> Result<u8, ColorError> {
    let trimmed = part.trim();
    let value: i64 =
        trimmed.parse().map_err(|_| ColorError::InvalidComponent(trimmed.to_string()))?;
    u8::try_from(value).map_err(|_| ColorError::OutOfRange(value))
}

/// Ordered color table: 1-based string key -> `R,G,B` string.
///
/// Values are stored verbatim; they are only parsed when a weave is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(IndexMap<String, String>);

impl Default for Palette {
    /// Navy and black, the classic two-color study.
    fn default() -> Self {
        Palette::from_pairs([("1", "0,0,128"), ("2", "0,0,0")])
    }
}

impl Palette {
    /// Create an empty palette.
    pub fn new() -> Self {
        Palette(IndexMap::new())
    }

    /// Build a palette from `(key, color)` pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Palette(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Build a palette keyed `1..=n` from a list of colors.
    pub fn from_colors<V: Into<String>>(colors: impl IntoIterator<Item = V>) -> Self {
        Palette(
            colors.into_iter().enumerate().map(|(i, c)| ((i + 1).to_string(), c.into())).collect(),
        )
    }

    /// Insert or replace a color. Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, color: impl Into<String>) {
        self.0.insert(key.into(), color.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in ascending string order (`10` sorts before `2`).
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.0.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Parse a `KEY=R,G,B` palette entry as given on the command line.
pub fn parse_palette_entry(s: &str) -> Result<(String, String), String> {
    let (key, color) =
        s.split_once('=').ok_or_else(|| format!("expected KEY=R,G,B, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing color key in '{}'", s));
    }
    parse_rgb(color).map_err(|e| format!("invalid color '{}': {}", color, e))?;
    Ok((key.to_string(), color.trim().to_string()))
}
