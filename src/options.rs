//! Per-weave options

use crate::color::Palette;
use crate::error::{Result, WeaveError};
use std::path::PathBuf;

/// Options controlling how a single pattern is woven.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Reverse the color order in the weft
    pub reverse: bool,
    /// Number of loom harnesses (shafts)
    pub harnesses: u32,
    /// Explicit thread count; `None` picks one from `max_size`
    pub size: Option<usize>,
    /// Target thread count used when `size` is `None`
    pub max_size: usize,
    /// Edge of one rendered cell, in pixels
    pub grid_size: u32,
    /// Ordered color table
    pub colors: Palette,
    /// Directory receiving the `.wif` and `.png` files
    pub dir: PathBuf,
    /// Optional name appended to output file names and titles
    pub nickname: Option<String>,
    /// Precomposed notes text, replacing the generated description
    pub notes: Option<String>,
    /// Author name for the TEXT section
    pub author: Option<String>,
    /// Contact e-mail for the TEXT and WIF sections
    pub email: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            reverse: false,
            harnesses: 2,
            size: None,
            max_size: 50,
            grid_size: 9,
            colors: Palette::default(),
            dir: PathBuf::from("."),
            nickname: None,
            notes: None,
            author: None,
            email: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_harnesses(mut self, harnesses: u32) -> Self {
        self.harnesses = harnesses;
        self
    }

    pub fn with_size(mut self, size: Option<usize>) -> Self {
        self.size = size;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_grid_size(mut self, grid_size: u32) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_colors(mut self, colors: Palette) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check the numeric options and the palette size.
    ///
    /// Color strings are not parsed here; a malformed color only fails the
    /// image step.
    pub fn validate(&self) -> Result<()> {
        if self.colors.is_empty() {
            return Err(WeaveError::config("color table must contain at least one color"));
        }
        if self.harnesses == 0 {
            return Err(WeaveError::config("harnesses must be at least 1"));
        }
        if self.grid_size == 0 {
            return Err(WeaveError::config("grid_size must be at least 1"));
        }
        if self.size == Some(0) {
            return Err(WeaveError::config("size must be positive (omit it for automatic sizing)"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert!(!opts.reverse);
        assert_eq!(opts.harnesses, 2);
        assert_eq!(opts.size, None);
        assert_eq!(opts.max_size, 50);
        assert_eq!(opts.grid_size, 9);
        assert_eq!(opts.colors.len(), 2);
        assert_eq!(opts.dir, PathBuf::from("."));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(Options::new().with_harnesses(0).validate().is_err());
        assert!(Options::new().with_grid_size(0).validate().is_err());
        assert!(Options::new().with_size(Some(0)).validate().is_err());
        assert!(Options::new().with_colors(Palette::new()).validate().is_err());
    }

    #[test]
    fn test_validate_ignores_color_syntax() {
        let opts = Options::new().with_colors(Palette::from_colors(["not a color"]));
        assert!(opts.validate().is_ok());
    }
}
