//! Thread repeat patterns
//!
//! A [`Pattern`] is a list of run lengths. Each run is one block of threads in
//! a single color; consecutive blocks rotate through the color table. The
//! expanded blocks form the repeat unit, which is tiled across the whole warp
//! (and weft) to give the pattern space.

use crate::error::{Result, WeaveError};
use std::fmt;
use std::str::FromStr;

/// Ordered, non-empty sequence of positive run lengths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<u32>);

/// How a pattern is mirrored into a tartan sett.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TartanStyle {
    /// Mirror without repeating either end block: `1-2-3` -> `1-2-3-2`
    Balanced,
    /// Mirror back down to the first block: `1-2-3` -> `1-2-3-2-1`
    Alternate,
}

impl Pattern {
    /// Create a pattern, rejecting empty input and zero-length runs.
    pub fn new(runs: Vec<u32>) -> Result<Self> {
        if runs.is_empty() {
            return Err(WeaveError::config("pattern must not be empty"));
        }
        if let Some(pos) = runs.iter().position(|&r| r == 0) {
            return Err(WeaveError::config(format!(
                "pattern run {} is zero; runs must be positive",
                pos + 1
            )));
        }
        Ok(Pattern(runs))
    }

    pub fn runs(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Patterns hold at least one run, so this is false.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the repeat unit (sum of all runs).
    pub fn unit_len(&self) -> usize {
        self.0.iter().map(|&r| r as usize).sum()
    }

    /// Runs joined by `-`, the stem of every output file name.
    pub fn joined(&self) -> String {
        self.0.iter().map(u32::to_string).collect::<Vec<_>>().join("-")
    }

    /// Mirror the pattern into a tartan sett.
    ///
    /// ```
    /// use plainweave::pattern::{Pattern, TartanStyle};
    ///
    /// let p = Pattern::new(vec![1, 2, 3]).unwrap();
    /// assert_eq!(p.tartan(TartanStyle::Balanced).runs(), &[1, 2, 3, 2]);
    /// assert_eq!(p.tartan(TartanStyle::Alternate).runs(), &[1, 2, 3, 2, 1]);
    /// ```
    pub fn tartan(&self, style: TartanStyle) -> Pattern {
        let n = self.0.len();
        let mut runs = self.0.clone();
        // Walk back from the second-to-last block
        let stop = match style {
            TartanStyle::Balanced => 1,
            TartanStyle::Alternate => 0,
        };
        if n >= 2 {
            for i in (stop..n - 1).rev() {
                runs.push(self.0[i]);
            }
        }
        Pattern(runs)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl FromStr for Pattern {
    type Err = WeaveError;

    /// Parse `1-2-3`, `1,2,3` or `1 2 3`.
    fn from_str(s: &str) -> Result<Self> {
        let runs = s
            .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| WeaveError::config(format!("invalid pattern run '{}'", part)))
            })
            .collect::<Result<Vec<_>>>()?;
        Pattern::new(runs)
    }
}

/// Expand a pattern into its repeat unit.
///
/// Block `b` of run length `L` contributes `L` copies of
/// `(b mod color_count) + 1`.
///
/// ```
/// use plainweave::pattern::{repeat_unit, Pattern};
///
/// let p = Pattern::new(vec![1, 2]).unwrap();
/// assert_eq!(repeat_unit(&p, 2).unwrap(), vec![1, 2, 2]);
/// ```
pub fn repeat_unit(pattern: &Pattern, color_count: usize) -> Result<Vec<u32>> {
    if color_count == 0 {
        return Err(WeaveError::config("color table must contain at least one color"));
    }
    let mut unit = Vec::with_capacity(pattern.unit_len());
    for (block, &run) in pattern.runs().iter().enumerate() {
        let color = (block % color_count) as u32 + 1;
        unit.extend(std::iter::repeat(color).take(run as usize));
    }
    Ok(unit)
}

/// Pick the total thread count.
///
/// An explicit size is returned unchanged. Otherwise the result is the
/// largest multiple of `unit_len` not above `max_size`, or `unit_len` itself
/// when a single repeat is already larger than `max_size`.
pub fn normalize_size(unit_len: usize, size: Option<usize>, max_size: usize) -> usize {
    if let Some(size) = size {
        return size;
    }
    if unit_len == 0 {
        return 0;
    }
    (max_size / unit_len).max(1) * unit_len
}

/// Tile the repeat unit to `size` threads.
pub fn pattern_space(unit: &[u32], size: usize) -> Vec<u32> {
    if unit.is_empty() {
        return Vec::new();
    }
    (0..size).map(|i| unit[i % unit.len()]).collect()
}
