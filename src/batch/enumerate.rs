//! Pattern enumeration for batch runs.

use crate::pattern::{Pattern, TartanStyle};

/// Family of patterns to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Enumeration {
    /// Every ordered sequence, repeats allowed (`1-1`, `1-2`, `2-1`, ...)
    Permutations,
    /// Every non-decreasing sequence (`1-1`, `1-2`, `2-2`, ...)
    Combinations,
    /// Strictly increasing sequences without repeats (`1-2`, `1-3`, `2-3`, ...)
    Distinct,
}

/// A family of patterns over run lengths `1..=values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    pub kind: Enumeration,
    /// Largest run length
    pub values: u32,
    /// Shortest pattern length
    pub min_len: usize,
    /// Longest pattern length
    pub max_len: usize,
    /// Mirror every pattern into a tartan sett
    pub tartan: Option<TartanStyle>,
}

impl PatternSet {
    pub fn new(kind: Enumeration, values: u32, min_len: usize, max_len: usize) -> Self {
        Self { kind, values, min_len, max_len, tartan: None }
    }

    pub fn with_tartan(mut self, tartan: Option<TartanStyle>) -> Self {
        self.tartan = tartan;
        self
    }

    /// All patterns of the family, shortest first, each length in
    /// lexicographic order.
    pub fn patterns(&self) -> Vec<Pattern> {
        let mut out = Vec::new();
        for len in self.min_len.max(1)..=self.max_len {
            let sequences = match self.kind {
                Enumeration::Permutations => repeated_permutations(self.values, len),
                Enumeration::Combinations => repeated_combinations(self.values, len),
                Enumeration::Distinct => combinations(self.values, len),
            };
            for runs in sequences {
                // Runs are drawn from 1..=values, never zero
                if let Ok(pattern) = Pattern::new(runs) {
                    out.push(match self.tartan {
                        Some(style) => pattern.tartan(style),
                        None => pattern,
                    });
                }
            }
        }
        out
    }
}

/// Every length-`len` sequence over `1..=values`.
pub fn repeated_permutations(values: u32, len: usize) -> Vec<Vec<u32>> {
    sequences(values, len, |_prev| 1)
}

/// Every non-decreasing length-`len` sequence over `1..=values`.
pub fn repeated_combinations(values: u32, len: usize) -> Vec<Vec<u32>> {
    sequences(values, len, |prev| prev)
}

/// Every strictly increasing length-`len` sequence over `1..=values`.
pub fn combinations(values: u32, len: usize) -> Vec<Vec<u32>> {
    sequences(values, len, |prev| prev + 1)
}

/// Depth-first generation where `first(prev)` gives the smallest value allowed
/// after `prev`.
fn sequences(values: u32, len: usize, first: impl Fn(u32) -> u32 + Copy) -> Vec<Vec<u32>> {
    fn extend(
        current: &mut Vec<u32>,
        values: u32,
        len: usize,
        first: &dyn Fn(u32) -> u32,
        out: &mut Vec<Vec<u32>>,
    ) {
        if current.len() == len {
            out.push(current.clone());
            return;
        }
        let start = current.last().map(|&prev| first(prev)).unwrap_or(1);
        for v in start..=values {
            current.push(v);
            extend(current, values, len, first, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if len == 0 || values == 0 {
        return out;
    }
    extend(&mut Vec::with_capacity(len), values, len, &first, &mut out);
    out
}
