//! Batch weaving
//!
//! Enumerates families of patterns and weaves each of them, plain and
//! reversed, on a bounded worker pool.
//!
//! # Overview
//!
//! - **Enumeration**: generate patterns (permutations, combinations, tartans)
//! - **Execution**: run every `(pattern, reverse)` job independently
//! - **Results**: collect per-job status in input order
//!
//! # Example
//!
//! ```ignore
//! use plainweave::batch::{BatchRun, Enumeration, PatternSet};
//!
//! let patterns = PatternSet::new(Enumeration::Permutations, 5, 2, 3).patterns();
//! let result = BatchRun::new(options).with_jobs(3).run(&patterns)?;
//! println!("{}", result.summary());
//! ```

pub mod enumerate;
pub mod parallel;
pub mod result;

pub use enumerate::*;
pub use parallel::*;
pub use result::*;
