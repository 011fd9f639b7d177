//! Configuration module for plainweave
//!
//! Provides types and loading for `plainweave.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
