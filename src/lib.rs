//! plainweave - Plain-weave pattern simulation
//!
//! This library turns a sequence of thread runs into a complete weave:
//! - Expand the runs into a color repeat unit and a warp of the right size
//! - Build a WIF (Weaving Information File) document for a plain-weave loom
//! - Resolve which thread shows at every crossing and render a PNG swatch
//! - Enumerate pattern families and weave them in parallel

pub mod batch;
pub mod cli;
pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod options;
pub mod output;
pub mod pattern;
pub mod renderer;
pub mod shed;
pub mod weave;

pub use document::WeaveDocument;
pub use error::{Result, WeaveError};
pub use options::Options;
pub use pattern::{Pattern, TartanStyle};
pub use renderer::render_image;
pub use weave::{build, make, serialize_document, Outputs, Weave};
