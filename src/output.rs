//! Output file naming and writing

use crate::error::{Result, WeaveError};
use crate::options::Options;
use crate::pattern::Pattern;
use std::fs;
use std::path::{Path, PathBuf};

/// File stem for a pattern's outputs.
///
/// # Output Naming Rules
///
/// | Scenario | Stem |
/// |----------|------|
/// | Pattern `[1, 2]` | `1-2` |
/// | With nickname `navy` | `1-2-navy` |
/// | Reversed weft | `1-2-reversed` |
/// | Both | `1-2-navy-reversed` |
pub fn output_stem(pattern: &Pattern, options: &Options) -> String {
    let mut stem = pattern.joined();
    if let Some(nickname) = &options.nickname {
        stem.push('-');
        stem.push_str(nickname);
    }
    if options.reverse {
        stem.push_str("-reversed");
    }
    stem
}

/// Full path of an output file with extension `ext` inside `options.dir`.
pub fn output_path(pattern: &Pattern, options: &Options, ext: &str) -> PathBuf {
    options.dir.join(format!("{}.{}", output_stem(pattern, options), ext))
}

/// Write bytes to `path`.
///
/// The parent directory must already exist; it is not created here.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| WeaveError::Io { path: path.to_path_buf(), source })
}

/// Create the output directory (and parents) if needed.
///
/// Used by drivers before fanning out work; the core never calls it.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| WeaveError::Io { path: dir.to_path_buf(), source })
}
