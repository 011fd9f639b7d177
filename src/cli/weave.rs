//! Weave command implementation

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{exit_code_for, resolve_config, resolve_options, SharedArgs};
use super::{EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::error::{Result, WeaveError};
use crate::options::Options;
use crate::output;
use crate::pattern::{Pattern, TartanStyle};
use crate::weave::{self, serialize_document};

/// Parsed `weave` flags
#[derive(Debug, Clone)]
pub struct WeaveRequest {
    pub pattern: String,
    pub reverse: bool,
    pub both: bool,
    pub tartan: Option<TartanStyle>,
    pub no_png: bool,
    pub stdout: bool,
}

impl WeaveRequest {
    /// Weft directions to weave, plain first.
    fn directions(&self) -> Vec<bool> {
        if self.both {
            vec![false, true]
        } else {
            vec![self.reverse]
        }
    }
}

/// Run the weave command
pub fn run_weave(request: &WeaveRequest, shared: &SharedArgs, config: Option<&Path>) -> ExitCode {
    let pattern = match request.pattern.parse::<Pattern>() {
        Ok(p) => match request.tartan {
            Some(style) => p.tartan(style),
            None => p,
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let config = match resolve_config(config, &shared.overrides()) {
        Ok(cfg) => cfg,
        Err(code) => return code,
    };
    let base = match resolve_options(&config, shared) {
        Ok(opts) => opts,
        Err(code) => return code,
    };

    if request.stdout {
        let options = base.with_reverse(request.reverse);
        return match print_document(&pattern, &options) {
            Ok(()) => ExitCode::from(EXIT_SUCCESS),
            Err(e) => {
                eprintln!("Error: {}", e);
                exit_code_for(&e)
            }
        };
    }

    for reverse in request.directions() {
        let options = base.clone().with_reverse(reverse);
        match write_outputs(&pattern, &options, request.no_png) {
            Ok(paths) => {
                for path in paths {
                    println!("Wrote {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_code_for(&e);
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

fn print_document(pattern: &Pattern, options: &Options) -> Result<()> {
    let woven = weave::build(pattern, options)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&serialize_document(&woven.document))
        .and_then(|()| stdout.flush())
        .map_err(|source| WeaveError::Io { path: PathBuf::from("<stdout>"), source })
}

/// Write the document, and the image unless `no_png`.
fn write_outputs(pattern: &Pattern, options: &Options, no_png: bool) -> Result<Vec<PathBuf>> {
    output::ensure_dir(&options.dir)?;
    if no_png {
        let woven = weave::build(pattern, options)?;
        return Ok(vec![weave::write_document(&woven, options)?]);
    }
    let outputs = weave::make(pattern, options)?;
    let mut paths = vec![outputs.wif];
    paths.extend(outputs.png);
    Ok(paths)
}
