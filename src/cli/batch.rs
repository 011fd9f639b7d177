//! Batch command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{exit_code_for, resolve_config, resolve_options, SharedArgs};
use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::batch::{BatchRun, Enumeration, PatternSet};
use crate::config::CliOverrides;
use crate::pattern::TartanStyle;

/// Parsed `batch` flags
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub kind: Enumeration,
    pub values: u32,
    pub min_len: usize,
    pub max_len: usize,
    pub tartan: Option<TartanStyle>,
    pub jobs: Option<usize>,
    pub fail_fast: bool,
}

/// Run the batch command
pub fn run_batch(request: &BatchRequest, shared: &SharedArgs, config: Option<&Path>) -> ExitCode {
    let overrides = CliOverrides {
        jobs: request.jobs,
        fail_fast: request.fail_fast.then_some(true),
        ..shared.overrides()
    };
    let config = match resolve_config(config, &overrides) {
        Ok(cfg) => cfg,
        Err(code) => return code,
    };
    let options = match resolve_options(&config, shared) {
        Ok(opts) => opts,
        Err(code) => return code,
    };

    let patterns = PatternSet::new(request.kind, request.values, request.min_len, request.max_len)
        .with_tartan(request.tartan)
        .patterns();
    if patterns.is_empty() {
        eprintln!(
            "Warning: no patterns for values 1..={} and lengths {}..={}",
            request.values, request.min_len, request.max_len
        );
        return ExitCode::from(EXIT_SUCCESS);
    }

    let mut run = BatchRun::new(options).with_fail_fast(config.batch.fail_fast);
    if let Some(jobs) = config.batch.jobs {
        run = run.with_jobs(jobs);
    }

    match run.run(&patterns) {
        Ok(result) => {
            if result.is_success() {
                println!("{}", result.summary());
                ExitCode::from(EXIT_SUCCESS)
            } else {
                eprintln!("{}", result.summary());
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code_for(&e)
        }
    }
}
