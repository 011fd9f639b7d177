//! Parallel batch execution.
//!
//! Every pattern is woven twice, plain and with a reversed weft. Jobs share
//! nothing but the read-only base options, so they run on a bounded rayon
//! pool and results are collected back in submission order.

use crate::batch::{BatchResult, JobResult};
use crate::error::{Result, WeaveError};
use crate::options::Options;
use crate::output;
use crate::pattern::Pattern;
use crate::weave;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Default number of parallel jobs (uses available parallelism).
fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn build_thread_pool(jobs: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| WeaveError::config(format!("failed to build worker pool: {e}")))
}

/// One unit of batch work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pattern: Pattern,
    pub reverse: bool,
}

/// Expand patterns into jobs, plain before reversed.
pub fn jobs_for(patterns: &[Pattern]) -> Vec<Job> {
    patterns
        .iter()
        .flat_map(|p| {
            [false, true].map(|reverse| Job { pattern: p.clone(), reverse })
        })
        .collect()
}

/// Batch executor.
pub struct BatchRun {
    /// Options shared by every job; `reverse` is set per job
    options: Options,
    jobs: usize,
    /// Skip remaining jobs after the first failure
    fail_fast: bool,
}

impl BatchRun {
    pub fn new(options: Options) -> Self {
        Self { options, jobs: default_jobs(), fail_fast: false }
    }

    /// Set the number of parallel jobs.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Weave every pattern plain and reversed.
    ///
    /// Job failures are recorded in the result; only setup problems (bad
    /// options, unwritable directory, pool creation) are returned as errors.
    #[tracing::instrument(skip(self, patterns), fields(count = patterns.len(), workers = self.jobs))]
    pub fn run(&self, patterns: &[Pattern]) -> Result<BatchResult> {
        let start = Instant::now();
        self.options.validate()?;
        output::ensure_dir(&self.options.dir)?;

        let jobs = jobs_for(patterns);
        let pool = build_thread_pool(self.jobs)?;
        let failed = AtomicBool::new(false);

        let results: Vec<JobResult> =
            pool.install(|| jobs.par_iter().map(|job| self.run_job(job, &failed)).collect());

        let mut result = BatchResult::new();
        for job in results {
            result.add_result(job);
        }
        debug!(
            woven = result.success_count(),
            failed = result.failed_count(),
            "batch finished"
        );
        Ok(result.with_duration(start.elapsed()))
    }

    fn run_job(&self, job: &Job, failed: &AtomicBool) -> JobResult {
        let options = self.options.clone().with_reverse(job.reverse);
        let id = output::output_stem(&job.pattern, &options);

        if self.fail_fast && failed.load(Ordering::Relaxed) {
            return JobResult::skipped(id);
        }

        let start = Instant::now();
        match weave::make(&job.pattern, &options) {
            Ok(outputs) => {
                let mut files = vec![outputs.wif];
                files.extend(outputs.png);
                JobResult::success(id, files, start.elapsed())
            }
            Err(e) => {
                warn!(job = %id, kind = e.kind(), error = %e, "weave failed");
                failed.store(true, Ordering::Relaxed);
                JobResult::failed(id, e.to_string(), start.elapsed())
            }
        }
    }
}
