//! Batch result types.

use std::path::PathBuf;
use std::time::Duration;

/// Status of a single weave job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Both files written
    Success,
    /// Not attempted because an earlier job failed
    Skipped,
    /// Job failed with error
    Failed(String),
}

impl JobStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobStatus::Failed(_))
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Success => write!(f, "success"),
            JobStatus::Skipped => write!(f, "skipped"),
            JobStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of weaving one `(pattern, reverse)` job.
#[derive(Debug, Clone)]
pub struct JobResult {
    /// Output file stem, e.g. `1-2-reversed`
    pub id: String,
    pub status: JobStatus,
    /// Files written
    pub outputs: Vec<PathBuf>,
    pub duration: Duration,
}

impl JobResult {
    pub fn success(id: String, outputs: Vec<PathBuf>, duration: Duration) -> Self {
        Self { id, status: JobStatus::Success, outputs, duration }
    }

    pub fn skipped(id: String) -> Self {
        Self { id, status: JobStatus::Skipped, outputs: vec![], duration: Duration::ZERO }
    }

    pub fn failed(id: String, error: String, duration: Duration) -> Self {
        Self { id, status: JobStatus::Failed(error), outputs: vec![], duration }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete batch run, jobs in submission order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub jobs: Vec<JobResult>,
    pub total_duration: Duration,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: JobResult) {
        self.jobs.push(result);
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    pub fn success_count(&self) -> usize {
        self.jobs.iter().filter(|r| r.status.is_success()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.jobs.iter().filter(|r| matches!(r.status, JobStatus::Skipped)).count()
    }

    pub fn failed_count(&self) -> usize {
        self.jobs.iter().filter(|r| r.status.is_failure()).count()
    }

    /// True when no job failed.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.jobs.iter().flat_map(|r| r.outputs.iter()).collect()
    }

    pub fn failures(&self) -> Vec<&JobResult> {
        self.jobs.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Human-readable summary, listing failed jobs.
    pub fn summary(&self) -> String {
        let success = self.success_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();
        let total = self.jobs.len();

        if failed == 0 {
            return format!(
                "Wove {} patterns ({} skipped, {} total) in {:?}",
                success, skipped, total, self.total_duration
            );
        }

        let mut lines = vec![format!(
            "Batch failed: {} woven, {} skipped, {} failed ({} total)",
            success, skipped, failed, total
        )];
        for job in self.failures() {
            lines.push(format!("  - {}: {}", job.id, job.status));
        }
        lines.join("\n")
    }
}
