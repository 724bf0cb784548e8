use crate::error::FailureKind;
use serde::Serialize;
use std::path::PathBuf;

/// Terminal state of one job. A job is attempted exactly once; there is no
/// transition out of any of these states.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Succeeded { detail: String },
    Skipped { reason: String },
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: JobStatus,
}

impl JobOutcome {
    pub fn succeeded(path: PathBuf, detail: impl Into<String>) -> Self {
        Self {
            path,
            status: JobStatus::Succeeded {
                detail: detail.into(),
            },
        }
    }

    pub fn skipped(path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            path,
            status: JobStatus::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn failed(path: PathBuf, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            path,
            status: JobStatus::Failed {
                kind,
                message: message.into(),
            },
        }
    }

    /// Render the stable one-line form consumed by callers and golden tests.
    pub fn render(&self) -> String {
        match &self.status {
            JobStatus::Succeeded { detail } => {
                format!("{}: success ({})", self.path.display(), detail)
            }
            JobStatus::Skipped { reason } => {
                format!("{}: skipped ({})", self.path.display(), reason)
            }
            JobStatus::Failed { message, .. } => {
                format!("{}: error: {}", self.path.display(), message)
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, JobStatus::Failed { .. })
    }
}

/// The ordered, complete set of per-file outcomes for one batch invocation.
/// Always exactly one outcome per scanned candidate, in scan order.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    /// Restore scan order from the `(original index, outcome)` pairs the
    /// worker pool produced in completion order.
    pub fn assemble(mut indexed: Vec<(usize, JobOutcome)>) -> Self {
        indexed.sort_by_key(|(index, _)| *index);
        Self {
            outcomes: indexed.into_iter().map(|(_, outcome)| outcome).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> &[JobOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn render_lines(&self) -> Vec<String> {
        self.outcomes.iter().map(|o| o.render()).collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.is_failed())
    }

    pub fn counts(&self) -> ReportCounts {
        let mut counts = ReportCounts::default();
        for outcome in &self.outcomes {
            match outcome.status {
                JobStatus::Succeeded { .. } => counts.succeeded += 1,
                JobStatus::Skipped { .. } => counts.skipped += 1,
                JobStatus::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReportCounts {
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

impl std::fmt::Display for ReportCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} succeeded, {} skipped, {} failed",
            self.succeeded, self.skipped, self.failed
        )
    }
}
