pub mod archive;
pub mod metadata;

pub use archive::ArchiveExtractor;
pub use metadata::{FieldSelection, MetadataStripper, TagField};

use crate::error::Result;
use crate::pool::report::JobOutcome;
use crate::scanner::Candidate;

/// The closed set of per-file strategies, dispatched by configuration.
pub enum BatchOperation {
    Extract(ArchiveExtractor),
    Strip(MetadataStripper),
}

impl BatchOperation {
    fn skip_reason(&self, candidate: &Candidate) -> Option<String> {
        match self {
            BatchOperation::Extract(op) => op.skip_reason(candidate),
            BatchOperation::Strip(op) => op.skip_reason(candidate),
        }
    }

    fn apply(&self, candidate: &Candidate) -> Result<String> {
        match self {
            BatchOperation::Extract(op) => op.extract(candidate),
            BatchOperation::Strip(op) => op.strip(candidate),
        }
    }

    /// Skip policy first, then the strategy. Per-file errors fold into the
    /// outcome here and never cross job boundaries.
    pub fn run(&self, candidate: &Candidate) -> JobOutcome {
        if let Some(reason) = self.skip_reason(candidate) {
            return JobOutcome::skipped(candidate.path.clone(), reason);
        }

        match self.apply(candidate) {
            Ok(detail) => JobOutcome::succeeded(candidate.path.clone(), detail),
            Err(err) => JobOutcome::failed(
                candidate.path.clone(),
                err.failure_kind(),
                err.to_string(),
            ),
        }
    }
}
