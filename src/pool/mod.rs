pub mod report;
pub mod worker;

pub use report::{BatchReport, JobOutcome, JobStatus, ReportCounts};
pub use worker::WorkerPool;
