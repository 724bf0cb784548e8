pub mod cli;
pub mod config;
pub mod error;
pub mod ops;
pub mod pool;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, Command, OutputFormat};
pub use config::{Config, ExtractRequest, StripRequest, MAX_WORKERS};
pub use error::{FailureKind, MediaBatchError, Result, UserFriendlyError};

// Core functionality re-exports
pub use ops::{ArchiveExtractor, BatchOperation, FieldSelection, MetadataStripper, TagField};
pub use pool::{BatchReport, JobOutcome, JobStatus, ReportCounts, WorkerPool};
pub use scanner::{Candidate, FileKind, FileScanner, ScanStatistics};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::fs;
use std::path::Path;

/// Main library interface: one instance per invocation, one method per batch
/// kind. Requests are fully-populated configuration values; the orchestrator
/// holds no mutable session state.
pub struct MediaBatch {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl MediaBatch {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(output_mode == OutputMode::Human && !quiet);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = cli.load_config()?;
        let output_mode = match cli.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli.verbose, cli.quiet))
    }

    /// Enumerate candidates without touching them. Safe to call repeatedly.
    pub fn scan(&self, directory: &Path, kind: FileKind) -> Result<Vec<Candidate>> {
        let scanner = FileScanner::new(&self.config.scan);
        let candidates = scanner.scan(directory, kind)?;
        self.output_formatter
            .debug(&scanner.statistics(&candidates).display_summary());
        Ok(candidates)
    }

    /// Extract every archive candidate under `request.directory` into
    /// `request.output`, at most `workers` archives in flight at once.
    pub fn extract_archives(&self, request: &ExtractRequest) -> Result<BatchReport> {
        request.validate()?;

        fs::create_dir_all(&request.output).map_err(|e| MediaBatchError::Config {
            message: format!(
                "Cannot create output directory {}: {}",
                request.output.display(),
                e
            ),
        })?;

        self.output_formatter.start_operation(&format!(
            "Extracting archives from {}",
            request.directory.display()
        ));

        let candidates = self.scan(&request.directory, FileKind::Archive)?;
        if candidates.is_empty() {
            self.output_formatter.info(&format!(
                "No archive files found in {}",
                request.directory.display()
            ));
            return Ok(BatchReport::empty());
        }

        let operation = BatchOperation::Extract(ArchiveExtractor::new(
            request.output.clone(),
            request.skip_existing,
        ));

        Ok(self.run_batch(&candidates, &operation, request.effective_workers(), "Extracting"))
    }

    /// Strip tag fields from every audio candidate under `request.directory`,
    /// in place or into a mirrored tree under `request.output`.
    pub fn strip_metadata(&self, request: &StripRequest) -> Result<BatchReport> {
        request.validate()?;

        if let Some(output) = &request.output {
            // A dry run must not create directories either.
            if !request.dry_run {
                fs::create_dir_all(output).map_err(|e| MediaBatchError::Config {
                    message: format!(
                        "Cannot create output directory {}: {}",
                        output.display(),
                        e
                    ),
                })?;
            }
        }

        self.output_formatter.start_operation(&format!(
            "Stripping metadata under {}{}",
            request.directory.display(),
            if request.dry_run { " (dry run)" } else { "" }
        ));

        let candidates = self.scan(&request.directory, FileKind::Audio)?;
        if candidates.is_empty() {
            self.output_formatter.info(&format!(
                "No audio files found in {}",
                request.directory.display()
            ));
            return Ok(BatchReport::empty());
        }

        let selection = FieldSelection::new(request.remove_all, request.keep_fields.as_deref());
        let operation = BatchOperation::Strip(MetadataStripper::new(
            request.output.clone(),
            selection,
            request.skip_clean,
            request.dry_run,
        ));

        Ok(self.run_batch(&candidates, &operation, request.effective_workers(), "Stripping"))
    }

    fn run_batch(
        &self,
        candidates: &[Candidate],
        operation: &BatchOperation,
        workers: usize,
        label: &str,
    ) -> BatchReport {
        let progress = self
            .progress_manager
            .create_batch_progress(candidates.len() as u64, label);

        let pool = WorkerPool::new(workers);
        let indexed = pool.run(candidates, |candidate| {
            let outcome = operation.run(candidate);
            progress.inc(1);
            outcome
        });

        progress.finish_and_clear();
        BatchReport::assemble(indexed)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &MediaBatchError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
