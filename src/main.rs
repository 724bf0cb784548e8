use clap::Parser;
use mediabatch::{
    Cli, Command, ExtractRequest, FileKind, MediaBatch, MediaBatchError, OutputFormatter,
    OutputMode, StripRequest, UserFriendlyError,
};
use std::process;
use std::time::Instant;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    let app = match MediaBatch::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    match &cli.command {
        Command::Scan { directory, kind } => {
            match app.scan(directory, FileKind::from(*kind)) {
                Ok(candidates) => {
                    app.output_formatter().print_candidates(&candidates, FileKind::from(*kind));
                    0
                }
                Err(e) => {
                    app.handle_error(&e);
                    exit_code_for(&e)
                }
            }
        }

        Command::Extract {
            directory,
            output,
            workers,
            skip_existing,
        } => {
            let request = ExtractRequest {
                directory: directory.clone(),
                output: output.clone(),
                workers: workers.unwrap_or(app.config().batch.workers),
                skip_existing: *skip_existing,
            };
            run_batch(&app, || app.extract_archives(&request))
        }

        Command::Strip {
            directory,
            output,
            workers,
            skip_clean,
            keep_fields,
            remove_all,
            dry_run,
        } => {
            let request = StripRequest {
                directory: directory.clone(),
                output: output.clone(),
                workers: workers.unwrap_or(app.config().batch.workers),
                skip_clean: *skip_clean,
                keep_fields: keep_fields.clone(),
                remove_all: *remove_all,
                dry_run: *dry_run,
            };
            run_batch(&app, || app.strip_metadata(&request))
        }
    }
}

fn run_batch<F>(app: &MediaBatch, batch: F) -> i32
where
    F: FnOnce() -> mediabatch::Result<mediabatch::BatchReport>,
{
    let start = Instant::now();

    match batch() {
        Ok(report) => {
            app.output_formatter().print_report(&report, start.elapsed());
            if report.has_failures() {
                2 // Completed, but some files failed
            } else {
                0
            }
        }
        Err(e) => {
            app.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &MediaBatchError) -> i32 {
    match error {
        MediaBatchError::Config { .. } => 3,
        MediaBatchError::InvalidPath { .. } => 4,
        MediaBatchError::Io(_) => 5,
        _ => 1,
    }
}

fn print_startup_error(error: &MediaBatchError) {
    // Configuration failed before a formatter mode was decided
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
