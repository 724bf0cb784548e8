use crate::error::{MediaBatchError, UserFriendlyError};
use crate::pool::report::{BatchReport, JobStatus};
use crate::scanner::{file_scanner::format_bytes, Candidate, FileKind};
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

pub struct OutputFormatter {
    #[allow(dead_code)]
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &MediaBatchError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    println!();
                    if self.use_colors {
                        println!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        println!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    println!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// The per-file outcome lines, one per candidate in scan order, followed
    /// by a summary. The lines themselves are mode-independent: they are the
    /// stable format callers and tests key on.
    pub fn print_report(&self, report: &BatchReport, elapsed: Duration) {
        match self.mode {
            OutputMode::Human => self.print_human_report(report, elapsed),
            OutputMode::Json => {
                let json_output = serde_json::json!({
                    "type": "report",
                    "outcomes": report.outcomes(),
                    "summary": report.counts(),
                    "duration_ms": elapsed.as_millis(),
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json_output).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputMode::Plain => {
                for line in report.render_lines() {
                    println!("{}", line);
                }
                println!("COMPLETED: {}", report.counts());
            }
        }
    }

    fn print_human_report(&self, report: &BatchReport, elapsed: Duration) {
        for outcome in report.outcomes() {
            let line = outcome.render();
            if self.use_colors {
                match outcome.status {
                    JobStatus::Succeeded { .. } => println!("{}", style(line).green()),
                    JobStatus::Skipped { .. } => println!("{}", style(line).dim()),
                    JobStatus::Failed { .. } => println!("{}", style(line).red()),
                }
            } else {
                println!("{}", line);
            }
        }

        if self.quiet {
            return;
        }

        println!();
        let summary = format!(
            "{} ({} files in {})",
            report.counts(),
            report.len(),
            format_duration(elapsed)
        );
        if report.has_failures() {
            println!("{}{}", CROSS, style(summary).yellow());
        } else {
            println!("{}{}", CHECKMARK, style(summary).bold());
        }
    }

    /// Read-only scan listing, one candidate per line.
    pub fn print_candidates(&self, candidates: &[Candidate], kind: FileKind) {
        match self.mode {
            OutputMode::Json => {
                let listing: Vec<_> = candidates
                    .iter()
                    .map(|c| {
                        let mut entry = serde_json::json!({
                            "path": c.display_path(),
                            "size": c.size,
                        });
                        if let Some(has_tags) = c.has_tags {
                            entry["has_tags"] = serde_json::Value::Bool(has_tags);
                        }
                        entry
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "scan",
                    "kind": kind.label(),
                    "files": listing,
                }));
            }
            _ => {
                for candidate in candidates {
                    let tags = match candidate.has_tags {
                        Some(true) => ", tagged",
                        Some(false) => ", clean",
                        None => "",
                    };
                    println!(
                        "{} ({}{})",
                        candidate.display_path(),
                        format_bytes(candidate.size),
                        tags
                    );
                }
            }
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
