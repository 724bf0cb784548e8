use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::scanner::FileKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mediabatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bulk archive extraction and audio metadata stripping")]
#[command(
    long_about = "MediaBatch scans a directory for zip archives or MP3 files and \
                  transforms them in parallel: archives are extracted into per-archive \
                  folders, MP3 tag containers are stripped down to a chosen field set."
)]
#[command(after_help = "EXAMPLES:\n  \
    mediabatch scan --directory downloads --kind archive\n  \
    mediabatch extract --directory downloads --output extracted --workers 8 --skip-existing\n  \
    mediabatch strip --directory music --keep-fields title,artist --dry-run\n  \
    mediabatch strip --directory music --output clean --remove-all")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Directories to exclude from scanning
    #[arg(long, global = true, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Maximum directory depth to scan
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List candidate files without transforming anything
    Scan {
        /// Directory to scan
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Kind of files to look for
        #[arg(short, long, value_enum)]
        kind: ScanKind,
    },

    /// Bulk extract zip archives
    Extract {
        /// Directory containing zip archives
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Output directory for extracted files
        #[arg(short, long, default_value = "extracted")]
        output: PathBuf,

        /// Number of concurrent workers (default: one per CPU core, capped)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Skip archives whose extraction directory already exists
        #[arg(short, long)]
        skip_existing: bool,
    },

    /// Strip metadata from MP3 files
    Strip {
        /// Directory containing MP3 files
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Output directory (if not given, files are rewritten in place)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of concurrent workers (default: one per CPU core, capped)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Skip files that already have no metadata
        #[arg(short, long)]
        skip_clean: bool,

        /// Keep only these fields (comma-separated: title,artist,album,year,track,genre)
        #[arg(short, long)]
        keep_fields: Option<String>,

        /// Remove all metadata, ignoring any keep list
        #[arg(short, long)]
        remove_all: bool,

        /// Report what would be removed without touching any file
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScanKind {
    /// Zip archives
    #[value(alias = "zip")]
    Archive,
    /// MP3 audio files
    #[value(alias = "mp3")]
    Audio,
}

impl From<ScanKind> for FileKind {
    fn from(kind: ScanKind) -> Self {
        match kind {
            ScanKind::Archive => FileKind::Archive,
            ScanKind::Audio => FileKind::Audio,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = CliOverrides::new()
            .with_exclude(self.exclude.clone())
            .with_max_depth(self.max_depth);
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }
}
