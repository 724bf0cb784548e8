use crate::error::{MediaBatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on concurrent workers. Requests above this are clamped.
pub const MAX_WORKERS: usize = 16;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_depth: usize,
    pub follow_links: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: vec![
                ".git".to_string(),
                "__MACOSX".to_string(),
                ".Trash".to_string(),
            ],
            exclude_patterns: vec![
                r"^\._".to_string(), // AppleDouble resource forks
                r"^\.DS_Store$".to_string(),
            ],
            max_depth: 10,
            follow_links: true,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().clamp(1, MAX_WORKERS),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MediaBatchError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| MediaBatchError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| MediaBatchError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["mediabatch.toml", ".mediabatch.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref exclude) = cli_args.exclude {
            self.scan.exclude_dirs.extend(exclude.clone());
        }

        if let Some(max_depth) = cli_args.max_depth {
            self.scan.max_depth = max_depth;
        }

        if let Some(workers) = cli_args.workers {
            self.batch.workers = workers;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.max_depth == 0 {
            return Err(MediaBatchError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        for pattern in &self.scan.exclude_patterns {
            if regex::Regex::new(pattern).is_err() {
                return Err(MediaBatchError::Config {
                    message: format!("Invalid exclude pattern: {}", pattern),
                });
            }
        }

        validate_workers(self.batch.workers)?;

        Ok(())
    }
}

/// Reject a zero worker count; callers clamp values above [`MAX_WORKERS`]
/// through [`effective_workers`].
pub fn validate_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(MediaBatchError::Config {
            message: "Worker count must be at least 1".to_string(),
        });
    }
    Ok(())
}

pub fn effective_workers(workers: usize) -> usize {
    workers.min(MAX_WORKERS)
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub exclude: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub workers: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }
}

/// One archive-extraction batch invocation.
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub directory: PathBuf,
    pub output: PathBuf,
    pub workers: usize,
    pub skip_existing: bool,
}

impl ExtractRequest {
    pub fn validate(&self) -> Result<()> {
        validate_workers(self.workers)
    }

    pub fn effective_workers(&self) -> usize {
        effective_workers(self.workers)
    }
}

/// One metadata-stripping batch invocation. `output: None` means the files
/// are rewritten in place.
#[derive(Debug, Clone)]
pub struct StripRequest {
    pub directory: PathBuf,
    pub output: Option<PathBuf>,
    pub workers: usize,
    pub skip_clean: bool,
    pub keep_fields: Option<String>,
    pub remove_all: bool,
    pub dry_run: bool,
}

impl StripRequest {
    pub fn validate(&self) -> Result<()> {
        validate_workers(self.workers)
    }

    pub fn effective_workers(&self) -> usize {
        effective_workers(self.workers)
    }
}
