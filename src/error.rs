use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaBatchError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("unreadable archive: {message}")]
    Archive { path: String, message: String },

    #[error("unreadable tag data: {message}")]
    Tag { path: String, message: String },

    #[error("Archive entry escapes extraction directory: {entry}")]
    UnsafeEntryPath { entry: String },
}

/// Failure class carried into a per-file outcome. Configuration errors never
/// reach this point; they abort the batch before any file is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Io,
    Format,
    PathSecurity,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Io => write!(f, "io"),
            FailureKind::Format => write!(f, "format"),
            FailureKind::PathSecurity => write!(f, "path security"),
        }
    }
}

impl MediaBatchError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            MediaBatchError::Archive { .. } | MediaBatchError::Tag { .. } => FailureKind::Format,
            MediaBatchError::UnsafeEntryPath { .. } => FailureKind::PathSecurity,
            _ => FailureKind::Io,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for MediaBatchError {
    fn user_message(&self) -> String {
        match self {
            MediaBatchError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            MediaBatchError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            MediaBatchError::Archive { path, message } => {
                format!("Cannot read archive {}: {}", path, message)
            }
            MediaBatchError::Tag { path, message } => {
                format!("Cannot read tag data in {}: {}", path, message)
            }
            MediaBatchError::UnsafeEntryPath { entry } => {
                format!("Archive entry escapes its extraction directory: {}", entry)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            MediaBatchError::Config { .. } => Some(
                "Check the command-line flags and the configuration file syntax.".to_string(),
            ),
            MediaBatchError::InvalidPath { .. } => Some(
                "Verify the directory exists and is readable.".to_string(),
            ),
            MediaBatchError::Archive { .. } => Some(
                "The file may be corrupt or not a zip archive. Re-download it or exclude it from the batch.".to_string(),
            ),
            MediaBatchError::UnsafeEntryPath { .. } => Some(
                "The archive contains unsafe entry paths and was rejected. Inspect it manually before extracting.".to_string(),
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MediaBatchError>;
