/// Error types for gitscout.
///
/// Only invocation-level failures (bad pattern, bad configuration, unreadable
/// root, pool construction) ever leave the library. Failures while reading a
/// single repository's log are represented by [`SearchError::GitError`], logged
/// inside the worker and then dropped, so one broken repository never affects
/// its siblings.
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("git log failed in {path}: {message}")]
    GitError { path: PathBuf, message: String },
}

impl SearchError {
    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        Self::InvalidPattern(pattern.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn git_error(path: &Path, message: impl Into<String>) -> Self {
        Self::GitError {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
