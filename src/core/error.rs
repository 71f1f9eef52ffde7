//! Error types for cache file operations
//!
//! All store operations return `CacheResult<T>`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors surfaced by the cache store
#[derive(Error, Debug)]
pub enum CacheError {
    /// The operation needs an existing cache file and there is none
    #[error("cache file is not found.")]
    NotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CacheError {
    /// Map an I/O error from opening `cache_file`, keeping "not found" typed
    pub fn from_open(err: std::io::Error, cache_file: &Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            CacheError::NotFound {
                path: cache_file.to_path_buf(),
            }
        } else {
            CacheError::Io(err)
        }
    }
}
