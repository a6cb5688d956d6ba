//! PlotView File System Layer
//!
//! Everything the picker needs from the host filesystem:
//! - DirectoryPath: absolute, normalized directory handle
//! - Path validation (reserved characters and device names)
//! - File filters and the glob patterns they compile to
//! - Extension classification for entry icons
//! - Directory listing with lazily backfilled metadata

mod dir_path;
mod validate;
mod pattern;
mod classify;
mod filter;
mod listing;

pub use dir_path::DirectoryPath;
pub use validate::{is_valid_path, first_invalid_char};
pub use pattern::GlobPattern;
pub use classify::{classify, classify_name, FileClass};
pub use filter::{format_filter_string, parse_filter_string, FileFilter, FilterSpec};
pub use listing::{
    format_size, is_valid_time_format, list_directory, Entry, Listing, DEFAULT_BATCH,
};

use std::path::PathBuf;
use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Access denied: {}", .0.display())]
    AccessDenied(PathBuf),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl FsError {
    /// Map an enumeration failure on `path` to the matching variant
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::AccessDenied(path.to_path_buf()),
            _ => FsError::Io(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
