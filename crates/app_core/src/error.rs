//! Dialog error types

use crate::{HistoryError, ParseError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the dialog controller.
///
/// None of these are fatal: every failing action leaves the session exactly
/// as it was and the dialog keeps browsing.
#[derive(Error, Debug)]
pub enum DialogError {
    // ===== Input (user-correctable) =====
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Cannot parse file names: {0}")]
    Parse(#[from] ParseError),

    #[error("No filter at position {0}")]
    NoSuchFilter(usize),

    #[error("No entry at position {0}")]
    NoSuchEntry(usize),

    // ===== Filesystem =====
    #[error("Access denied: {}", .0.display())]
    AccessDenied(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== Session =====
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Dialog is already closed")]
    Closed,
}

impl DialogError {
    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            DialogError::InvalidName(_) | DialogError::Parse(_) => "invalid name".to_string(),
            DialogError::AccessDenied(_) => "access denied".to_string(),
            DialogError::FileNotFound(path) => format!("{} not found.", path.display()),
            _ => self.to_string(),
        }
    }
}

impl From<app_fs::FsError> for DialogError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::NotFound(p) => DialogError::NotFound(p),
            app_fs::FsError::NotADirectory(p) => DialogError::NotADirectory(p),
            app_fs::FsError::AccessDenied(p) => DialogError::AccessDenied(p),
            app_fs::FsError::Io(e) => DialogError::Io(e),
            app_fs::FsError::InvalidPattern { pattern, .. } => DialogError::InvalidName(pattern),
        }
    }
}
