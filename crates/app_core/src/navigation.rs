//! Directory navigation history (undo/redo)

use app_fs::DirectoryPath;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

/// Linear history of visited directories.
///
/// Visiting a new directory while somewhere in the middle of the history
/// drops everything after the current position. The history never looks at
/// the disk; whoever moves through it re-validates the target.
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    entries: Vec<DirectoryPath>,
    index: usize,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit to `path`
    pub fn visit(&mut self, path: DirectoryPath) {
        if self.entries.is_empty() {
            self.entries.push(path);
            self.index = 0;
            return;
        }

        if self.entries[self.index] == path {
            return;
        }

        self.entries.truncate(self.index + 1);
        self.entries.push(path);
        self.index = self.entries.len() - 1;
    }

    /// Step back and return the directory now current
    pub fn undo(&mut self) -> Result<&DirectoryPath, HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        self.index -= 1;
        Ok(&self.entries[self.index])
    }

    /// Step forward and return the directory now current
    pub fn redo(&mut self) -> Result<&DirectoryPath, HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        self.index += 1;
        Ok(&self.entries[self.index])
    }

    /// The directory `undo` would move to, without moving
    pub fn peek_undo(&self) -> Result<&DirectoryPath, HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        Ok(&self.entries[self.index - 1])
    }

    /// The directory `redo` would move to, without moving
    pub fn peek_redo(&self) -> Result<&DirectoryPath, HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        Ok(&self.entries[self.index + 1])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&DirectoryPath> {
        self.entries.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectoryPath> {
        self.entries.iter()
    }
}
