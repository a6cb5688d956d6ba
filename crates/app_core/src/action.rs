//! User actions and their routing into the dialog controller

use crate::{DialogController, DialogError};
use std::path::PathBuf;

/// A discrete user action on the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    /// Go to a directory typed into the location box
    Navigate(PathBuf),
    /// Go to the parent directory
    Up,
    Undo,
    Redo,
    /// Re-enumerate the current directory
    Refresh,
    /// Pick a predefined filter by position
    SelectFilter(usize),
    /// Replace the filter with a typed glob
    CustomFilter(String),
    /// Rows selected in the listing
    SelectEntries(Vec<usize>),
    /// Row double-clicked
    Activate(usize),
    /// Confirm button with the file name field's text
    Confirm(String),
    /// Answer to the overwrite prompt
    ResolveOverwrite(bool),
    Cancel,
}

impl DialogAction {
    pub const NAV_GOTO: &'static str = "nav.goto";
    pub const NAV_UP: &'static str = "nav.up";
    pub const NAV_UNDO: &'static str = "nav.undo";
    pub const NAV_REDO: &'static str = "nav.redo";
    pub const NAV_REFRESH: &'static str = "nav.refresh";
    pub const FILTER_SELECT: &'static str = "filter.select";
    pub const FILTER_CUSTOM: &'static str = "filter.custom";
    pub const LIST_SELECT: &'static str = "list.select";
    pub const LIST_ACTIVATE: &'static str = "list.activate";
    pub const DIALOG_CONFIRM: &'static str = "dialog.confirm";
    pub const DIALOG_OVERWRITE: &'static str = "dialog.overwrite";
    pub const DIALOG_CANCEL: &'static str = "dialog.cancel";

    /// Stable identifier, used in logs and key bindings
    pub fn id(&self) -> &'static str {
        match self {
            DialogAction::Navigate(_) => Self::NAV_GOTO,
            DialogAction::Up => Self::NAV_UP,
            DialogAction::Undo => Self::NAV_UNDO,
            DialogAction::Redo => Self::NAV_REDO,
            DialogAction::Refresh => Self::NAV_REFRESH,
            DialogAction::SelectFilter(_) => Self::FILTER_SELECT,
            DialogAction::CustomFilter(_) => Self::FILTER_CUSTOM,
            DialogAction::SelectEntries(_) => Self::LIST_SELECT,
            DialogAction::Activate(_) => Self::LIST_ACTIVATE,
            DialogAction::Confirm(_) => Self::DIALOG_CONFIRM,
            DialogAction::ResolveOverwrite(_) => Self::DIALOG_OVERWRITE,
            DialogAction::Cancel => Self::DIALOG_CANCEL,
        }
    }
}

/// What an action did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// The current directory changed and was re-listed
    Navigated,
    /// The listing was rebuilt in place (filter change or refresh)
    Relisted,
    /// The filter was replaced by a glob typed into the file name field
    FilterApplied(String),
    /// The file name field was rewritten from the listing selection
    SelectionChanged,
    /// The single target exists; the caller must ask before overwriting
    OverwritePending(PathBuf),
    Accepted,
    Cancelled,
    /// Nothing to do (empty input, declined prompt, no parent)
    Ignored,
}

impl DialogController {
    /// Route an action to the matching controller operation
    pub fn dispatch(&mut self, action: DialogAction) -> Result<DialogEvent, DialogError> {
        let id = action.id();
        tracing::debug!("Dispatching {}", id);

        let result = match action {
            DialogAction::Navigate(path) => self.navigate(&path).map(|_| DialogEvent::Navigated),
            DialogAction::Up => self.go_up(),
            DialogAction::Undo => self.undo().map(|_| DialogEvent::Navigated),
            DialogAction::Redo => self.redo().map(|_| DialogEvent::Navigated),
            DialogAction::Refresh => self.refresh().map(|_| DialogEvent::Relisted),
            DialogAction::SelectFilter(index) => {
                self.select_filter(index).map(|_| DialogEvent::Relisted)
            }
            DialogAction::CustomFilter(glob) => self
                .set_filter(app_fs::FilterSpec::Custom(glob))
                .map(|_| DialogEvent::Relisted),
            DialogAction::SelectEntries(indices) => self.select_entries(&indices),
            DialogAction::Activate(index) => self.activate(index),
            DialogAction::Confirm(text) => self.confirm_selection(&text),
            DialogAction::ResolveOverwrite(accept) => self.resolve_overwrite(accept),
            DialogAction::Cancel => {
                self.cancel();
                Ok(DialogEvent::Cancelled)
            }
        };

        if let Err(e) = &result {
            tracing::warn!("{} failed: {}", id, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_namespaced() {
        let actions = [
            DialogAction::Up,
            DialogAction::Undo,
            DialogAction::Confirm(String::new()),
            DialogAction::Cancel,
        ];
        for action in actions {
            let id = action.id();
            assert!(id.contains('.'), "{id}");
        }
        assert_eq!(DialogAction::Activate(3).id(), "list.activate");
    }
}
