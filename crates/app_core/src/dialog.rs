//! Dialog controller: owns the picker session and drives it through user
//! actions
//!
//! The controller is the only owner of the current directory, its listing,
//! the navigation history and the active filter. Every operation validates
//! and enumerates first and commits afterwards, so a failing action leaves
//! the session untouched.

use crate::tokenizer::{quote_names, tokenize};
use crate::{DialogError, DialogEvent, DialogMode, DialogOptions, NavigationHistory};
use app_fs::{
    is_valid_path, list_directory, parse_filter_string, DirectoryPath, FileFilter, FilterSpec,
    Listing,
};
use std::path::{Path, PathBuf};

const FOLDER_MODE_PLACEHOLDER: &str = "Select Folder.";
const WILDCARDS: &[char] = &['*', '?'];

/// Final output of an accepted dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    paths: Vec<PathBuf>,
}

impl SelectionResult {
    /// First selected path (the one a single-file caller opens)
    pub fn file_name(&self) -> &Path {
        &self.paths[0]
    }

    /// Every selected path, in input order
    pub fn file_names(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

/// Session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Browsing,
    /// Waiting for the user to allow overwriting an existing file
    AwaitingOverwrite(SelectionResult),
    Accepted(SelectionResult),
    Cancelled,
}

/// The file picker session
pub struct DialogController {
    options: DialogOptions,
    filters: Vec<FileFilter>,
    selected_filter: usize,
    custom_filter: Option<String>,
    history: NavigationHistory,
    current: DirectoryPath,
    listing: Listing,
    file_name_text: String,
    state: DialogState,
}

impl DialogController {
    /// Open a session in the configured initial directory, or the working
    /// directory when that is unset or unusable
    pub fn new(options: DialogOptions) -> Result<Self, DialogError> {
        let options = options.normalized();

        let mut filters = parse_filter_string(&options.filter);
        if filters.is_empty() {
            filters.push(FileFilter::all_files());
        }
        let selected_filter = match options.filter_index.saturating_sub(1) {
            i if i < filters.len() => i,
            _ => 0,
        };
        let spec = FilterSpec::Predefined(filters[selected_filter].clone());

        let (current, listing) = match open_initial(options.initial_directory.as_deref(), &spec) {
            Some(opened) => opened,
            None => {
                let cwd = DirectoryPath::current()?;
                let listing = list_directory(&cwd, &spec)?;
                (cwd, listing)
            }
        };

        let mut history = NavigationHistory::new();
        history.visit(current.clone());

        let file_name_text = match options.mode {
            DialogMode::SelectFolder => FOLDER_MODE_PLACEHOLDER.to_string(),
            _ => options.file_name.clone(),
        };

        tracing::info!("{} dialog opened in {}", options.title_text(), current);

        Ok(Self {
            options,
            filters,
            selected_filter,
            custom_filter: None,
            history,
            current,
            listing,
            file_name_text,
            state: DialogState::Browsing,
        })
    }

    // ===== Navigation =====

    /// Change to `path` (relative paths are taken from the current directory)
    pub fn navigate<P: AsRef<Path>>(&mut self, path: P) -> Result<(), DialogError> {
        self.ensure_open()?;

        let target = DirectoryPath::resolve(self.current.join(path))?;
        let listing = list_directory(&target, &self.active_filter())?;

        self.history.visit(target.clone());
        self.commit(target, listing);
        Ok(())
    }

    /// Change to the parent directory; ignored at the root
    pub fn go_up(&mut self) -> Result<DialogEvent, DialogError> {
        self.ensure_open()?;

        match self.current.as_path().parent() {
            Some(parent) => {
                let parent = parent.to_path_buf();
                self.navigate(parent)?;
                Ok(DialogEvent::Navigated)
            }
            None => Ok(DialogEvent::Ignored),
        }
    }

    /// Go back one step in history.
    ///
    /// If the previous directory has vanished or can't be read, the error is
    /// returned and neither the history position nor the listing move.
    pub fn undo(&mut self) -> Result<(), DialogError> {
        self.ensure_open()?;

        let target = self.history.peek_undo()?.clone();
        let (target, listing) = self.revisit(&target)?;
        self.history.undo()?;
        self.commit(target, listing);
        Ok(())
    }

    /// Go forward one step in history; same failure rules as [`Self::undo`]
    pub fn redo(&mut self) -> Result<(), DialogError> {
        self.ensure_open()?;

        let target = self.history.peek_redo()?.clone();
        let (target, listing) = self.revisit(&target)?;
        self.history.redo()?;
        self.commit(target, listing);
        Ok(())
    }

    /// Re-enumerate the current directory
    pub fn refresh(&mut self) -> Result<(), DialogError> {
        self.ensure_open()?;

        let (current, listing) = self.revisit(&self.current.clone())?;
        self.commit(current, listing);
        Ok(())
    }

    // ===== Filters =====

    /// Replace the active filter. A predefined filter clears the custom glob
    /// and vice versa.
    pub fn set_filter(&mut self, spec: FilterSpec) -> Result<(), DialogError> {
        self.ensure_open()?;

        let (selected, custom) = match &spec {
            FilterSpec::Predefined(filter) => {
                let index = self.filters.iter().position(|f| f == filter);
                (index, None)
            }
            FilterSpec::Custom(glob) => (Some(self.selected_filter), Some(glob.clone())),
        };

        let listing = list_directory(&self.current, &spec)?;

        match selected {
            Some(index) => self.selected_filter = index,
            None => {
                if let FilterSpec::Predefined(filter) = spec {
                    self.filters.push(filter);
                    self.selected_filter = self.filters.len() - 1;
                }
            }
        }
        self.custom_filter = custom;
        self.listing = listing;
        Ok(())
    }

    /// Select a predefined filter by position (0-based)
    pub fn select_filter(&mut self, index: usize) -> Result<(), DialogError> {
        let filter = self
            .filters
            .get(index)
            .cloned()
            .ok_or(DialogError::NoSuchFilter(index))?;
        self.set_filter(FilterSpec::Predefined(filter))
    }

    /// The rule the current listing was built with
    pub fn active_filter(&self) -> FilterSpec {
        match &self.custom_filter {
            Some(glob) => FilterSpec::Custom(glob.clone()),
            None => FilterSpec::Predefined(self.filters[self.selected_filter].clone()),
        }
    }

    pub fn filters(&self) -> &[FileFilter] {
        &self.filters
    }

    pub fn selected_filter(&self) -> usize {
        self.selected_filter
    }

    /// 1-based position of the predefined filter, for persisting between sessions
    pub fn filter_index(&self) -> usize {
        self.selected_filter + 1
    }

    pub fn custom_filter(&self) -> Option<&str> {
        self.custom_filter.as_deref()
    }

    // ===== Listing =====

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Rows per metadata backfill window
    pub fn page_size(&self) -> usize {
        self.options.metadata_batch
    }

    /// Fill metadata for one window of rows starting at `start`
    pub fn backfill(&mut self, start: usize) -> usize {
        self.listing.backfill(start, self.options.metadata_batch)
    }

    /// Rows selected in the view: their file names go into the name field.
    /// Directories and stale indices are skipped.
    pub fn select_entries(&mut self, indices: &[usize]) -> Result<DialogEvent, DialogError> {
        self.ensure_open()?;

        let names: Vec<&str> = indices
            .iter()
            .filter_map(|&i| self.listing.get(i))
            .filter(|e| !e.is_dir)
            .map(|e| e.name.as_str())
            .collect();

        if names.is_empty() || self.options.mode == DialogMode::SelectFolder {
            return Ok(DialogEvent::Ignored);
        }

        self.file_name_text = quote_names(&names);
        Ok(DialogEvent::SelectionChanged)
    }

    /// Row double-clicked: enter directories, confirm files
    pub fn activate(&mut self, index: usize) -> Result<DialogEvent, DialogError> {
        self.ensure_open()?;

        let entry = self
            .listing
            .get(index)
            .ok_or(DialogError::NoSuchEntry(index))?;
        let name = entry.name.clone();

        if entry.is_dir {
            self.navigate(&name)?;
            if self.custom_filter.is_none() {
                self.file_name_text.clear();
            }
            return Ok(DialogEvent::Navigated);
        }

        self.confirm_selection(&name)
    }

    // ===== Confirmation =====

    /// Handle the confirm button with the file name field's text.
    ///
    /// Depending on the input this accepts the dialog, enters a directory,
    /// turns a wildcard name into a custom filter, or asks for overwrite
    /// permission. Errors leave the dialog browsing.
    pub fn confirm_selection(&mut self, raw_text: &str) -> Result<DialogEvent, DialogError> {
        self.ensure_open()?;

        if self.options.mode == DialogMode::SelectFolder {
            let folder = self.current.to_path_buf();
            self.accept(vec![folder]);
            return Ok(DialogEvent::Accepted);
        }

        self.file_name_text = raw_text.to_string();
        if raw_text.is_empty() {
            return Ok(DialogEvent::Ignored);
        }

        // An empty name resolves to the current directory
        let names = tokenize(raw_text)?;
        if names.is_empty() {
            return Ok(DialogEvent::Ignored);
        }
        let count = if self.options.multiselect { names.len() } else { 1 };
        let names = &names[..count];

        if let [name] = names {
            let full_path = self.current.join(name);

            if full_path.is_dir() {
                self.navigate(&full_path)?;
                self.file_name_text.clear();
                return Ok(DialogEvent::Navigated);
            }

            let file_name = Path::new(name)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if file_name.contains(WILDCARDS) {
                self.set_filter(FilterSpec::Custom(file_name.clone()))?;
                self.file_name_text = file_name.clone();
                return Ok(DialogEvent::FilterApplied(file_name));
            }
        }

        let paths = self.resolve_targets(names)?;

        if let [target] = paths.as_slice() {
            if self.options.overwrite_prompt && target.is_file() {
                let target = target.clone();
                tracing::debug!("Awaiting overwrite confirmation for {}", target.display());
                self.state = DialogState::AwaitingOverwrite(SelectionResult { paths });
                return Ok(DialogEvent::OverwritePending(target));
            }
        }

        self.accept(paths);
        Ok(DialogEvent::Accepted)
    }

    /// Answer a pending overwrite prompt. Declining returns to browsing.
    pub fn resolve_overwrite(&mut self, overwrite: bool) -> Result<DialogEvent, DialogError> {
        match std::mem::replace(&mut self.state, DialogState::Browsing) {
            DialogState::AwaitingOverwrite(selection) if overwrite => {
                self.accept(selection.into_paths());
                Ok(DialogEvent::Accepted)
            }
            DialogState::AwaitingOverwrite(_) | DialogState::Browsing => Ok(DialogEvent::Ignored),
            closed => {
                self.state = closed;
                Err(DialogError::Closed)
            }
        }
    }

    /// Close the dialog without a selection
    pub fn cancel(&mut self) {
        tracing::info!("Dialog cancelled");
        self.state = DialogState::Cancelled;
    }

    // ===== Accessors =====

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            DialogState::Browsing | DialogState::AwaitingOverwrite(_)
        )
    }

    /// The accepted selection; `None` until accepted and after cancel
    pub fn selection(&self) -> Option<&SelectionResult> {
        match &self.state {
            DialogState::Accepted(selection) => Some(selection),
            _ => None,
        }
    }

    pub fn current_dir(&self) -> &DirectoryPath {
        &self.current
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn file_name_text(&self) -> &str {
        &self.file_name_text
    }

    pub fn set_file_name_text(&mut self, text: impl Into<String>) {
        if self.options.mode != DialogMode::SelectFolder {
            self.file_name_text = text.into();
        }
    }

    pub fn options(&self) -> &DialogOptions {
        &self.options
    }

    pub fn title(&self) -> &str {
        self.options.title_text()
    }

    // ===== Internals =====

    fn ensure_open(&mut self) -> Result<(), DialogError> {
        match self.state {
            DialogState::Browsing => Ok(()),
            DialogState::AwaitingOverwrite(_) => {
                // Any other action dismisses the prompt as a "no"
                self.state = DialogState::Browsing;
                Ok(())
            }
            DialogState::Accepted(_) | DialogState::Cancelled => Err(DialogError::Closed),
        }
    }

    /// Re-validate a directory we have been to before and list it
    fn revisit(&self, dir: &DirectoryPath) -> Result<(DirectoryPath, Listing), DialogError> {
        let dir = DirectoryPath::resolve(dir)?;
        let listing = list_directory(&dir, &self.active_filter())?;
        Ok((dir, listing))
    }

    fn commit(&mut self, dir: DirectoryPath, listing: Listing) {
        tracing::debug!("Current directory: {} ({} entries)", dir, listing.len());
        self.current = dir;
        self.listing = listing;
    }

    /// Turn names into absolute paths, checking existence and applying the
    /// default extension
    fn resolve_targets(&self, names: &[String]) -> Result<Vec<PathBuf>, DialogError> {
        names
            .iter()
            .map(|name| {
                if !is_valid_path(name, false) {
                    return Err(DialogError::InvalidName(name.clone()));
                }

                let full_path = self.current.join(name);
                if self.options.check_file_exists && !full_path.is_file() {
                    return Err(DialogError::FileNotFound(full_path));
                }

                Ok(self.with_default_ext(full_path))
            })
            .collect()
    }

    fn with_default_ext(&self, path: PathBuf) -> PathBuf {
        let has_ext = path.extension().map_or(false, |e| !e.is_empty());
        if has_ext || self.options.default_ext.is_empty() {
            return path;
        }
        let mut raw = path.into_os_string();
        raw.push(".");
        raw.push(&self.options.default_ext);
        PathBuf::from(raw)
    }

    fn accept(&mut self, paths: Vec<PathBuf>) {
        tracing::info!("Dialog accepted: {} path(s), first {}", paths.len(), paths[0].display());
        self.state = DialogState::Accepted(SelectionResult { paths });
    }
}

fn open_initial(dir: Option<&Path>, spec: &FilterSpec) -> Option<(DirectoryPath, Listing)> {
    let dir = DirectoryPath::resolve(dir?).ok()?;
    match list_directory(&dir, spec) {
        Ok(listing) => Some((dir, listing)),
        Err(e) => {
            tracing::warn!("Cannot open initial directory {}: {}", dir, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_in(temp: &TempDir) -> DialogController {
        let options = DialogOptions::new(DialogMode::OpenFile)
            .initial_directory(temp.path())
            .filter("Images|*.png;*.jpg|All|*");
        DialogController::new(options).unwrap()
    }

    #[test]
    fn test_opens_in_initial_directory() {
        let temp = TempDir::new().unwrap();
        let dialog = open_in(&temp);
        assert_eq!(dialog.current_dir().as_path(), temp.path());
        assert_eq!(dialog.history().len(), 1);
        assert!(!dialog.can_undo());
        assert_eq!(dialog.state(), &DialogState::Browsing);
    }

    #[test]
    fn test_missing_initial_directory_falls_back_to_cwd() {
        let temp = TempDir::new().unwrap();
        let options = DialogOptions::new(DialogMode::OpenFile)
            .initial_directory(temp.path().join("gone"));
        let dialog = DialogController::new(options).unwrap();
        let cwd = DirectoryPath::current().unwrap();
        assert_eq!(dialog.current_dir(), &cwd);
    }

    #[test]
    fn test_filter_index_is_one_based() {
        let temp = TempDir::new().unwrap();
        let options = DialogOptions::new(DialogMode::OpenFile)
            .initial_directory(temp.path())
            .filter("A|*.a|B|*.b")
            .filter_index(2);
        let dialog = DialogController::new(options).unwrap();
        assert_eq!(dialog.selected_filter(), 1);
        assert_eq!(dialog.filter_index(), 2);

        let options = DialogOptions::new(DialogMode::OpenFile)
            .initial_directory(temp.path())
            .filter("A|*.a")
            .filter_index(7);
        assert_eq!(DialogController::new(options).unwrap().selected_filter(), 0);
    }

    #[test]
    fn test_no_filters_lists_everything() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("x.bin"), b"").unwrap();
        let options = DialogOptions::new(DialogMode::OpenFile).initial_directory(temp.path());
        let dialog = DialogController::new(options).unwrap();
        assert_eq!(dialog.filters(), &[FileFilter::all_files()]);
        assert_eq!(dialog.listing().len(), 1);
    }

    #[test]
    fn test_custom_and_predefined_are_exclusive() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.png"), b"").unwrap();
        std::fs::write(temp.path().join("b.txt"), b"").unwrap();
        let mut dialog = open_in(&temp);
        assert_eq!(dialog.listing().len(), 1);

        dialog.set_filter(FilterSpec::Custom("b".into())).unwrap();
        assert_eq!(dialog.custom_filter(), Some("b"));
        assert_eq!(dialog.listing().files()[0].name, "b.txt");

        dialog.select_filter(1).unwrap();
        assert_eq!(dialog.custom_filter(), None);
        assert_eq!(dialog.listing().len(), 2);
        assert!(matches!(dialog.select_filter(5), Err(DialogError::NoSuchFilter(5))));
    }

    #[test]
    fn test_select_entries_fills_name_field() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("a.png"), b"").unwrap();
        std::fs::write(temp.path().join("b.png"), b"").unwrap();
        let mut dialog = open_in(&temp);

        // Index 0 is the directory and is skipped
        assert_eq!(dialog.select_entries(&[0, 1]).unwrap(), DialogEvent::SelectionChanged);
        let single = dialog.file_name_text().to_string();
        assert!(single == "a.png" || single == "b.png");

        dialog.select_entries(&[1, 2, 99]).unwrap();
        let text = dialog.file_name_text();
        assert!(text.starts_with('"') && text.contains("a.png") && text.contains("b.png"));

        assert_eq!(dialog.select_entries(&[0]).unwrap(), DialogEvent::Ignored);
    }

    #[test]
    fn test_cancel_leaves_no_selection() {
        let temp = TempDir::new().unwrap();
        let mut dialog = open_in(&temp);
        dialog.cancel();
        assert_eq!(dialog.state(), &DialogState::Cancelled);
        assert!(dialog.selection().is_none());
        assert!(matches!(dialog.navigate(temp.path()), Err(DialogError::Closed)));
    }

    #[test]
    fn test_default_ext() {
        let temp = TempDir::new().unwrap();
        let options = DialogOptions::new(DialogMode::SaveFile)
            .initial_directory(temp.path())
            .default_ext(".png");
        let dialog = DialogController::new(options).unwrap();
        assert_eq!(
            dialog.with_default_ext(temp.path().join("plot")),
            temp.path().join("plot.png")
        );
        assert_eq!(
            dialog.with_default_ext(temp.path().join("plot.hdr")),
            temp.path().join("plot.hdr")
        );
        assert_eq!(
            dialog.with_default_ext(temp.path().join("plot.")),
            temp.path().join("plot..png")
        );
    }
}
