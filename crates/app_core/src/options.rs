//! Dialog options and per-mode defaults

use crate::config::DialogConfig;
use app_fs::DEFAULT_BATCH;
use std::path::PathBuf;

/// What the dialog is picking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    OpenFile,
    SaveFile,
    SelectFolder,
}

impl DialogMode {
    /// Label for the confirm button
    pub fn confirm_label(self) -> &'static str {
        match self {
            DialogMode::OpenFile => "Open",
            DialogMode::SaveFile => "Save",
            DialogMode::SelectFolder => "Select",
        }
    }

    fn default_title(self) -> &'static str {
        match self {
            DialogMode::OpenFile => "Open",
            DialogMode::SaveFile => "Save as",
            DialogMode::SelectFolder => "Select folder",
        }
    }
}

/// Builder for a dialog session
#[derive(Debug, Clone)]
pub struct DialogOptions {
    pub(crate) mode: DialogMode,
    pub(crate) title: Option<String>,
    pub(crate) initial_directory: Option<PathBuf>,
    pub(crate) file_name: String,
    pub(crate) filter: String,
    pub(crate) filter_index: usize,
    pub(crate) multiselect: bool,
    pub(crate) check_file_exists: bool,
    pub(crate) overwrite_prompt: bool,
    pub(crate) default_ext: String,
    pub(crate) metadata_batch: usize,
}

impl DialogOptions {
    /// Create options with the defaults of `mode`
    pub fn new(mode: DialogMode) -> Self {
        Self {
            mode,
            title: None,
            initial_directory: None,
            file_name: String::new(),
            filter: String::new(),
            filter_index: 0,
            multiselect: false,
            check_file_exists: mode == DialogMode::OpenFile,
            overwrite_prompt: mode == DialogMode::SaveFile,
            default_ext: String::new(),
            metadata_batch: DEFAULT_BATCH,
        }
    }

    /// Options seeded from the user configuration
    pub fn from_config(mode: DialogMode, config: &DialogConfig) -> Self {
        let mut options = Self::new(mode)
            .filter(config.filter.clone())
            .filter_index(config.filter_index)
            .metadata_batch(config.metadata_batch);
        options.initial_directory = config.initial_directory.clone();
        options
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Start here when it exists; otherwise the working directory is used
    pub fn initial_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.initial_directory = Some(dir.into());
        self
    }

    /// Initial content of the file name field
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Filters in `"Label|*.a;*.b|Label2|*.c"` form
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// 1-based index of the initially selected filter; 0 selects the first
    pub fn filter_index(mut self, index: usize) -> Self {
        self.filter_index = index;
        self
    }

    pub fn multiselect(mut self, yes: bool) -> Self {
        self.multiselect = yes;
        self
    }

    pub fn check_file_exists(mut self, yes: bool) -> Self {
        self.check_file_exists = yes;
        self
    }

    pub fn overwrite_prompt(mut self, yes: bool) -> Self {
        self.overwrite_prompt = yes;
        self
    }

    /// Extension appended to names typed without one. A leading dot is dropped.
    pub fn default_ext(mut self, ext: &str) -> Self {
        self.default_ext = ext.strip_prefix('.').unwrap_or(ext).to_string();
        self
    }

    /// Number of entries stat'ed per backfill call
    pub fn metadata_batch(mut self, batch: usize) -> Self {
        self.metadata_batch = batch.max(1);
        self
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    pub fn title_text(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.mode.default_title())
    }

    /// Apply the flags each mode cannot support, whatever the caller set
    pub(crate) fn normalized(mut self) -> Self {
        match self.mode {
            DialogMode::OpenFile => {
                self.overwrite_prompt = false;
            }
            DialogMode::SaveFile => {
                self.multiselect = false;
                self.check_file_exists = false;
            }
            DialogMode::SelectFolder => {
                self.multiselect = false;
                self.check_file_exists = false;
                self.overwrite_prompt = false;
            }
        }
        self
    }
}
