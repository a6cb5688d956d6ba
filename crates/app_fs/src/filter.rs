//! File filters: the "Label|*.a;*.b|Label2|*.c" string format and the active
//! filter choice

use crate::{GlobPattern, Result};

/// One predefined filter: a display label and its glob patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub label: String,
    pub patterns: Vec<String>,
}

impl FileFilter {
    /// Build from a label and a semicolon-joined pattern list
    pub fn new(label: impl Into<String>, patterns: &str) -> Self {
        Self {
            label: label.into(),
            patterns: patterns.split(';').map(str::to_string).collect(),
        }
    }

    /// Used when the caller configured no filters at all
    pub fn all_files() -> Self {
        Self::new("All files", "*")
    }

    /// The semicolon-joined pattern list
    pub fn pattern_string(&self) -> String {
        self.patterns.join(";")
    }
}

/// Parse `"Label1|p1;p2|Label2|p3"` into filters, in order.
///
/// Segments are consumed pairwise; an unpaired trailing segment is ignored.
pub fn parse_filter_string(filter: &str) -> Vec<FileFilter> {
    let segments: Vec<&str> = filter.split('|').collect();
    segments
        .chunks_exact(2)
        .map(|pair| FileFilter::new(pair[0], pair[1]))
        .collect()
}

/// Inverse of [`parse_filter_string`]
pub fn format_filter_string(filters: &[FileFilter]) -> String {
    filters
        .iter()
        .map(|f| format!("{}|{}", f.label, f.pattern_string()))
        .collect::<Vec<_>>()
        .join("|")
}

/// The file-matching rule a listing is built with.
///
/// A predefined filter and a custom glob are mutually exclusive; switching to
/// one discards the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    Predefined(FileFilter),
    Custom(String),
}

impl FilterSpec {
    /// Compile to the glob list used for enumeration, in enumeration order
    pub fn compile(&self) -> Result<Vec<GlobPattern>> {
        match self {
            FilterSpec::Custom(text) => Ok(vec![GlobPattern::custom(text)?]),
            FilterSpec::Predefined(filter) => filter
                .patterns
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(GlobPattern::new)
                .collect(),
        }
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec::Predefined(FileFilter::all_files())
    }
}
