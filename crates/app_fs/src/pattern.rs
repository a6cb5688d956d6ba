//! Glob patterns for file filters
//!
//! Matching follows the shell-dialog conventions users expect from
//! "*.png;*.jpg" style filters: case-insensitive, whole-name, `*.*` matches
//! everything, and a trailing `.` means "no extension".

use crate::{FsError, Result};
use regex::{Regex, RegexBuilder};
use std::path::Path;

/// A compiled file-name glob (`*` and `?`)
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
    /// Pattern ended in `.`: only names without an extension match
    extensionless: bool,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim();
        let (body, extensionless) = match trimmed.strip_suffix('.') {
            Some(stem) if !stem.is_empty() => (stem, true),
            _ => (trimmed, false),
        };

        // "*.*" historically means "every file", with or without a dot
        let body = if body == "*.*" { "*" } else { body };

        let regex = RegexBuilder::new(&glob_to_regex(body))
            .case_insensitive(true)
            .build()
            .map_err(|e| FsError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            extensionless,
        })
    }

    /// Build the pattern for a user-typed custom filter.
    ///
    /// A `*` is appended unless the text already ends in `.`, so typing a
    /// prefix such as `img` lists every file starting with it.
    pub fn custom(text: &str) -> Result<Self> {
        if text.ends_with('.') {
            Self::new(text)
        } else {
            Self::new(&format!("{text}*"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a bare file name
    pub fn matches(&self, name: &str) -> bool {
        if self.extensionless && Path::new(name).extension().is_some() {
            return false;
        }
        self.regex.is_match(name)
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
    }
    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_extension() {
        let p = GlobPattern::new("*.png").unwrap();
        assert!(p.matches("a.png"));
        assert!(p.matches("A.PNG"));
        assert!(!p.matches("a.png.bak"));
        assert!(!p.matches("apng"));
    }

    #[test]
    fn test_question_mark() {
        let p = GlobPattern::new("img?.jpg").unwrap();
        assert!(p.matches("img1.jpg"));
        assert!(!p.matches("img10.jpg"));
    }

    #[test]
    fn test_match_all() {
        for src in ["*", "*.*"] {
            let p = GlobPattern::new(src).unwrap();
            assert!(p.matches("README"));
            assert!(p.matches("a.b.c"));
        }
    }

    #[test]
    fn test_regex_metachars_are_literal() {
        let p = GlobPattern::new("a+(1).txt").unwrap();
        assert!(p.matches("a+(1).txt"));
        assert!(!p.matches("aa(1).txt"));
    }

    #[test]
    fn test_custom_prefix() {
        let p = GlobPattern::custom("rep").unwrap();
        assert_eq!(p.as_str(), "rep*");
        assert!(p.matches("report.txt"));
        assert!(!p.matches("draft.txt"));

        let p = GlobPattern::custom("*.tx").unwrap();
        assert!(p.matches("notes.txt"));
    }

    #[test]
    fn test_trailing_dot_means_no_extension() {
        let p = GlobPattern::custom("*.").unwrap();
        assert_eq!(p.as_str(), "*.");
        assert!(p.matches("Makefile"));
        assert!(!p.matches("main.rs"));
    }
}
