//! File name field parsing
//!
//! The file name box accepts either one unquoted name (spaces allowed) or a
//! list of quoted names for multi-selection:
//!
//! ```text
//! abc.txt                      => ["abc.txt"]
//! "abc.txt" "def.txt"          => ["abc.txt", "def.txt"]
//! "abc.txt" def.txt "efg.txt"  => ["abc.txt", "def.txt", "efg.txt"]
//! "abc.txt" d"e f.txt"         => ["abc.txt", "d", "e f.txt"]
//! abc.txt "def.txt"            => error (text before the first quote)
//! "*.txt" "def.txt"            => error (wildcard inside quotes)
//! ""                           => [""]
//! ```

use app_fs::is_valid_path;
use thiserror::Error;

const QUOTE: char = '"';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected text before the first quote")]
    LeadingText,

    #[error("invalid file name \"{0}\"")]
    InvalidName(String),
}

/// Split the file name field into candidate names.
///
/// Quoted names are taken literally and must be valid paths without
/// wildcards. Bare words between quoted names become names of their own and
/// are not checked here. An unterminated final quote takes the rest of the
/// line.
pub fn tokenize(text: &str) -> Result<Vec<String>, ParseError> {
    let Some(first_quote) = text.find(QUOTE) else {
        return Ok(vec![text.trim().to_string()]);
    };

    if !text[..first_quote].trim().is_empty() {
        return Err(ParseError::LeadingText);
    }

    let mut names = Vec::new();
    let mut rest = &text[first_quote..];

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(quoted) = rest.strip_prefix(QUOTE) {
            match quoted.find(QUOTE) {
                Some(end) => {
                    let name = &quoted[..end];
                    if !is_valid_path(name, false) {
                        return Err(ParseError::InvalidName(name.to_string()));
                    }
                    names.push(name.to_string());
                    rest = &quoted[end + QUOTE.len_utf8()..];
                }
                None => {
                    names.push(quoted.trim_end().to_string());
                    break;
                }
            }
        } else {
            // Bare word: runs to whitespace or a quote; a quote right after
            // it opens the next quoted name.
            let end = rest
                .find(|c: char| c.is_whitespace() || c == QUOTE)
                .unwrap_or(rest.len());
            names.push(rest[..end].to_string());
            rest = &rest[end..];
        }
    }

    Ok(names)
}

/// Render selected names back into the field: one name bare, several quoted
pub fn quote_names<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [single] => single.as_ref().to_string(),
        many => many
            .iter()
            .map(|n| format!("{QUOTE}{}{QUOTE}", n.as_ref()))
            .collect::<Vec<_>>()
            .join(" "),
    }
}
