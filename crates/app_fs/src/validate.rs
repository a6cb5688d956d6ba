//! Path validation for names typed into the picker

use once_cell::sync::Lazy;
use regex::Regex;

/// Reserved characters, besides control characters. The double quote is not
/// here: the filename tokenizer owns quoting.
const FORBIDDEN_CHARS: &[char] = &['<', '>', '|'];

const WILDCARDS: &[char] = &['*', '?'];

/// Windows reserved device names, as a whole path segment followed by the end
/// of the string, a separator, a dot or a tab
static RESERVED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^|[\\/])(CON|PRN|AUX|NUL|CLOCK\$|COM[0-9]|LPT[0-9])([.\\/\t]|$)")
        .expect("reserved name pattern is valid")
});

/// Check a candidate path typed by the user.
///
/// With `allow_wildcards == false`, `*` and `?` are rejected as well.
/// The empty string is always valid.
pub fn is_valid_path(candidate: &str, allow_wildcards: bool) -> bool {
    if candidate.is_empty() {
        return true;
    }

    if first_invalid_char(candidate, allow_wildcards).is_some() {
        return false;
    }

    !RESERVED_NAME.is_match(candidate)
}

/// First character of `candidate` that may not appear in a path
pub fn first_invalid_char(candidate: &str, allow_wildcards: bool) -> Option<char> {
    candidate.chars().find(|&c| {
        c.is_ascii_control()
            || FORBIDDEN_CHARS.contains(&c)
            || (!allow_wildcards && WILDCARDS.contains(&c))
    })
}
