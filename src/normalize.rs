//! Path and URL normalization
//!
//! Every entry point funnels into [`normalize`], which maps a [`PathInput`]
//! onto its canonical string form:
//! - `/` and `\` are interchangeable on input and become the target separator
//! - runs of separators collapse into one
//! - `.` segments and empty segments disappear
//! - `..` segments are either rejected or resolved, never both
//! - a leading separator (absolute) or leading `./` (explicitly relative) survives
//! - the result never exceeds the configured length, and is never truncated

use crate::config::NormalizeOptions;
use crate::error::{PathError, Result};
use std::borrow::Cow;

/// An un-normalized path expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathInput<'a> {
    /// No path at all; normalizes to the empty string
    Null,
    /// A single path string
    Text(Cow<'a, str>),
    /// Path fragments joined with the target separator before normalizing
    Segments(Vec<Option<Cow<'a, str>>>),
}

impl<'a> From<&'a str> for PathInput<'a> {
    fn from(path: &'a str) -> Self {
        PathInput::Text(Cow::Borrowed(path))
    }
}

impl<'a> From<&'a String> for PathInput<'a> {
    fn from(path: &'a String) -> Self {
        PathInput::Text(Cow::Borrowed(path.as_str()))
    }
}

impl From<String> for PathInput<'_> {
    fn from(path: String) -> Self {
        PathInput::Text(Cow::Owned(path))
    }
}

impl<'a> From<Option<&'a str>> for PathInput<'a> {
    fn from(path: Option<&'a str>) -> Self {
        path.map_or(PathInput::Null, PathInput::from)
    }
}

impl<'a> From<&[&'a str]> for PathInput<'a> {
    fn from(parts: &[&'a str]) -> Self {
        PathInput::Segments(parts.iter().map(|p| Some(Cow::Borrowed(*p))).collect())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for PathInput<'a> {
    fn from(parts: [&'a str; N]) -> Self {
        PathInput::from(&parts[..])
    }
}

impl<'a> From<Vec<&'a str>> for PathInput<'a> {
    fn from(parts: Vec<&'a str>) -> Self {
        PathInput::from(parts.as_slice())
    }
}

impl<'a> From<Vec<Option<&'a str>>> for PathInput<'a> {
    fn from(parts: Vec<Option<&'a str>>) -> Self {
        PathInput::Segments(parts.into_iter().map(|p| p.map(Cow::Borrowed)).collect())
    }
}

impl From<Vec<String>> for PathInput<'_> {
    fn from(parts: Vec<String>) -> Self {
        PathInput::Segments(parts.into_iter().map(|p| Some(Cow::Owned(p))).collect())
    }
}

/// Where a path is anchored, remembered across segment processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Unanchored,
    Root,
    Current,
}

fn is_padding(c: char) -> bool {
    c.is_whitespace() || c == '\0'
}

/// Rewrite both separator styles to `separator` and drop null bytes
fn unify_separators(path: &str, separator: char) -> String {
    path.chars()
        .filter(|&c| c != '\0')
        .map(|c| if c == '/' || c == '\\' { separator } else { c })
        .collect()
}

fn join_fragments(parts: &[Option<Cow<'_, str>>], separator: char) -> String {
    let mut joined = String::new();
    for part in parts.iter().flatten() {
        if part.trim_matches(is_padding).is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(separator);
        }
        joined.push_str(part);
    }
    joined
}

/// Normalize a path according to `options`
///
/// Sequence inputs are joined first; their leading `./` is treated as plain
/// relative and dropped, while a string input keeps it. Empty, null and
/// all-separator inputs are not errors: they produce `""` (or the root
/// separator for an input made only of a leading separator).
///
/// # Errors
/// - [`PathError::IllegalTraversal`] for any `..` segment when traversal is off
/// - [`PathError::TooLong`] when the result exceeds the effective max length
///
/// # Examples
/// ```
/// use pathkey::{normalize, NormalizeOptions};
///
/// let options = NormalizeOptions::default();
/// assert_eq!(normalize("a//b\\c", &options).unwrap(), "a/b/c");
/// assert_eq!(normalize("/a/./b/", &options).unwrap(), "/a/b");
/// assert_eq!(normalize(["./assets", "scripts", "", "example.js"], &options).unwrap(),
///            "assets/scripts/example.js");
/// assert!(normalize("a/../b", &options).is_err());
///
/// let options = NormalizeOptions::default().with_traversal(true);
/// assert_eq!(normalize("a/b/../c", &options).unwrap(), "a/c");
/// ```
pub fn normalize<'a>(input: impl Into<PathInput<'a>>, options: &NormalizeOptions) -> Result<String> {
    let separator = options.separator;
    let input = input.into();

    let (raw, from_fragments) = match &input {
        PathInput::Null => return Ok(String::new()),
        PathInput::Text(text) => (Cow::Borrowed(&**text), false),
        PathInput::Segments(parts) => (Cow::Owned(join_fragments(parts, separator)), true),
    };

    let unified = unify_separators(raw.trim_matches(is_padding), separator);
    if unified.is_empty() {
        return Ok(String::new());
    }

    let (anchor, body) = if let Some(rest) = unified.strip_prefix(separator) {
        (Anchor::Root, rest)
    } else if let Some(rest) = unified
        .strip_prefix('.')
        .and_then(|rest| rest.strip_prefix(separator))
    {
        let anchor = if from_fragments {
            Anchor::Unanchored
        } else {
            Anchor::Current
        };
        (anchor, rest)
    } else {
        (Anchor::Unanchored, unified.as_str())
    };

    let mut stack: Vec<&str> = Vec::new();
    for segment in body.split(separator) {
        let segment = segment.trim_matches(is_padding);
        match segment {
            "" | "." => {}
            ".." => {
                if !options.allow_traversal {
                    return Err(PathError::IllegalTraversal {
                        path: raw.into_owned(),
                    });
                }
                match stack.last() {
                    Some(&top) if top != ".." => {
                        stack.pop();
                    }
                    _ => stack.push(".."),
                }
            }
            _ => stack.push(segment),
        }
    }

    let mut normalized = String::with_capacity(unified.len() + 2);
    match anchor {
        Anchor::Root => normalized.push(separator),
        Anchor::Current if !stack.is_empty() => {
            normalized.push('.');
            normalized.push(separator);
        }
        _ => {}
    }
    for (i, segment) in stack.iter().enumerate() {
        if i > 0 {
            normalized.push(separator);
        }
        normalized.push_str(segment);
    }

    if options.trailing_separator && !normalized.is_empty() && !normalized.ends_with(separator) {
        normalized.push(separator);
    }

    let length = normalized.chars().count();
    let max = options.effective_max_length();
    if length > max {
        return Err(PathError::TooLong { length, max });
    }

    Ok(normalized)
}

/// Normalize a path with positional options
///
/// Convenience form of [`normalize`] using the default max length.
///
/// # Examples
/// ```
/// use pathkey::normalize_path;
///
/// assert_eq!(normalize_path("a/b/../../c", true, false, '/').unwrap(), "c");
/// assert_eq!(normalize_path("a\\b", false, true, '/').unwrap(), "a/b/");
/// assert_eq!(normalize_path(None::<&str>, false, false, '/').unwrap(), "");
/// ```
pub fn normalize_path<'a>(
    input: impl Into<PathInput<'a>>,
    allow_traversal: bool,
    trailing_separator: bool,
    separator: char,
) -> Result<String> {
    let options = NormalizeOptions::new()
        .with_separator(separator)
        .with_traversal(allow_traversal)
        .with_trailing_separator(trailing_separator);
    normalize(input, &options)
}

/// Join two path fragments and normalize the result
///
/// The tail's leading separator does not re-root the result; only an absolute
/// `base` (or an absolute `tail` with an empty `base`) produces an absolute path.
///
/// # Examples
/// ```
/// use pathkey::{join_and_normalize, NormalizeOptions};
///
/// let options = NormalizeOptions::default();
/// assert_eq!(join_and_normalize("source/", "/main.rs", &options).unwrap(), "source/main.rs");
/// assert_eq!(join_and_normalize("/srv", "www", &options).unwrap(), "/srv/www");
/// ```
pub fn join_and_normalize(base: &str, tail: &str, options: &NormalizeOptions) -> Result<String> {
    normalize([base, tail], options)
}

/// Split `scheme://authority` or `//authority` off the front of a URL
fn split_authority(url: &str) -> (Option<String>, &str) {
    let (scheme, after_scheme) = match url.find("://") {
        Some(idx) if is_scheme(&url[..idx]) => (Some(&url[..idx]), &url[idx + 3..]),
        _ => match url.strip_prefix("//") {
            Some(rest) => (None, rest),
            None => return (None, url),
        },
    };

    let end = after_scheme
        .find(['/', '\\', '?', '#'])
        .unwrap_or(after_scheme.len());
    let (authority, rest) = after_scheme.split_at(end);

    let prefix = match scheme {
        Some(scheme) => format!("{}://{}", scheme.to_ascii_lowercase(), authority),
        None => format!("//{}", authority),
    };
    (Some(prefix), rest)
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Normalize the path part of a URL
///
/// The scheme (lowercased) and authority are kept, as are any query string and
/// fragment. The path is normalized with `/` regardless of
/// `options.separator`. Traversal rules apply to the path and the length limit
/// applies to the whole URL.
///
/// # Examples
/// ```
/// use pathkey::{normalize_url, NormalizeOptions};
///
/// let options = NormalizeOptions::default().with_traversal(true);
/// assert_eq!(
///     normalize_url("HTTPS://example.com//assets/./js/../app.js?v=1", &options).unwrap(),
///     "https://example.com/assets/app.js?v=1"
/// );
/// ```
pub fn normalize_url(url: &str, options: &NormalizeOptions) -> Result<String> {
    let url = url.trim_matches(is_padding);
    let (prefix, rest) = split_authority(url);
    let (path, suffix) = match rest.find(['?', '#']) {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let path_options = options
        .clone()
        .with_separator('/')
        .with_max_length(usize::MAX);
    let mut normalized_path = normalize(path, &path_options)?;

    let mut normalized = String::with_capacity(url.len());
    if let Some(prefix) = prefix {
        normalized.push_str(&prefix);
        if normalized_path.is_empty() {
            if options.trailing_separator {
                normalized_path.push('/');
            }
        } else if !normalized_path.starts_with('/') {
            normalized.push('/');
        }
    }
    normalized.push_str(&normalized_path);
    normalized.push_str(suffix);

    let length = normalized.chars().count();
    let max = options.effective_max_length();
    if length > max {
        return Err(PathError::TooLong { length, max });
    }

    Ok(normalized)
}
