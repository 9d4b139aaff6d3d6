//! Canonical path value object

use crate::config::NormalizeOptions;
use crate::error::Result;
use crate::key::Stringable;
use crate::normalize::{normalize, PathInput};
use crate::validate::check_canonical;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// A path known to be in canonical form for its options
///
/// Every constructor goes through the normalizer, so the invariants hold for
/// the lifetime of the value: one separator style, no doubled separators, no
/// `.` segments and a length within the limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPath {
    path: String,
    options: NormalizeOptions,
}

impl CanonicalPath {
    /// Normalize `input` into a canonical path
    ///
    /// # Examples
    /// ```
    /// use pathkey::{CanonicalPath, NormalizeOptions};
    ///
    /// let path = CanonicalPath::new("/srv//www\\index.html", &NormalizeOptions::default()).unwrap();
    /// assert_eq!(path.as_str(), "/srv/www/index.html");
    /// assert_eq!(path.file_name(), Some("index.html"));
    /// ```
    pub fn new<'a>(input: impl Into<PathInput<'a>>, options: &NormalizeOptions) -> Result<Self> {
        Ok(Self {
            path: normalize(input, options)?,
            options: options.clone(),
        })
    }

    /// Accept `path` only if it is already canonical
    pub fn parse(path: &str, options: &NormalizeOptions) -> Result<Self> {
        check_canonical(path, options)?;
        Ok(Self {
            path: path.to_string(),
            options: options.clone(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn into_string(self) -> String {
        self.path
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn separator(&self) -> char {
        self.options.separator
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn is_absolute(&self) -> bool {
        self.path.starts_with(self.separator())
    }

    /// Whether the path carries a leading `./`
    pub fn is_explicitly_relative(&self) -> bool {
        let mut chars = self.path.chars();
        chars.next() == Some('.') && chars.next() == Some(self.separator())
    }

    fn body(&self) -> &str {
        let separator = self.separator();
        let body = if self.is_explicitly_relative() {
            &self.path[1 + separator.len_utf8()..]
        } else {
            self.path.strip_prefix(separator).unwrap_or(&self.path)
        };
        body.strip_suffix(separator).unwrap_or(body)
    }

    /// Path segments, without anchors or trailing separator
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.body().split(self.separator()).filter(|s| !s.is_empty())
    }

    /// The last segment, unless it is an unresolved `..`
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last().filter(|s| *s != "..")
    }

    /// The path without its last segment
    ///
    /// `None` for paths with no segments or ending in `..`.
    ///
    /// # Examples
    /// ```
    /// use pathkey::{CanonicalPath, NormalizeOptions};
    ///
    /// let options = NormalizeOptions::default();
    /// let path = CanonicalPath::new("/a/b", &options).unwrap();
    /// assert_eq!(path.parent().unwrap().as_str(), "/a");
    /// assert_eq!(path.parent().unwrap().parent().unwrap().as_str(), "/");
    /// ```
    pub fn parent(&self) -> Option<Self> {
        self.file_name()?;
        let separator = self.separator();
        let trimmed = self.path.strip_suffix(separator).unwrap_or(&self.path);
        let head = match trimmed.rfind(separator) {
            Some(0) => &trimmed[..separator.len_utf8()],
            Some(idx) => &trimmed[..idx],
            None => "",
        };
        CanonicalPath::new(head, &self.options).ok()
    }

    /// Append `tail` and normalize the result with this path's options
    ///
    /// # Examples
    /// ```
    /// use pathkey::{CanonicalPath, NormalizeOptions};
    ///
    /// let options = NormalizeOptions::default();
    /// let base = CanonicalPath::new("./assets", &options).unwrap();
    /// assert_eq!(base.join("/js//app.js").unwrap().as_str(), "./assets/js/app.js");
    /// assert!(base.join("../secrets").is_err());
    /// ```
    pub fn join(&self, tail: &str) -> Result<Self> {
        if self.path.is_empty() {
            return CanonicalPath::new(tail, &self.options);
        }
        let joined = format!("{}{}{}", self.path, self.separator(), tail);
        CanonicalPath::new(joined, &self.options)
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl AsRef<Path> for CanonicalPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.path)
    }
}

impl From<CanonicalPath> for String {
    fn from(path: CanonicalPath) -> Self {
        path.path
    }
}

impl Serialize for CanonicalPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path)
    }
}

impl Stringable for CanonicalPath {
    fn canonical_string(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }
}
