//! Options for normalization and hashing
//!
//! Both option types are plain values with `with_*` builder methods. The only
//! environment input is the path-length ceiling read from
//! [`MAX_PATH_ENV`], resolved once per process.

use crate::hash::Algorithm;
use once_cell::sync::Lazy;

/// Environment variable holding the host path-length ceiling
pub const MAX_PATH_ENV: &str = "PATHKEY_MAX_PATH_LEN";

/// Ceiling used when the environment does not provide one
pub const FALLBACK_PATH_CEILING: usize = 4096;

/// Characters kept in reserve below the ceiling
pub const PATH_LENGTH_MARGIN: usize = 2;

static DEFAULT_MAX_LENGTH: Lazy<usize> =
    Lazy::new(|| max_length_from_ceiling(std::env::var(MAX_PATH_ENV).ok().as_deref()));

/// Default maximum length of a normalized path, in characters
///
/// Reads [`MAX_PATH_ENV`] the first time it is called and caches the result
/// for the rest of the process. Without an override this is `4096 - 2`.
pub fn default_max_length() -> usize {
    *DEFAULT_MAX_LENGTH
}

/// Derive a maximum length from a raw ceiling value
///
/// Missing, unparsable or too-small values fall back to
/// [`FALLBACK_PATH_CEILING`].
///
/// # Examples
/// ```
/// use pathkey::max_length_from_ceiling;
///
/// assert_eq!(max_length_from_ceiling(None), 4094);
/// assert_eq!(max_length_from_ceiling(Some("260")), 258);
/// assert_eq!(max_length_from_ceiling(Some("lots")), 4094);
/// ```
pub fn max_length_from_ceiling(raw: Option<&str>) -> usize {
    let ceiling = match raw.map(str::trim) {
        None => FALLBACK_PATH_CEILING,
        Some(value) => match value.parse::<usize>() {
            Ok(ceiling) if ceiling > PATH_LENGTH_MARGIN => ceiling,
            _ => {
                log::warn!(
                    "ignoring {}={:?}: expected an integer above {}",
                    MAX_PATH_ENV,
                    value,
                    PATH_LENGTH_MARGIN
                );
                FALLBACK_PATH_CEILING
            }
        },
    };
    ceiling - PATH_LENGTH_MARGIN
}

/// Options controlling [`normalize`](crate::normalize)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizeOptions {
    /// Separator used in the output; `/` and `\` in the input are both mapped to it
    pub separator: char,
    /// Resolve `..` segments instead of rejecting them
    pub allow_traversal: bool,
    /// Append exactly one separator to non-empty results
    pub trailing_separator: bool,
    /// Hard cap on the output length in characters; `0` means [`default_max_length`]
    pub max_length: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            separator: '/',
            allow_traversal: false,
            trailing_separator: false,
            max_length: 0,
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_traversal(mut self, allow: bool) -> Self {
        self.allow_traversal = allow;
        self
    }

    pub fn with_trailing_separator(mut self, trailing: bool) -> Self {
        self.trailing_separator = trailing;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// The limit actually enforced, resolving `0` to the environment default
    pub fn effective_max_length(&self) -> usize {
        if self.max_length == 0 {
            default_max_length()
        } else {
            self.max_length
        }
    }
}

/// What bytes [`hash_key_with`](crate::hash_key_with) feeds to the digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashMode {
    /// Hash the key string of the values
    #[default]
    KeyString,
    /// Hash a JSON encoding of the raw values
    Encode,
}

/// Options controlling [`hash_key_with`](crate::hash_key_with) and [`cache_key`](crate::cache_key)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashOptions {
    pub algorithm: Algorithm,
    pub mode: HashMode,
    /// Separator for the key string (and for the prefix of a cache key)
    pub separator: String,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            mode: HashMode::KeyString,
            separator: crate::key::DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl HashOptions {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: HashMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_length_from_ceiling() {
        assert_eq!(max_length_from_ceiling(None), 4094);
        assert_eq!(max_length_from_ceiling(Some("1024")), 1022);
        assert_eq!(max_length_from_ceiling(Some(" 512 ")), 510);

        // Rejected overrides fall back to the portable ceiling
        assert_eq!(max_length_from_ceiling(Some("")), 4094);
        assert_eq!(max_length_from_ceiling(Some("-1")), 4094);
        assert_eq!(max_length_from_ceiling(Some("2")), 4094);
        assert_eq!(max_length_from_ceiling(Some("abc")), 4094);
    }

    #[test]
    fn test_effective_max_length() {
        let options = NormalizeOptions::new().with_max_length(10);
        assert_eq!(options.effective_max_length(), 10);

        let options = NormalizeOptions::new();
        assert_eq!(options.effective_max_length(), default_max_length());
        assert!(default_max_length() > 0);
    }

    #[test]
    fn test_normalize_options_builder() {
        let options = NormalizeOptions::new()
            .with_separator('\\')
            .with_traversal(true)
            .with_trailing_separator(true)
            .with_max_length(64);

        assert_eq!(options.separator, '\\');
        assert!(options.allow_traversal);
        assert!(options.trailing_separator);
        assert_eq!(options.max_length, 64);
    }

    #[test]
    fn test_hash_options_defaults() {
        let options = HashOptions::default();
        assert_eq!(options.algorithm.to_string(), "blake3-64");
        assert_eq!(options.mode, HashMode::KeyString);
        assert_eq!(options.separator, ":");
    }
}
