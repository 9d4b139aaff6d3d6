//! Canonical-form checks
//!
//! A path is canonical for a set of options when normalizing it with those
//! options gives it back unchanged. These checks never rewrite their input.

use crate::config::NormalizeOptions;
use crate::error::{PathError, Result};
use crate::normalize::normalize;

/// Check whether `path` is already in canonical form
///
/// # Examples
/// ```
/// use pathkey::{is_canonical, NormalizeOptions};
///
/// let options = NormalizeOptions::default();
/// assert!(is_canonical("safe/path/file.txt", &options));
/// assert!(!is_canonical("safe//path", &options));
/// assert!(!is_canonical("../etc/passwd", &options));
/// ```
pub fn is_canonical(path: &str, options: &NormalizeOptions) -> bool {
    check_canonical(path, options).is_ok()
}

/// Validate that `path` is canonical, explaining why not
///
/// Normalization errors (traversal, length) are returned as they are; a path
/// that normalizes to something else yields [`PathError::NotCanonical`]
/// carrying the canonical form.
///
/// # Examples
/// ```
/// use pathkey::{check_canonical, NormalizeOptions, PathError};
///
/// let options = NormalizeOptions::default();
/// assert!(check_canonical("/srv/www", &options).is_ok());
/// assert_eq!(
///     check_canonical("a\\b", &options),
///     Err(PathError::NotCanonical { path: "a\\b".into(), canonical: "a/b".into() })
/// );
/// ```
pub fn check_canonical(path: &str, options: &NormalizeOptions) -> Result<()> {
    let canonical = normalize(path, options)?;
    if canonical == path {
        Ok(())
    } else {
        Err(PathError::NotCanonical {
            path: path.to_string(),
            canonical,
        })
    }
}
