//! Caller-owned memoization for normalization and key derivation
//!
//! A [`Memo`] maps the literal encoding of an input to a previously computed
//! result. It never evicts: it grows with the number of distinct inputs for as
//! long as the caller keeps it. Scope one to a request or a batch when inputs
//! are unbounded.

use crate::config::NormalizeOptions;
use crate::error::Result;
use crate::key::{key_string, KeyValue};
use crate::normalize::{normalize, PathInput};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;

/// Unbounded, thread-safe memo table keyed by input encoding
pub struct Memo<V> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V> Default for Memo<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> fmt::Debug for Memo<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo").field("len", &self.len()).finish()
    }
}

impl<V: Clone> Memo<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.lock().get(key).cloned()
    }

    /// Return the cached value for `key`, computing and storing it on a miss
    ///
    /// `compute` runs without the lock held. If two threads miss on the same
    /// key at once, both compute and the first stored value wins. Errors are
    /// returned to the caller and never stored.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: String,
        compute: impl FnOnce() -> std::result::Result<V, E>,
    ) -> std::result::Result<V, E> {
        if let Some(value) = self.get(&key) {
            log::trace!("memo hit: {}", key);
            return Ok(value);
        }
        log::trace!("memo miss: {}", key);

        let value = compute()?;
        Ok(self.entries.lock().entry(key).or_insert(value).clone())
    }

    pub fn get_or_insert_with(&self, key: String, compute: impl FnOnce() -> V) -> V {
        match self.get_or_try_insert_with(key, || Ok::<V, Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<V> Memo<V> {
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// [`normalize`] through a memo table
///
/// The memo key covers both the input and every option, so one table can be
/// shared across option sets.
///
/// # Examples
/// ```
/// use pathkey::{normalize_cached, Memo, NormalizeOptions};
///
/// let cache = Memo::new();
/// let options = NormalizeOptions::default();
/// assert_eq!(normalize_cached(&cache, "a//b", &options).unwrap(), "a/b");
/// assert_eq!(normalize_cached(&cache, "a//b", &options).unwrap(), "a/b");
/// assert_eq!(cache.len(), 1);
/// ```
pub fn normalize_cached<'a>(
    cache: &Memo<String>,
    input: impl Into<PathInput<'a>>,
    options: &NormalizeOptions,
) -> Result<String> {
    let input = input.into();
    let key = format!("path\u{1f}{:?}\u{1f}{:?}", input, options);
    cache.get_or_try_insert_with(key, move || normalize(input, options))
}

/// [`key_string`] through a memo table
pub fn key_string_cached(cache: &Memo<String>, values: &[KeyValue], separator: &str) -> String {
    let key = format!("key\u{1f}{:?}\u{1f}{:?}", values, separator);
    cache.get_or_insert_with(key, || key_string(values, separator))
}
