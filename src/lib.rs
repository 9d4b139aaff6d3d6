//! # pathkey
//!
//! Canonical path/URL normalization and deterministic cache-key derivation.
//!
//! The crate has two independent halves:
//!
//! - **Path normalization**: turn a string, a list of fragments or nothing at
//!   all into one canonical path string. Separators are unified, `.` segments
//!   are dropped, `..` segments are rejected or resolved, and the length is
//!   capped without ever truncating.
//! - **Key derivation**: turn a heterogeneous list of values into a
//!   deterministic key string, and that key string into a fixed-length hex
//!   digest.
//!
//! Both are pure functions. [`Memo`] adds optional caller-owned memoization.
//!
//! ## Examples
//!
//! ### Path Normalization
//!
//! ```rust
//! use pathkey::{normalize, normalize_path, NormalizeOptions, PathError};
//!
//! assert_eq!(normalize_path("a//b\\c", false, false, '/').unwrap(), "a/b/c");
//! assert_eq!(
//!     normalize_path(["./assets", "scripts", "", "example.js"], false, false, '/').unwrap(),
//!     "assets/scripts/example.js"
//! );
//!
//! // Traversal is rejected unless explicitly allowed
//! let strict = NormalizeOptions::default();
//! assert!(matches!(normalize("a/../b", &strict), Err(PathError::IllegalTraversal { .. })));
//!
//! let permissive = NormalizeOptions::default().with_traversal(true);
//! assert_eq!(normalize("a/b/../../c", &permissive).unwrap(), "c");
//! ```
//!
//! ### Key Derivation
//!
//! ```rust
//! use pathkey::{hash_key, key_string, key_values, KeyValue};
//!
//! let values = key_values![KeyValue::Null, "example", true, 42];
//! assert_eq!(key_string(&values, ":"), "NULL:example:true:42");
//!
//! let digest = hash_key(&values, "default-64bit").unwrap();
//! assert_eq!(digest.len(), 16);
//! assert!(hash_key(&values, "no-such-hash").is_err());
//! ```

mod config;
mod error;
mod hash;
mod key;
mod memo;
mod normalize;
mod path;
mod validate;

// Generators module for property testing (available in tests)
#[cfg(test)]
pub mod generators;

pub use config::{
    default_max_length, max_length_from_ceiling, HashMode, HashOptions, NormalizeOptions,
    FALLBACK_PATH_CEILING, MAX_PATH_ENV, PATH_LENGTH_MARGIN,
};
pub use error::{KeyError, PathError, Result};
pub use hash::{
    cache_key, digest, hash_key, hash_key_with, Algorithm, Blake3Width, DEFAULT_ALGORITHM,
};
pub use key::{
    key_string, KeyValue, ObjectId, Stringable, Tracked, DEFAULT_SEPARATOR, NULL_LITERAL,
};
pub use memo::{key_string_cached, normalize_cached, Memo};
pub use normalize::{join_and_normalize, normalize, normalize_path, normalize_url, PathInput};
pub use path::CanonicalPath;
pub use validate::{check_canonical, is_canonical};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
