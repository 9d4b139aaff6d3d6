//! Error types for normalization and key derivation

use thiserror::Error;

/// The error type for path normalization
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A `..` segment was found while traversal is disabled
    #[error("Path traversal detected: {path} - '..' segments are not allowed")]
    IllegalTraversal { path: String },

    /// The normalized path is longer than the configured limit
    #[error("Normalized path is {length} characters long, limit is {max}")]
    TooLong { length: usize, max: usize },

    /// The path is not in the form the normalizer would produce
    #[error("Path is not canonical: {path} (canonical form: {canonical})")]
    NotCanonical { path: String, canonical: String },
}

/// The error type for key hashing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The requested digest algorithm is not supported
    #[error("Unknown hash algorithm: {name}")]
    UnknownAlgorithm { name: String },
}

/// Result type for pathkey operations, defaulting to [`PathError`]
pub type Result<T, E = PathError> = std::result::Result<T, E>;
