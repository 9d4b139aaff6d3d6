//! Fixed-length digests of key strings
//!
//! Digests are cache keys, not security tokens: they are deterministic and
//! fixed-length per algorithm, and collisions are tolerated.

use crate::config::{HashMode, HashOptions};
use crate::error::{KeyError, Result};
use crate::key::{encode_values, key_string, KeyValue};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Name accepted for the default algorithm
pub const DEFAULT_ALGORITHM: &str = "default-64bit";

/// A supported digest algorithm
///
/// | name | hex length |
/// |---|---|
/// | `default-64bit`, `blake3-64` | 16 |
/// | `blake3-128` | 32 |
/// | `blake3`, `blake3-256` | 64 |
/// | `blake3-512` | 128 |
/// | `crc32` | 8 |
/// | `sha256` | 64 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// BLAKE3 extended output truncated to one of the supported widths
    Blake3(Blake3Width),
    /// CRC-32 (IEEE)
    Crc32,
    /// SHA-256
    Sha256,
}

/// Output width of a truncated BLAKE3 digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Blake3Width {
    #[default]
    Bits64,
    Bits128,
    Bits256,
    Bits512,
}

impl Blake3Width {
    pub const ALL: [Blake3Width; 4] = [
        Blake3Width::Bits64,
        Blake3Width::Bits128,
        Blake3Width::Bits256,
        Blake3Width::Bits512,
    ];

    pub fn bytes(self) -> usize {
        match self {
            Blake3Width::Bits64 => 8,
            Blake3Width::Bits128 => 16,
            Blake3Width::Bits256 => 32,
            Blake3Width::Bits512 => 64,
        }
    }

    pub fn bits(self) -> usize {
        self.bytes() * 8
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Blake3(Blake3Width::Bits64)
    }
}

impl Algorithm {
    /// Every supported algorithm
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Blake3(Blake3Width::Bits64),
        Algorithm::Blake3(Blake3Width::Bits128),
        Algorithm::Blake3(Blake3Width::Bits256),
        Algorithm::Blake3(Blake3Width::Bits512),
        Algorithm::Crc32,
        Algorithm::Sha256,
    ];

    /// Length of this algorithm's hex digest
    pub fn hex_len(self) -> usize {
        match self {
            Algorithm::Blake3(width) => width.bytes() * 2,
            Algorithm::Crc32 => 8,
            Algorithm::Sha256 => 64,
        }
    }
}

impl FromStr for Algorithm {
    type Err = KeyError;

    fn from_str(name: &str) -> Result<Self, KeyError> {
        let algorithm = match name.trim().to_ascii_lowercase().as_str() {
            DEFAULT_ALGORITHM | "blake3-64" => Algorithm::Blake3(Blake3Width::Bits64),
            "blake3-128" => Algorithm::Blake3(Blake3Width::Bits128),
            "blake3" | "blake3-256" => Algorithm::Blake3(Blake3Width::Bits256),
            "blake3-512" => Algorithm::Blake3(Blake3Width::Bits512),
            "crc32" => Algorithm::Crc32,
            "sha256" => Algorithm::Sha256,
            _ => {
                return Err(KeyError::UnknownAlgorithm {
                    name: name.to_string(),
                })
            }
        };
        Ok(algorithm)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Blake3(width) => write!(f, "blake3-{}", width.bits()),
            Algorithm::Crc32 => f.write_str("crc32"),
            Algorithm::Sha256 => f.write_str("sha256"),
        }
    }
}

/// Lowercase hex digest of `bytes`
///
/// # Examples
/// ```
/// use pathkey::{digest, Algorithm};
///
/// assert_eq!(digest(b"", Algorithm::Crc32), "00000000");
/// assert_eq!(digest(b"anything", Algorithm::default()).len(), 16);
/// ```
pub fn digest(bytes: &[u8], algorithm: Algorithm) -> String {
    match algorithm {
        Algorithm::Blake3(width) => {
            let mut hasher = blake3::Hasher::new();
            hasher.update(bytes);
            let mut out = [0u8; 64];
            let out = &mut out[..width.bytes()];
            hasher.finalize_xof().fill(out);
            hex::encode(out)
        }
        Algorithm::Crc32 => format!("{:08x}", crc32fast::hash(bytes)),
        Algorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
    }
}

/// Hash `values` with the algorithm named `algorithm`
///
/// # Errors
/// [`KeyError::UnknownAlgorithm`] if `algorithm` is not a supported name.
///
/// # Examples
/// ```
/// use pathkey::{hash_key, key_values};
///
/// let digest = hash_key(&key_values!["user", 42], "default-64bit").unwrap();
/// assert_eq!(digest.len(), 16);
/// assert!(hash_key(&key_values!["user"], "md4").is_err());
/// ```
pub fn hash_key(values: &[KeyValue], algorithm: &str) -> Result<String, KeyError> {
    let algorithm = algorithm.parse::<Algorithm>()?;
    Ok(hash_key_with(values, &HashOptions::new(algorithm)))
}

/// Hash `values` according to `options`
pub fn hash_key_with(values: &[KeyValue], options: &HashOptions) -> String {
    let input = match options.mode {
        HashMode::KeyString => key_string(values, &options.separator),
        HashMode::Encode => encode_values(values),
    };
    digest(input.as_bytes(), options.algorithm)
}

/// Namespaced cache key: `<prefix><separator><digest>`
///
/// The prefix is trimmed the same way a key string is; an empty prefix yields
/// the bare digest.
///
/// # Examples
/// ```
/// use pathkey::{cache_key, key_values, HashOptions};
///
/// let key = cache_key("templates", &key_values!["index.html", 3], &HashOptions::default());
/// assert!(key.starts_with("templates:"));
/// assert_eq!(key.len(), "templates:".len() + 16);
/// ```
pub fn cache_key(prefix: &str, values: &[KeyValue], options: &HashOptions) -> String {
    let digest = hash_key_with(values, options);
    let prefix =
        prefix.trim_matches(|c: char| c.is_ascii_whitespace() || options.separator.contains(c));
    if prefix.is_empty() {
        digest
    } else {
        format!("{}{}{}", prefix, options.separator, digest)
    }
}
