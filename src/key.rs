//! Deterministic key strings from heterogeneous values
//!
//! A key string is each value's textual form joined with a separator. Nested
//! sequences contribute a fixed-length digest instead of their contents, so
//! the key length does not grow with the size of nested collections.

use crate::hash::{digest, Algorithm};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Separator used when none is given
pub const DEFAULT_SEPARATOR: &str = ":";

/// Key form of [`KeyValue::Null`]
pub const NULL_LITERAL: &str = "NULL";

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-local identity of a [`Tracked`] value
///
/// Ids come from a monotonic counter and are never reused within a process.
/// They mean nothing in another process, so keys built from them must not be
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Take the next id from the process-wide counter
    pub fn next() -> Self {
        ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value stamped with an [`ObjectId`] when it is created
///
/// Use this for values that have no canonical string form but still need to
/// take part in in-process cache keys. Cloning creates a new object with a
/// new id.
#[derive(Debug)]
pub struct Tracked<T> {
    id: ObjectId,
    value: T,
}

impl<T> Tracked<T> {
    pub fn new(value: T) -> Self {
        Self {
            id: ObjectId::next(),
            value,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// The key form of this object: its type name plus its id
    pub fn key_value(&self) -> KeyValue {
        KeyValue::Object {
            type_name: std::any::type_name::<T>(),
            id: self.id,
        }
    }
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        Tracked::new(self.value.clone())
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Types with a canonical string form usable in keys
pub trait Stringable {
    fn canonical_string(&self) -> Cow<'_, str>;
}

impl Stringable for Path {
    fn canonical_string(&self) -> Cow<'_, str> {
        self.to_string_lossy()
    }
}

/// One input to key derivation
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    /// The canonical string of a [`Stringable`] value
    Stringable(String),
    /// Keyed by a digest of its elements
    Seq(Vec<KeyValue>),
    /// An object without a canonical string, keyed by identity
    Object { type_name: &'static str, id: ObjectId },
    /// Structured data with no per-value rule; forces the JSON fallback
    Structured(Value),
}

impl KeyValue {
    /// Capture the canonical string of `value`
    pub fn stringable<S: Stringable + ?Sized>(value: &S) -> Self {
        KeyValue::Stringable(value.canonical_string().into_owned())
    }

    /// The text this value contributes to a key string
    ///
    /// # Examples
    /// ```
    /// use pathkey::KeyValue;
    ///
    /// assert_eq!(KeyValue::Null.key_part(), "NULL");
    /// assert_eq!(KeyValue::Bool(false).key_part(), "false");
    /// assert_eq!(KeyValue::Float(2.5).key_part(), "2.5");
    /// assert_eq!(KeyValue::Seq(vec![1.into(), 2.into()]).key_part().len(), 16);
    /// ```
    pub fn key_part(&self) -> Cow<'_, str> {
        match self {
            KeyValue::Null => Cow::Borrowed(NULL_LITERAL),
            KeyValue::Bool(true) => Cow::Borrowed("true"),
            KeyValue::Bool(false) => Cow::Borrowed("false"),
            KeyValue::Int(n) => Cow::Owned(n.to_string()),
            KeyValue::UInt(n) => Cow::Owned(n.to_string()),
            KeyValue::Float(n) => Cow::Owned(n.to_string()),
            KeyValue::Text(s) | KeyValue::Stringable(s) => Cow::Borrowed(s.as_str()),
            KeyValue::Seq(items) => {
                let nested = key_string(items, DEFAULT_SEPARATOR);
                Cow::Owned(digest(nested.as_bytes(), Algorithm::default()))
            }
            KeyValue::Object { type_name, id } => Cow::Owned(format!("{}#{}", type_name, id)),
            KeyValue::Structured(value) => {
                Cow::Owned(digest(value.to_string().as_bytes(), Algorithm::default()))
            }
        }
    }

    /// JSON form of the raw value, used by the encode fallback
    pub fn to_json(&self) -> Value {
        match self {
            KeyValue::Null => Value::Null,
            KeyValue::Bool(b) => Value::Bool(*b),
            KeyValue::Int(n) => Value::from(*n),
            KeyValue::UInt(n) => Value::from(*n),
            KeyValue::Float(n) => Value::from(*n),
            KeyValue::Text(s) | KeyValue::Stringable(s) => Value::String(s.clone()),
            KeyValue::Seq(items) => Value::Array(items.iter().map(KeyValue::to_json).collect()),
            KeyValue::Object { type_name, id } => Value::String(format!("{}#{}", type_name, id)),
            KeyValue::Structured(value) => value.clone(),
        }
    }

    fn needs_fallback(&self) -> bool {
        matches!(self, KeyValue::Structured(_))
    }
}

impl Serialize for KeyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

macro_rules! key_value_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for KeyValue {
                fn from(value: $source) -> Self {
                    KeyValue::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

key_value_from!(Int as i64: i8, i16, i32, i64, u8, u16, u32);
key_value_from!(UInt as u64: u64);
key_value_from!(Float as f64: f64);

impl From<f32> for KeyValue {
    /// Keeps the shortest `f32` rendering (`0.1f32` keys as `0.1`)
    fn from(value: f32) -> Self {
        let widened = value.to_string().parse().unwrap_or_else(|_| f64::from(value));
        KeyValue::Float(widened)
    }
}

impl From<bool> for KeyValue {
    fn from(value: bool) -> Self {
        KeyValue::Bool(value)
    }
}

impl From<isize> for KeyValue {
    fn from(value: isize) -> Self {
        KeyValue::Int(value as i64)
    }
}

impl From<usize> for KeyValue {
    fn from(value: usize) -> Self {
        KeyValue::UInt(value as u64)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::Text(value.to_string())
    }
}

impl From<&String> for KeyValue {
    fn from(value: &String) -> Self {
        KeyValue::Text(value.clone())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        KeyValue::Text(value)
    }
}

impl<T: Into<KeyValue>> From<Option<T>> for KeyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(KeyValue::Null, Into::into)
    }
}

impl<T: Into<KeyValue>> From<Vec<T>> for KeyValue {
    fn from(values: Vec<T>) -> Self {
        KeyValue::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl<T> From<&Tracked<T>> for KeyValue {
    fn from(value: &Tracked<T>) -> Self {
        value.key_value()
    }
}

impl From<Value> for KeyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => KeyValue::Null,
            Value::Bool(b) => KeyValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    KeyValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    KeyValue::UInt(u)
                } else if let Some(f) = n.as_f64() {
                    KeyValue::Float(f)
                } else {
                    KeyValue::Structured(Value::Number(n))
                }
            }
            Value::String(s) => KeyValue::Text(s),
            Value::Array(items) => KeyValue::Seq(items.into_iter().map(KeyValue::from).collect()),
            object @ Value::Object(_) => KeyValue::Structured(object),
        }
    }
}

/// Build a `Vec<KeyValue>` from heterogeneous expressions
///
/// # Examples
/// ```
/// use pathkey::{key_string, key_values, KeyValue};
///
/// let values = key_values![KeyValue::Null, "example", true, 42];
/// assert_eq!(key_string(&values, ":"), "NULL:example:true:42");
/// ```
#[macro_export]
macro_rules! key_values {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::KeyValue::from($value)),*]
    };
}

fn trim_key<'s>(key: &'s str, separator: &str) -> &'s str {
    key.trim_matches(|c: char| c.is_ascii_whitespace() || separator.contains(c))
}

/// JSON encoding of a whole value list
pub(crate) fn encode_values(values: &[KeyValue]) -> String {
    Value::Array(values.iter().map(KeyValue::to_json).collect()).to_string()
}

/// Derive the key string of `values`
///
/// Each value is stringified by [`KeyValue::key_part`], the parts are joined
/// with `separator`, and separator characters and ASCII whitespace are trimmed
/// from both ends. If any value is [`KeyValue::Structured`] the whole list is
/// instead keyed by a digest of its JSON encoding.
///
/// # Examples
/// ```
/// use pathkey::{key_string, key_values};
///
/// assert_eq!(key_string(&key_values![1, "a", true], ":"), "1:a:true");
/// assert_eq!(key_string(&key_values![":a", "b "], ":"), "a:b");
/// assert_eq!(key_string(&key_values!["a", "b"], "/"), "a/b");
/// ```
pub fn key_string(values: &[KeyValue], separator: &str) -> String {
    if values.iter().any(KeyValue::needs_fallback) {
        return digest(encode_values(values).as_bytes(), Algorithm::default());
    }

    let joined = values
        .iter()
        .map(KeyValue::key_part)
        .collect::<Vec<_>>()
        .join(separator);
    trim_key(&joined, separator).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::KeyGenerators;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_key_string_scalars() {
        assert_eq!(
            key_string(&key_values![KeyValue::Null, "example", true, 42], ":"),
            "NULL:example:true:42"
        );
        assert_eq!(key_string(&key_values![1, "a", true], ":"), "1:a:true");
        assert_eq!(key_string(&key_values![-7i64, u64::MAX, 0.5f64], ":"), "-7:18446744073709551615:0.5");
        assert_eq!(key_string(&key_values![false, None::<i32>, Some("x")], ":"), "false:NULL:x");
        assert_eq!(key_string(&[], ":"), "");
    }

    #[test]
    fn test_f32_keys_use_f32_rendering() {
        assert_eq!(KeyValue::from(0.1f32).key_part(), "0.1");
        assert_eq!(KeyValue::from(2.5f32), KeyValue::Float(2.5));
        assert_eq!(key_string(&key_values![1.0f32, 0.3f32], ":"), "1:0.3");
        assert_eq!(KeyValue::from(f32::INFINITY), KeyValue::Float(f64::INFINITY));
    }

    #[test]
    fn test_key_string_trims_outer_separators() {
        assert_eq!(key_string(&key_values!["", "a", ""], ":"), "a");
        assert_eq!(key_string(&key_values!["  a", "b:"], ":"), "a:b");
        assert_eq!(key_string(&key_values!["a", "b"], "::"), "a::b");
        assert_eq!(key_string(&key_values!["-a-", "b"], "-"), "a--b");
        // Inner whitespace is kept
        assert_eq!(key_string(&key_values!["a b", "c"], ":"), "a b:c");
    }

    #[test]
    fn test_key_string_is_order_sensitive() {
        assert_ne!(
            key_string(&key_values!["a", "b"], ":"),
            key_string(&key_values!["b", "a"], ":")
        );
    }

    #[test]
    fn test_nested_sequences_are_digested() {
        let small = key_string(&key_values![vec![1, 2, 3]], ":");
        let large = key_string(&key_values![(0..1000).collect::<Vec<i32>>()], ":");
        assert_eq!(small.len(), 16);
        assert_eq!(large.len(), 16);
        assert_ne!(small, large);
        assert!(small.chars().all(|c| c.is_ascii_hexdigit()));

        let expected = digest(b"1:2:3", Algorithm::default());
        assert_eq!(small, expected);

        assert_eq!(
            key_string(&key_values!["prefix", vec!["a", "b"]], ":"),
            format!("prefix:{}", digest(b"a:b", Algorithm::default()))
        );
    }

    #[test]
    fn test_stringable_values() {
        struct Version(u32, u32);

        impl Stringable for Version {
            fn canonical_string(&self) -> Cow<'_, str> {
                Cow::Owned(format!("v{}.{}", self.0, self.1))
            }
        }

        let values = vec![KeyValue::from("release"), KeyValue::stringable(&Version(1, 2))];
        assert_eq!(key_string(&values, ":"), "release:v1.2");

        let path = Path::new("assets/app.js");
        assert_eq!(key_string(&[KeyValue::stringable(path)], ":"), "assets/app.js");
    }

    #[test]
    fn test_tracked_objects() {
        let first = Tracked::new(vec![1u8, 2, 3]);
        let second = Tracked::new(vec![1u8, 2, 3]);
        assert_ne!(first.id(), second.id());
        assert!(second.id() > first.id());
        assert_eq!(first.len(), 3);

        let key = key_string(&[KeyValue::from(&first)], ":");
        assert_eq!(key, format!("{}#{}", std::any::type_name::<Vec<u8>>(), first.id()));
        assert_eq!(key, key_string(&[first.key_value()], ":"));
        assert_ne!(key, key_string(&[KeyValue::from(&second)], ":"));

        let clone = first.clone();
        assert_ne!(clone.id(), first.id());
        assert_eq!(clone.into_inner(), vec![1u8, 2, 3]);
    }

    #[test]
    fn test_structured_values_use_json_fallback() {
        let values = vec![KeyValue::from("a"), KeyValue::from(json!({"k": 1}))];
        let key = key_string(&values, ":");
        assert_eq!(key, digest(br#"["a",{"k":1}]"#, Algorithm::default()));
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(KeyValue::from(json!(null)), KeyValue::Null);
        assert_eq!(KeyValue::from(json!(3)), KeyValue::Int(3));
        assert_eq!(KeyValue::from(json!(u64::MAX)), KeyValue::UInt(u64::MAX));
        assert_eq!(KeyValue::from(json!(1.5)), KeyValue::Float(1.5));
        assert_eq!(KeyValue::from(json!("s")), KeyValue::Text("s".into()));
        assert_eq!(
            KeyValue::from(json!([1, "x"])),
            KeyValue::Seq(vec![KeyValue::Int(1), KeyValue::Text("x".into())])
        );
        assert!(matches!(KeyValue::from(json!({})), KeyValue::Structured(_)));
    }

    #[test]
    fn test_serialize_key_values() {
        let values = key_values![KeyValue::Null, 1, "a", vec![true], 1.5f64];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[null,1,"a",[true],1.5]"#
        );
        assert_eq!(encode_values(&values), r#"[null,1,"a",[true],1.5]"#);
    }

    proptest! {
        #[test]
        fn key_string_is_deterministic(values in KeyGenerators::values()) {
            prop_assert_eq!(key_string(&values, ":"), key_string(&values.clone(), ":"));
        }

        #[test]
        fn key_string_has_no_outer_padding(values in KeyGenerators::values()) {
            let key = key_string(&values, ":");
            prop_assert!(!key.starts_with(':') && !key.ends_with(':'));
            prop_assert_eq!(key.trim(), key.as_str());
        }
    }
}
