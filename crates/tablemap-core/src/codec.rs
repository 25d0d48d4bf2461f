//! Typed key/value codecs and SQLite storage marshalling.
//!
//! A codec is a paired `encode`/`decode` between an application type and a
//! storage type the engine holds natively. Codecs are role-tagged: a
//! [`KeyCodec`] can only occupy the key slot of a [`CodecPair`] and a
//! [`ValueCodec`] only the value slot. The pair fixes the four types in
//! play for one map instance.
//!
//! The storage side is constrained by the sealed [`StorageValue`] trait, so
//! "encode into a type SQLite cannot store" is a compile-time failure, not
//! a runtime one.

use std::fmt;
use std::sync::Arc;

use rusqlite::types::{Value, ValueRef};

/// The native column class the engine uses to store a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Integer,
    Real,
    Text,
    Blob,
}

impl StorageClass {
    /// Column type keyword used in generated DDL.
    pub fn as_sql(&self) -> &'static str {
        match self {
            StorageClass::Integer => "INTEGER",
            StorageClass::Real => "REAL",
            StorageClass::Text => "TEXT",
            StorageClass::Blob => "BLOB",
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A type the engine stores natively: integers, floats, text or blobs.
///
/// Extraction is total and mirrors the engine's own column-accessor
/// coercion: NULL text decodes to an empty string, NULL blob to an empty
/// blob, and text that does not parse as a number decodes to zero. This
/// keeps reads of a table whose column affinity no longer matches the
/// configured codec degrading gracefully instead of erroring; see the
/// crate documentation for the trade-off.
///
/// Sealed: only the implementations shipped here exist.
pub trait StorageValue: sealed::Sealed + Clone + Send + Sync + 'static {
    /// Column affinity derived from the Rust type.
    const CLASS: StorageClass;

    /// Bind-side conversion. Strings and blobs are copied; the caller's
    /// buffer does not need to outlive the statement.
    fn to_sql_value(&self) -> Value;

    /// Extract-side conversion, total over every storage class.
    fn from_sql_value(value: ValueRef<'_>) -> Self;
}

// Text-to-number coercion the way the engine's column accessors do it:
// the longest leading numeric prefix, zero when none exists.
fn numeric_prefix_i64(text: &[u8]) -> i64 {
    let s = match std::str::from_utf8(text) {
        Ok(s) => s.trim_start(),
        Err(_) => return 0,
    };
    let cut = s
        .find(|c: char| !matches!(c, '0'..='9' | '+' | '-'))
        .unwrap_or(s.len());
    let mut end = cut;
    while end > 0 {
        if let Ok(parsed) = s[..end].parse::<i64>() {
            return parsed;
        }
        end -= 1;
    }
    0
}

fn numeric_prefix_f64(text: &[u8]) -> f64 {
    let s = match std::str::from_utf8(text) {
        Ok(s) => s.trim_start(),
        Err(_) => return 0.0,
    };
    let cut = s
        .find(|c: char| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .unwrap_or(s.len());
    let mut end = cut;
    while end > 0 {
        if let Ok(parsed) = s[..end].parse::<f64>() {
            return parsed;
        }
        end -= 1;
    }
    0.0
}

macro_rules! integer_storage_value {
    ($($t:ty),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl StorageValue for $t {
            const CLASS: StorageClass = StorageClass::Integer;

            fn to_sql_value(&self) -> Value {
                Value::Integer(*self as i64)
            }

            fn from_sql_value(value: ValueRef<'_>) -> Self {
                match value {
                    ValueRef::Integer(i) => i as $t,
                    ValueRef::Real(r) => r as i64 as $t,
                    ValueRef::Text(t) => numeric_prefix_i64(t) as $t,
                    ValueRef::Blob(b) => numeric_prefix_i64(b) as $t,
                    ValueRef::Null => 0,
                }
            }
        }
    )*};
}

integer_storage_value!(i8, i16, i32, i64, u8, u16, u32);

impl sealed::Sealed for bool {}

impl StorageValue for bool {
    const CLASS: StorageClass = StorageClass::Integer;

    fn to_sql_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_sql_value(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Integer(i) => i != 0,
            ValueRef::Real(r) => r != 0.0,
            ValueRef::Text(t) => numeric_prefix_i64(t) != 0,
            ValueRef::Blob(b) => numeric_prefix_i64(b) != 0,
            ValueRef::Null => false,
        }
    }
}

macro_rules! real_storage_value {
    ($($t:ty),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl StorageValue for $t {
            const CLASS: StorageClass = StorageClass::Real;

            fn to_sql_value(&self) -> Value {
                Value::Real(*self as f64)
            }

            fn from_sql_value(value: ValueRef<'_>) -> Self {
                match value {
                    ValueRef::Integer(i) => i as $t,
                    ValueRef::Real(r) => r as $t,
                    ValueRef::Text(t) => numeric_prefix_f64(t) as $t,
                    ValueRef::Blob(b) => numeric_prefix_f64(b) as $t,
                    ValueRef::Null => 0.0,
                }
            }
        }
    )*};
}

real_storage_value!(f32, f64);

impl sealed::Sealed for String {}

impl StorageValue for String {
    const CLASS: StorageClass = StorageClass::Text;

    fn to_sql_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_sql_value(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
            ValueRef::Integer(i) => i.to_string(),
            ValueRef::Real(r) => r.to_string(),
            ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
            ValueRef::Null => String::new(),
        }
    }
}

impl sealed::Sealed for Vec<u8> {}

impl StorageValue for Vec<u8> {
    const CLASS: StorageClass = StorageClass::Blob;

    fn to_sql_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_sql_value(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Blob(b) => b.to_vec(),
            ValueRef::Text(t) => t.to_vec(),
            ValueRef::Integer(i) => i.to_string().into_bytes(),
            ValueRef::Real(r) => r.to_string().into_bytes(),
            ValueRef::Null => Vec::new(),
        }
    }
}

/// Key-role codec: paired `encode`/`decode` between the application key
/// type `K` and the storage key type `S`.
///
/// The closure signatures force the decoder's input type to match the
/// encoder's output type and vice versa; a mismatched pair does not
/// construct. Codecs must be pure functions of their input — that is a
/// caller obligation, not enforced here.
pub struct KeyCodec<K, S>
where
    K: 'static,
    S: StorageValue,
{
    encode: Arc<dyn Fn(&K) -> S + Send + Sync>,
    decode: Arc<dyn Fn(&S) -> K + Send + Sync>,
}

impl<K, S> KeyCodec<K, S>
where
    K: 'static,
    S: StorageValue,
{
    pub fn new<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&K) -> S + Send + Sync + 'static,
        D: Fn(&S) -> K + Send + Sync + 'static,
    {
        Self {
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    pub fn encode(&self, input: &K) -> S {
        (self.encode)(input)
    }

    pub fn decode(&self, stored: &S) -> K {
        (self.decode)(stored)
    }
}

impl<S: StorageValue> KeyCodec<S, S> {
    /// Identity codec for a natively-supported storage type.
    pub fn identity() -> Self {
        Self::new(S::clone, S::clone)
    }
}

impl<K, S> Clone for KeyCodec<K, S>
where
    K: 'static,
    S: StorageValue,
{
    fn clone(&self) -> Self {
        Self {
            encode: Arc::clone(&self.encode),
            decode: Arc::clone(&self.decode),
        }
    }
}

/// Value-role codec: paired `encode`/`decode` between the application
/// value type `V` and the storage value type `S`.
pub struct ValueCodec<V, S>
where
    V: 'static,
    S: StorageValue,
{
    encode: Arc<dyn Fn(&V) -> S + Send + Sync>,
    decode: Arc<dyn Fn(&S) -> V + Send + Sync>,
}

impl<V, S> ValueCodec<V, S>
where
    V: 'static,
    S: StorageValue,
{
    pub fn new<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&V) -> S + Send + Sync + 'static,
        D: Fn(&S) -> V + Send + Sync + 'static,
    {
        Self {
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    pub fn encode(&self, input: &V) -> S {
        (self.encode)(input)
    }

    pub fn decode(&self, stored: &S) -> V {
        (self.decode)(stored)
    }
}

impl<S: StorageValue> ValueCodec<S, S> {
    /// Identity codec for a natively-supported storage type.
    pub fn identity() -> Self {
        Self::new(S::clone, S::clone)
    }
}

impl<V, S> Clone for ValueCodec<V, S>
where
    V: 'static,
    S: StorageValue,
{
    fn clone(&self) -> Self {
        Self {
            encode: Arc::clone(&self.encode),
            decode: Arc::clone(&self.decode),
        }
    }
}

/// One key codec plus one value codec.
///
/// Fixes the four types in play for a map instance: application key `K`,
/// application value `V`, storage key `SK`, storage value `SV`. Immutable
/// once constructed.
pub struct CodecPair<K, V, SK = K, SV = V>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    pub key: KeyCodec<K, SK>,
    pub value: ValueCodec<V, SV>,
}

impl<K, V, SK, SV> CodecPair<K, V, SK, SV>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    pub fn new(key: KeyCodec<K, SK>, value: ValueCodec<V, SV>) -> Self {
        Self { key, value }
    }
}

impl<K, V> CodecPair<K, V>
where
    K: StorageValue,
    V: StorageValue,
{
    /// Identity codecs on both sides.
    pub fn identity() -> Self {
        Self::new(KeyCodec::identity(), ValueCodec::identity())
    }
}

impl<K, V, SK, SV> Clone for CodecPair<K, V, SK, SV>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}
