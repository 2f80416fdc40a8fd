//! Structured logging context for key-value fields
//!
//! This module provides:
//! - `Field` / `FieldValue`: a single key-value pair attached to a log call
//! - `FieldMap`: insertion-ordered, flattened fields of one entry
//! - `LogContext`: immutable group path and fields inherited by derived loggers

use std::fmt;
use std::time::Duration;

use super::error::{LoggerError, Result};
use super::output_format::escape_control;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    /// Arbitrary structured value
    Json(serde_json::Value),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Duration(d) => write!(f, "{:?}", d),
            FieldValue::Json(v) => write!(f, "{}", v),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for JSON serialization
    ///
    /// # Errors
    ///
    /// Returns `LoggerError::Encoding` for non-finite floats, which JSON
    /// cannot represent.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::UInt(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| {
                    LoggerError::encoding(format!("float value {} is not representable in JSON", f))
                })?,
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Duration(d) => serde_json::Value::String(format!("{:?}", d)),
            FieldValue::Json(v) => v.clone(),
            FieldValue::Null => serde_json::Value::Null,
        })
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::UInt(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Duration> for FieldValue {
    fn from(d: Duration) -> Self {
        FieldValue::Duration(d)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Json(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// A single structured field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    /// Field named `error` holding the error's display text
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::new("error", FieldValue::String(err.to_string()))
    }

    /// Structured field from any serializable value
    pub fn json<T: serde::Serialize>(key: impl Into<String>, value: &T) -> Result<Self> {
        Ok(Self::new(key, FieldValue::Json(serde_json::to_value(value)?)))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> From<(K, V)> for Field {
    fn from((key, value): (K, V)) -> Self {
        Field::new(key, value)
    }
}

/// Insertion-ordered key-value mapping of one entry's fields
///
/// Inserting an existing key replaces its value and keeps its position.
///
/// Lookups and inserts scan linearly, so flattening `n` fields costs
/// O(n²). Sized for the few fields a single log call carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Format fields as key=value pairs on a single line
    ///
    /// Newlines, carriage returns and tabs in keys and values are escaped.
    pub fn format_fields(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", escape_control(k), escape_control(&v.to_string())))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

/// Context accumulated across a logger lineage
///
/// Every derivation returns a fresh snapshot; the parent is never touched.
/// Field keys are prefixed with the group path active when they were
/// captured, so later groups never rename earlier fields.
///
/// # Example
///
/// ```
/// use rust_loki_logger::core::{Field, LogContext};
///
/// let ctx = LogContext::new()
///     .with_group("http")
///     .with_group("request")
///     .with_fields([Field::new("id", 7)]);
///
/// let fields = ctx.flatten(&[Field::new("status", 200)]);
/// assert!(fields.contains_key("http.request.id"));
/// assert!(fields.contains_key("http.request.status"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext {
    groups: Vec<String>,
    fields: Vec<Field>,
}

impl LogContext {
    /// Create a new empty log context
    pub fn new() -> Self {
        Self::default()
    }

    /// Active group names, outer to inner
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Captured fields with their resolved keys, in accumulation order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.fields.is_empty()
    }

    /// Derive a context carrying additional fields
    #[must_use]
    pub fn with_fields<I>(&self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let mut derived = self.clone();
        derived.fields.extend(fields.into_iter().map(|field| {
            let field = field.into();
            Field {
                key: self.qualify(field.key),
                value: field.value,
            }
        }));
        derived
    }

    /// Derive a context carrying one additional field
    #[must_use]
    pub fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.with_fields([Field::new(key, value)])
    }

    /// Derive a context nested one group deeper
    ///
    /// An empty name is kept as an empty path segment.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        let mut derived = self.clone();
        derived.groups.push(name.into());
        derived
    }

    /// Merge context fields and call-site fields into one mapping
    ///
    /// Context fields come first in accumulation order, then call-site
    /// fields qualified with the current group path. Later writes win.
    pub fn flatten(&self, call_site: &[Field]) -> FieldMap {
        let mut map = FieldMap::new();
        for field in &self.fields {
            map.insert(field.key.clone(), field.value.clone());
        }
        for field in call_site {
            map.insert(self.qualify(field.key.clone()), field.value.clone());
        }
        map
    }

    fn qualify(&self, key: String) -> String {
        if self.groups.is_empty() {
            key
        } else {
            format!("{}.{}", self.groups.join("."), key)
        }
    }
}
