//! Resolved configuration instances.
//!
//! An instance is produced once by the populator and is read-only
//! afterwards. It keeps declaration order and records where every value
//! came from.

use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;
use typed_env_cast::{Complex, Value};

use crate::error::ConfigError;
use crate::source::{ValueOrigin, ValueSource};

/// Name fragments that mark a setting as secret
const SECRET_KEYS: &[&str] = &[
    "password",
    "token",
    "secret",
    "private_key",
    "api_key",
    "credential",
];

const REDACTED: &str = "[REDACTED]";

/// True when `name` looks like it holds a secret.
pub fn is_secret(name: &str) -> bool {
    let lower = name.to_lowercase();
    SECRET_KEYS.iter().any(|s| lower.contains(s))
}

/// A fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigInstance {
    values: IndexMap<String, Value>,
    sources: IndexMap<String, ValueSource>,
}

impl ConfigInstance {
    /// An empty instance, to be filled by `populate`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Carry a caller-provided value that no schema field resolves.
    ///
    /// A populated field with the same name replaces the preset.
    pub fn with_preset(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        self.sources
            .insert(name.clone(), ValueSource::new(ValueOrigin::Preset));
        self.values.insert(name, value);
        self
    }

    pub(crate) fn commit(&mut self, name: String, value: Value, source: ValueSource) {
        self.sources.insert(name.clone(), source);
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn source(&self, name: &str) -> Option<&ValueSource> {
        self.sources.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Typed access to a resolved value.
    pub fn extract<T: FromValue>(&self, name: &str) -> Result<T, ConfigError> {
        let value = self.get(name).ok_or_else(|| ConfigError::MissingField {
            name: name.to_string(),
        })?;
        T::from_value(value).ok_or_else(|| ConfigError::Extract {
            name: name.to_string(),
            expected: T::EXPECTED,
            found: value.kind(),
        })
    }

    /// Values with secret-looking names replaced, plus the redacted names.
    pub fn redacted(&self) -> (IndexMap<String, Value>, Vec<String>) {
        let mut redactions = Vec::new();
        let values = self
            .values
            .iter()
            .map(|(name, value)| {
                if is_secret(name) && !value.is_none() {
                    redactions.push(name.clone());
                    (name.clone(), Value::String(REDACTED.to_string()))
                } else {
                    (name.clone(), value.clone())
                }
            })
            .collect();
        (values, redactions)
    }

    /// Serialize to JSON with secrets redacted
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let (values, redactions) = self.redacted();
        serde_json::to_string_pretty(&serde_json::json!({
            "values": values,
            "sources": self.sources,
            "redactions": redactions,
        }))
    }

    /// Serialize to JSON without redaction
    pub fn to_json_unredacted(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Conversion from a resolved [`Value`] into a Rust type.
pub trait FromValue: Sized {
    /// Name used in mismatch errors.
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "str";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }
}

impl FromValue for Complex {
    const EXPECTED: &'static str = "complex";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Complex(c) => Some(*c),
            _ => None,
        }
    }
}

impl FromValue for PathBuf {
    const EXPECTED: &'static str = "path";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Path(p) => Some(p.clone()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_list()?.iter().map(T::from_value).collect()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = "optional";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
