//! Cast functions.
//!
//! A cast turns the raw string of a setting into a typed [`Value`]. Builtin
//! casts cover the scalar tags; `list` and `optional` wrap an element cast.

use crate::csv::split_csv;
use crate::tag::TypeTag;
use crate::value::{Complex, Value};
use std::fmt;
use std::sync::Arc;

/// Boxed error returned by cast functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared cast function.
pub type CastFn = Arc<dyn Fn(&str) -> Result<Value, BoxError> + Send + Sync>;

/// Tokens accepted as `true` by the boolean cast (compared lowercased).
const TRUE_TOKENS: &[&str] = &["1", "yes", "true", "on"];

/// Tokens accepted as `false` by the boolean cast (compared lowercased).
const FALSE_TOKENS: &[&str] = &["0", "no", "false", "off", ""];

/// A raw value could not be converted to its declared type.
#[derive(Debug, thiserror::Error)]
#[error("cannot cast {input:?} to {tag}: {source}")]
pub struct CastError {
    pub tag: TypeTag,
    pub input: String,
    #[source]
    pub source: BoxError,
}

/// A resolved cast: the tag it was resolved for plus the function.
#[derive(Clone)]
pub struct Cast {
    tag: TypeTag,
    func: CastFn,
}

impl Cast {
    pub fn new(tag: TypeTag, func: CastFn) -> Self {
        Self { tag, func }
    }

    pub fn tag(&self) -> &TypeTag {
        &self.tag
    }

    /// Apply the cast to a raw string.
    pub fn apply(&self, raw: &str) -> Result<Value, CastError> {
        (self.func)(raw).map_err(|source| CastError {
            tag: self.tag.clone(),
            input: raw.to_string(),
            source,
        })
    }
}

impl fmt::Debug for Cast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cast").field("tag", &self.tag).finish_non_exhaustive()
    }
}

/// Wrap a plain function as a [`CastFn`].
pub fn cast_fn<F>(f: F) -> CastFn
where
    F: Fn(&str) -> Result<Value, BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Trim `raw` and drop digit-separating underscores.
///
/// An underscore must sit between two digits.
fn strip_digit_separators(raw: &str, kind: &str) -> Result<String, BoxError> {
    let trimmed = raw.trim();
    if !trimmed.contains('_') {
        return Ok(trimmed.to_string());
    }
    let bytes = trimmed.as_bytes();
    let misplaced = bytes.iter().enumerate().any(|(i, &b)| {
        b == b'_'
            && (i == 0
                || i + 1 == bytes.len()
                || !bytes[i - 1].is_ascii_digit()
                || !bytes[i + 1].is_ascii_digit())
    });
    if misplaced {
        return Err(format!("invalid literal for {}: {:?}", kind, raw).into());
    }
    Ok(trimmed.replace('_', ""))
}

pub fn cast_integer(raw: &str) -> Result<Value, BoxError> {
    let digits = strip_digit_separators(raw, "int")?;
    Ok(Value::Integer(digits.parse::<i64>()?))
}

pub fn cast_float(raw: &str) -> Result<Value, BoxError> {
    let digits = strip_digit_separators(raw, "float")?;
    Ok(Value::Float(digits.parse::<f64>()?))
}

pub fn cast_complex(raw: &str) -> Result<Value, BoxError> {
    Ok(Value::Complex(raw.parse::<Complex>()?))
}

pub fn cast_boolean(raw: &str) -> Result<Value, BoxError> {
    let token = raw.trim().to_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Ok(Value::Boolean(true))
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Ok(Value::Boolean(false))
    } else {
        Err(format!("not a boolean: {:?}", raw).into())
    }
}

pub fn cast_string(raw: &str) -> Result<Value, BoxError> {
    Ok(Value::String(raw.to_string()))
}

/// UTF-8 encoding of the raw string.
pub fn cast_bytes(raw: &str) -> Result<Value, BoxError> {
    Ok(Value::Bytes(raw.as_bytes().to_vec()))
}

/// Split on commas and cast every stripped element, preserving order.
pub fn list(element: CastFn) -> CastFn {
    Arc::new(move |raw: &str| {
        let items = split_csv(raw)?;
        let mut values = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let value = element(item.trim()).map_err(|e| -> BoxError {
                format!("element {} ({:?}): {}", i, item, e).into()
            })?;
            values.push(value);
        }
        Ok(Value::List(values))
    })
}

/// Empty input yields `Value::None`; anything else goes to `inner`.
pub fn optional(inner: CastFn) -> CastFn {
    Arc::new(move |raw: &str| {
        if raw.is_empty() {
            Ok(Value::None)
        } else {
            inner(raw)
        }
    })
}

/// Extra casts that callers can register under custom tags.
pub mod extra {
    use super::BoxError;
    use crate::value::Value;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use std::path::PathBuf;

    /// Tag name conventionally used for [`path`].
    pub const PATH_TAG: &str = "path";

    /// Tag name conventionally used for [`base64`].
    pub const BASE64_TAG: &str = "base64";

    pub fn path(raw: &str) -> Result<Value, BoxError> {
        Ok(Value::Path(PathBuf::from(raw)))
    }

    /// Standard-alphabet base64 decode.
    pub fn base64(raw: &str) -> Result<Value, BoxError> {
        Ok(Value::Bytes(STANDARD.decode(raw.trim())?))
    }
}
