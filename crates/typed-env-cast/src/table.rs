//! Cast table and resolution.

use crate::cast::{
    cast_boolean, cast_bytes, cast_complex, cast_fn, cast_float, cast_integer, cast_string, list,
    optional, BoxError, Cast, CastFn,
};
use crate::tag::TypeTag;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;

/// No cast is known for a type tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported type: {tag}")]
pub struct UnsupportedType {
    pub tag: TypeTag,
}

/// Builtin casts plus caller overrides keyed by exact tag.
///
/// An override for a tag replaces the builtin for that tag wherever it is
/// resolved, including as the element of `list[..]` or the inner type of
/// `optional[..]`.
#[derive(Clone, Default)]
pub struct CastTable {
    overrides: HashMap<TypeTag, CastFn>,
}

impl CastTable {
    /// Table with only the builtin casts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the cast for `tag`.
    pub fn with<F>(mut self, tag: TypeTag, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.overrides.insert(tag, cast_fn(f));
        self
    }

    pub fn insert(&mut self, tag: TypeTag, f: CastFn) {
        self.overrides.insert(tag, f);
    }

    /// Merge `other` on top of this table; `other` wins on conflicts.
    pub fn merged(mut self, other: &CastTable) -> Self {
        for (tag, f) in &other.overrides {
            self.overrides.insert(tag.clone(), f.clone());
        }
        self
    }

    pub fn is_overridden(&self, tag: &TypeTag) -> bool {
        self.overrides.contains_key(tag)
    }

    /// Resolve the cast for `tag`.
    pub fn resolve(&self, tag: &TypeTag) -> Result<Cast, UnsupportedType> {
        let func = self.resolve_fn(tag)?;
        Ok(Cast::new(tag.clone(), func))
    }

    fn resolve_fn(&self, tag: &TypeTag) -> Result<CastFn, UnsupportedType> {
        if let Some(f) = self.overrides.get(tag) {
            return Ok(f.clone());
        }
        let unsupported = || UnsupportedType { tag: tag.clone() };

        let func = match tag {
            TypeTag::Integer => cast_fn(cast_integer),
            TypeTag::Float => cast_fn(cast_float),
            TypeTag::Complex => cast_fn(cast_complex),
            TypeTag::Boolean => cast_fn(cast_boolean),
            TypeTag::String => cast_fn(cast_string),
            TypeTag::Bytes => cast_fn(cast_bytes),
            TypeTag::List(inner) => match inner.as_ref() {
                TypeTag::List(_) | TypeTag::Optional(_) => return Err(unsupported()),
                element => list(self.resolve_fn(element).map_err(|_| unsupported())?),
            },
            TypeTag::Optional(inner) => match inner.as_ref() {
                TypeTag::Optional(_) => return Err(unsupported()),
                other => optional(self.resolve_fn(other).map_err(|_| unsupported())?),
            },
            TypeTag::Custom(_) => return Err(unsupported()),
        };
        Ok(func)
    }
}

impl fmt::Debug for CastTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<String> = self.overrides.keys().map(|t| t.to_string()).collect();
        tags.sort();
        f.debug_struct("CastTable").field("overrides", &tags).finish()
    }
}

/// Resolve `tag` against `table`.
pub fn resolve(tag: &TypeTag, table: &CastTable) -> Result<Cast, UnsupportedType> {
    table.resolve(tag)
}
