//! Field population.
//!
//! Walks a schema in declaration order, resolves each field's cast, picks
//! its default and fetches the value from a settings source. Construction
//! is all-or-nothing: values are staged and only committed once every field
//! resolved.

use std::collections::BTreeSet;
use tracing::{debug, info};
use typed_env_cast::{CastTable, Value};

use crate::error::ConfigError;
use crate::instance::{is_secret, ConfigInstance};
use crate::schema::{FieldDefault, Schema, IGNORE_PREFIX};
use crate::source::{Environment, Fallback, Resolved, SettingsSource, ValueOrigin, ValueSource};

const SECRET_MASK: &str = "******";

/// True when `name` is skipped by the populator.
pub fn is_ignored(name: &str, ignored: &BTreeSet<String>) -> bool {
    name.starts_with(IGNORE_PREFIX) || ignored.contains(name)
}

/// Resolve every non-ignored field of `schema` into `instance`.
///
/// Ignored fields are never looked up or cast. An ignored field with a
/// default keeps it in the instance as a preset; a string default is kept
/// as the string itself.
pub fn populate(
    mut instance: ConfigInstance,
    schema: &Schema,
    casts: &CastTable,
    ignored: &BTreeSet<String>,
    source: &dyn SettingsSource,
) -> Result<ConfigInstance, ConfigError> {
    let mut staged: Vec<(String, Resolved)> = Vec::with_capacity(schema.len());

    for field in schema.fields() {
        let name = field.name.as_str();

        if is_ignored(name, ignored) || schema.ignored().contains(name) {
            debug!(field = %name, "skipping ignored field");
            // Literal defaults are kept as written; string defaults stay uncast.
            let literal = match &field.default {
                FieldDefault::Raw(raw) => Some(Value::String(raw.clone())),
                FieldDefault::Value(value) => Some(value.clone()),
                FieldDefault::Unset => None,
            };
            if let Some(value) = literal {
                staged.push((
                    field.name.clone(),
                    Resolved {
                        value,
                        source: ValueSource::new(ValueOrigin::Preset),
                    },
                ));
            }
            continue;
        }

        let cast = casts
            .resolve(&field.tag)
            .map_err(|source| ConfigError::UnsupportedType {
                name: field.name.clone(),
                source,
            })?;

        let fallback = match &field.default {
            FieldDefault::Raw(raw) => Fallback::Raw(raw),
            FieldDefault::Value(value) => Fallback::Value(value.clone()),
            FieldDefault::Unset if field.tag.is_optional() => Fallback::Value(Value::None),
            FieldDefault::Unset => Fallback::Required,
        };

        let resolved = source.get(name, &cast, fallback)?;

        let shown = if is_secret(name) {
            SECRET_MASK.to_string()
        } else {
            resolved.value.to_string()
        };
        info!(
            field = %name,
            tag = %field.tag,
            origin = %resolved.source.origin,
            value = %shown,
            "resolved configuration value"
        );

        staged.push((field.name.clone(), resolved));
    }

    for (name, resolved) in staged {
        instance.commit(name, resolved.value, resolved.source);
    }
    Ok(instance)
}

/// Builds a [`ConfigInstance`] from a schema.
///
/// ```ignore
/// let config = ConfigLoader::new(schema)
///     .casts(CastTable::new().with(TypeTag::custom("path"), extra::path))
///     .ignore(["APP_PATH"])
///     .source(MapSource::new().with("PORT", "8080"))
///     .load()?;
/// ```
pub struct ConfigLoader {
    schema: Schema,
    casts: CastTable,
    ignored: BTreeSet<String>,
    source: Box<dyn SettingsSource>,
    instance: ConfigInstance,
}

impl ConfigLoader {
    /// Loader reading from the process environment with builtin casts.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            casts: CastTable::new(),
            ignored: BTreeSet::new(),
            source: Box::new(Environment::new()),
            instance: ConfigInstance::new(),
        }
    }

    /// Add cast overrides on top of the builtins.
    pub fn casts(mut self, overrides: CastTable) -> Self {
        self.casts = self.casts.merged(&overrides);
        self
    }

    pub fn ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn source<S: SettingsSource + 'static>(mut self, source: S) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Provide a value by hand, typically for an ignored field.
    pub fn preset(mut self, name: impl Into<String>, value: Value) -> Self {
        self.instance = self.instance.with_preset(name, value);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn load(self) -> Result<ConfigInstance, ConfigError> {
        populate(
            self.instance,
            &self.schema,
            &self.casts,
            &self.ignored,
            self.source.as_ref(),
        )
    }
}

/// A Rust type whose fields are populated from a schema.
pub trait TypedConfig: Sized {
    fn schema() -> Schema;

    fn from_instance(instance: &ConfigInstance) -> Result<Self, ConfigError>;

    /// Cast overrides for this configuration.
    fn casts() -> CastTable {
        CastTable::new()
    }

    /// Names skipped in addition to the schema's own ignore list.
    fn ignored() -> Vec<String> {
        Vec::new()
    }

    /// Load from the process environment.
    fn load() -> Result<Self, ConfigError> {
        Self::load_from(Environment::new())
    }

    fn load_from<S: SettingsSource + 'static>(source: S) -> Result<Self, ConfigError> {
        let instance = ConfigLoader::new(Self::schema())
            .casts(Self::casts())
            .ignore(Self::ignored())
            .source(source)
            .load()?;
        Self::from_instance(&instance)
    }
}
