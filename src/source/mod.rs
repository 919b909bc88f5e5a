//! Settings sources
//!
//! A settings source supplies the raw string for a named setting. The
//! populator asks it for each field through [`SettingsSource::get`], which
//! applies the field's cast and default.
//!
//! Sources:
//! - [`Environment`]: process environment, optionally prefixed
//! - [`DotEnv`]: a `.env` file
//! - [`Settings`]: environment first, then an optional `.env` repository
//! - [`MapSource`]: in-memory map

mod dotenv;
mod env;
mod layered;
mod map;

pub use dotenv::{parse_dotenv, DotEnv, DOTENV_FILE_NAME};
pub use env::Environment;
pub use layered::Settings;
pub use map::MapSource;

use serde::{Deserialize, Serialize};
use std::fmt;
use typed_env_cast::{Cast, Value};

use crate::error::ConfigError;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueOrigin {
    Environment,
    File,
    Memory,
    Default,
    Preset,
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueOrigin::Environment => "environment",
            ValueOrigin::File => "file",
            ValueOrigin::Memory => "memory",
            ValueOrigin::Default => "default",
            ValueOrigin::Preset => "preset",
        };
        f.write_str(s)
    }
}

/// Provenance of a single resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSource {
    pub origin: ValueOrigin,

    /// Actual key looked up (differs from the field name when prefixed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// File path (file origin only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of the file bytes (file origin only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl ValueSource {
    pub fn new(origin: ValueOrigin) -> Self {
        Self {
            origin,
            key: None,
            path: None,
            digest: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// A raw setting as found in a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSetting {
    pub value: String,
    pub source: ValueSource,
}

/// What to do when a setting is absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback<'a> {
    /// Absence is an error.
    Required,
    /// Use this string, passed through the cast.
    Raw(&'a str),
    /// Use this value as-is.
    Value(Value),
}

/// A value after casting, with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub source: ValueSource,
}

/// A key/value backing store for settings.
pub trait SettingsSource {
    /// Look up the raw string for `name`. `Ok(None)` when absent; an error
    /// when the setting exists but cannot be read as text.
    fn lookup(&self, name: &str) -> Result<Option<RawSetting>, ConfigError>;

    /// Fetch `name`, cast it, and fall back as instructed when absent.
    fn get(&self, name: &str, cast: &Cast, fallback: Fallback<'_>) -> Result<Resolved, ConfigError> {
        let cast_err = |source| ConfigError::Cast {
            name: name.to_string(),
            source,
        };

        if let Some(raw) = self.lookup(name)? {
            let value = cast.apply(&raw.value).map_err(cast_err)?;
            return Ok(Resolved {
                value,
                source: raw.source,
            });
        }

        match fallback {
            Fallback::Required => Err(ConfigError::UndefinedValue {
                name: name.to_string(),
            }),
            Fallback::Raw(raw) => Ok(Resolved {
                value: cast.apply(raw).map_err(cast_err)?,
                source: ValueSource::new(ValueOrigin::Default),
            }),
            Fallback::Value(value) => Ok(Resolved {
                value,
                source: ValueSource::new(ValueOrigin::Default),
            }),
        }
    }
}

impl<S: SettingsSource + ?Sized> SettingsSource for &S {
    fn lookup(&self, name: &str) -> Result<Option<RawSetting>, ConfigError> {
        (**self).lookup(name)
    }
}

impl<S: SettingsSource + ?Sized> SettingsSource for Box<S> {
    fn lookup(&self, name: &str) -> Result<Option<RawSetting>, ConfigError> {
        (**self).lookup(name)
    }
}
