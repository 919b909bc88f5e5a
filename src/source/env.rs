//! Process environment source.

use std::env;

use super::{RawSetting, SettingsSource, ValueOrigin, ValueSource};
use crate::error::ConfigError;

/// Reads settings from the process environment.
///
/// With a prefix, field `PORT` is read from `<prefix>PORT`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    prefix: Option<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Environment variable name for a field.
    pub fn variable_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, name),
            None => name.to_string(),
        }
    }
}

impl SettingsSource for Environment {
    fn lookup(&self, name: &str) -> Result<Option<RawSetting>, ConfigError> {
        let variable = self.variable_name(name);
        let Some(raw) = env::var_os(&variable) else {
            return Ok(None);
        };
        let value = raw.into_string().map_err(|_| {
            ConfigError::ParseError(format!(
                "environment variable {} is not valid UTF-8",
                variable
            ))
        })?;
        tracing::trace!(variable = %variable, "found environment variable");
        Ok(Some(RawSetting {
            value,
            source: ValueSource::new(ValueOrigin::Environment).with_key(variable),
        }))
    }
}
