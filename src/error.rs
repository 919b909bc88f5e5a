//! Configuration errors.
//!
//! Every error raised while building a configuration names the field it
//! failed on, so a failed construction is never ambiguous.

use std::io;
use typed_env_cast::{CastError, UnsupportedType};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The declared type of a field has no cast.
    #[error("{name}: {source}")]
    UnsupportedType {
        name: String,
        #[source]
        source: UnsupportedType,
    },

    /// A required field is not defined in any source.
    #[error("{name} not found. Declare it as envvar or define a default value.")]
    UndefinedValue { name: String },

    /// The raw value of a field could not be cast to its declared type.
    #[error("{name}: {source}")]
    Cast {
        name: String,
        #[source]
        source: CastError,
    },

    /// A typed accessor asked for a name the instance does not hold.
    #[error("{name} is not defined in this configuration")]
    MissingField { name: String },

    /// A typed accessor asked for a different type than the one resolved.
    #[error("{name}: expected {expected}, found {found}")]
    Extract {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    /// The field this error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::UnsupportedType { name, .. }
            | ConfigError::UndefinedValue { name }
            | ConfigError::Cast { name, .. }
            | ConfigError::MissingField { name }
            | ConfigError::Extract { name, .. } => Some(name),
            ConfigError::IoError(_) | ConfigError::ParseError(_) => None,
        }
    }
}
