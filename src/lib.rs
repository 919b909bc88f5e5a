//! Typed configuration from environment-like sources
//!
//! A [`Schema`] declares the fields of a configuration with their type tags
//! and defaults. The populator resolves a cast for every field, reads the
//! raw value from a [`SettingsSource`], and produces an immutable
//! [`ConfigInstance`]. Construction is all-or-nothing.

pub mod error;
pub mod instance;
pub mod populate;
pub mod schema;
pub mod source;

pub use error::ConfigError;
pub use instance::{ConfigInstance, FromValue};
pub use populate::{is_ignored, populate, ConfigLoader, TypedConfig};
pub use schema::{FieldDefault, FieldSpec, Requirement, Schema, SchemaBuilder};
pub use source::{
    DotEnv, Environment, Fallback, MapSource, RawSetting, Resolved, Settings, SettingsSource,
    ValueOrigin, ValueSource,
};
pub use typed_env_cast::{
    extra, resolve, BoxError, Cast, CastError, CastTable, Complex, TypeTag, UnsupportedType, Value,
};
