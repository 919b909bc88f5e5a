//! Configuration schemas
//!
//! A schema is the ordered list of fields a configuration declares. Each
//! field carries its type tag and an explicit default descriptor.

mod file;

use std::collections::BTreeSet;
use typed_env_cast::{TypeTag, Value};

/// Names starting with this prefix are never populated.
pub const IGNORE_PREFIX: &str = "_";

/// Default of a field when no source defines it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldDefault {
    /// No literal default: optional types default to `None`, everything
    /// else is required.
    #[default]
    Unset,
    /// String literal, cast like a value read from a source.
    Raw(String),
    /// Literal used as-is.
    Value(Value),
}

/// How a field is resolved, derived from its tag and default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    Defaulted,
}

/// A declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub tag: TypeTag,
    pub default: FieldDefault,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            tag,
            default: FieldDefault::Unset,
        }
    }

    pub fn with_default(mut self, raw: impl Into<String>) -> Self {
        self.default = FieldDefault::Raw(raw.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.default = FieldDefault::Value(value);
        self
    }

    pub fn requirement(&self) -> Requirement {
        match self.default {
            FieldDefault::Raw(_) | FieldDefault::Value(_) => Requirement::Defaulted,
            FieldDefault::Unset if self.tag.is_optional() => Requirement::Optional,
            FieldDefault::Unset => Requirement::Required,
        }
    }
}

/// Ordered field declarations plus names the schema itself ignores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    ignored: BTreeSet<String>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn ignored(&self) -> &BTreeSet<String> {
        &self.ignored
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Add a field. Redeclaring a name replaces the earlier declaration in
    /// place, keeping its position.
    pub fn push(&mut self, spec: FieldSpec) {
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Field without a literal default.
    pub fn field(mut self, name: impl Into<String>, tag: TypeTag) -> Self {
        self.schema.push(FieldSpec::new(name, tag));
        self
    }

    /// Field with a string default that is cast like a source value.
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        tag: TypeTag,
        raw: impl Into<String>,
    ) -> Self {
        self.schema.push(FieldSpec::new(name, tag).with_default(raw));
        self
    }

    /// Field with a literal default used as-is.
    pub fn field_with_value(mut self, name: impl Into<String>, tag: TypeTag, value: Value) -> Self {
        self.schema.push(FieldSpec::new(name, tag).with_value(value));
        self
    }

    pub fn spec(mut self, spec: FieldSpec) -> Self {
        self.schema.push(spec);
        self
    }

    pub fn ignore(mut self, name: impl Into<String>) -> Self {
        self.schema.ignored.insert(name.into());
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}
