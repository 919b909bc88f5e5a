//! Schema files (TOML)
//!
//! ```toml
//! ignore = ["APP_PATH"]
//!
//! [[field]]
//! name = "INTEGERS"
//! type = "list[int]"
//! default = " 4, 100, 12"
//! ```
//!
//! String defaults are cast like source values; other TOML scalars and
//! arrays are used as literal values.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use typed_env_cast::{TypeTag, Value};

use super::{FieldDefault, FieldSpec, Schema};
use crate::error::ConfigError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    ignore: Vec<String>,

    #[serde(default, rename = "field")]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    name: String,

    #[serde(rename = "type")]
    tag: TypeTag,

    default: Option<toml::Value>,
}

impl Schema {
    /// Load and parse a schema from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse a schema from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: SchemaFile = toml::from_str(s)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        let mut schema = Schema::default();
        for entry in file.fields {
            let default = match entry.default {
                None => FieldDefault::Unset,
                Some(toml::Value::String(raw)) => FieldDefault::Raw(raw),
                Some(other) => FieldDefault::Value(literal(&entry.name, other)?),
            };
            schema.push(FieldSpec {
                name: entry.name,
                tag: entry.tag,
                default,
            });
        }
        schema.ignored.extend(file.ignore);
        Ok(schema)
    }
}

/// Convert a non-string TOML default into a literal value.
fn literal(name: &str, value: toml::Value) -> Result<Value, ConfigError> {
    match value {
        toml::Value::String(s) => Ok(Value::String(s)),
        toml::Value::Integer(i) => Ok(Value::Integer(i)),
        toml::Value::Float(f) => Ok(Value::Float(f)),
        toml::Value::Boolean(b) => Ok(Value::Boolean(b)),
        toml::Value::Datetime(dt) => Ok(Value::String(dt.to_string())),
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| literal(name, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        toml::Value::Table(_) => Err(ConfigError::ParseError(format!(
            "default of {} is a table; nested values are not supported",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCHEMA: &str = r#"
ignore = ["APP_PATH"]

[[field]]
name = "INTEGER"
type = "int"

[[field]]
name = "MAYBE_STRINGS"
type = "optional[list[str]]"

[[field]]
name = "INTEGERS"
type = "list[int]"
default = " 4, 100, 12"

[[field]]
name = "RATIO"
type = "float"
default = 0.5

[[field]]
name = "WEIGHTS"
type = "list[float]"
default = [1.0, 2.0]
"#;

    #[test]
    fn test_parse_schema() {
        let schema = Schema::from_toml_str(SCHEMA).unwrap();

        assert_eq!(schema.len(), 5);
        assert!(schema.ignored().contains("APP_PATH"));

        let integer = schema.field("INTEGER").unwrap();
        assert_eq!(integer.tag, TypeTag::Integer);
        assert_eq!(integer.default, FieldDefault::Unset);

        let maybe = schema.field("MAYBE_STRINGS").unwrap();
        assert_eq!(maybe.tag, TypeTag::optional(TypeTag::list(TypeTag::String)));

        let integers = schema.field("INTEGERS").unwrap();
        assert_eq!(integers.default, FieldDefault::Raw(" 4, 100, 12".into()));

        let ratio = schema.field("RATIO").unwrap();
        assert_eq!(ratio.default, FieldDefault::Value(Value::Float(0.5)));

        let weights = schema.field("WEIGHTS").unwrap();
        assert_eq!(
            weights.default,
            FieldDefault::Value(Value::List(vec![Value::Float(1.0), Value::Float(2.0)]))
        );
    }

    #[test]
    fn test_bad_type_tag() {
        let err = Schema::from_toml_str("[[field]]\nname = \"A\"\ntype = \"dict[int]\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("dict[int]"));
    }

    #[test]
    fn test_table_default_rejected() {
        let err = Schema::from_toml_str(
            "[[field]]\nname = \"A\"\ntype = \"str\"\ndefault = { nested = 1 }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("nested values are not supported"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = Schema::from_toml_str("[[field]]\nname = \"A\"\ntype = \"str\"\nrequired = true\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[[field]]").unwrap();
        writeln!(temp, "name = \"PORT\"").unwrap();
        writeln!(temp, "type = \"int\"").unwrap();
        writeln!(temp, "default = \"8080\"").unwrap();

        let schema = Schema::from_file(temp.path()).unwrap();
        assert_eq!(schema.fields()[0].name, "PORT");
    }
}
