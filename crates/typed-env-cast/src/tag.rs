//! Type tags.
//!
//! A type tag classifies the value domain of a configuration field. The
//! builtin taxonomy is closed (scalars, lists of scalars, optionals of
//! either); `Custom` is the extension point for caller-registered casts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic type of a configuration field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeTag {
    Integer,
    Float,
    Complex,
    Boolean,
    String,
    Bytes,
    /// Comma-separated list of the inner type.
    List(Box<TypeTag>),
    /// Inner type, or `None` when the raw value is empty or absent.
    Optional(Box<TypeTag>),
    /// Caller-registered tag (e.g. `path`).
    Custom(String),
}

impl TypeTag {
    pub fn list(inner: TypeTag) -> Self {
        TypeTag::List(Box::new(inner))
    }

    pub fn optional(inner: TypeTag) -> Self {
        TypeTag::Optional(Box::new(inner))
    }

    pub fn custom(name: impl Into<String>) -> Self {
        TypeTag::Custom(name.into())
    }

    /// True for the six builtin scalar tags.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeTag::Integer
                | TypeTag::Float
                | TypeTag::Complex
                | TypeTag::Boolean
                | TypeTag::String
                | TypeTag::Bytes
        )
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeTag::Optional(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypeTag::List(_))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Integer => write!(f, "int"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::Complex => write!(f, "complex"),
            TypeTag::Boolean => write!(f, "bool"),
            TypeTag::String => write!(f, "str"),
            TypeTag::Bytes => write!(f, "bytes"),
            TypeTag::List(inner) => write!(f, "list[{}]", inner),
            TypeTag::Optional(inner) => write!(f, "optional[{}]", inner),
            TypeTag::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Error parsing the textual form of a type tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type tag '{input}': {reason}")]
pub struct TagParseError {
    pub input: String,
    pub reason: String,
}

impl TagParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for TypeTag {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TagParseError::new(s, "empty"));
        }

        if let Some(open) = trimmed.find('[') {
            if !trimmed.ends_with(']') {
                return Err(TagParseError::new(s, "missing closing ']'"));
            }
            let wrapper = trimmed[..open].trim().to_ascii_lowercase();
            let inner: TypeTag = trimmed[open + 1..trimmed.len() - 1]
                .parse()
                .map_err(|e: TagParseError| TagParseError::new(s, e.reason))?;
            return match wrapper.as_str() {
                "list" => Ok(TypeTag::list(inner)),
                "optional" => Ok(TypeTag::optional(inner)),
                other => Err(TagParseError::new(
                    s,
                    format!("unknown wrapper '{}' (expected list or optional)", other),
                )),
            };
        }

        let tag = match trimmed.to_ascii_lowercase().as_str() {
            "int" | "integer" => TypeTag::Integer,
            "float" => TypeTag::Float,
            "complex" => TypeTag::Complex,
            "bool" | "boolean" => TypeTag::Boolean,
            "str" | "string" => TypeTag::String,
            "bytes" => TypeTag::Bytes,
            _ => {
                let valid = trimmed
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'));
                if !valid || trimmed.starts_with(|c: char| c.is_ascii_digit()) {
                    return Err(TagParseError::new(s, "not an identifier"));
                }
                TypeTag::Custom(trimmed.to_string())
            }
        };
        Ok(tag)
    }
}

impl TryFrom<String> for TypeTag {
    type Error = TagParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.to_string()
    }
}
