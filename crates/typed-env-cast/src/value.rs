//! Resolved configuration values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A complex number with `f64` parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.re == 0.0 && self.re.is_sign_positive() {
            return write!(f, "{}j", self.im);
        }
        let sign = if self.im.is_sign_negative() { '-' } else { '+' };
        write!(f, "({}{}{}j)", self.re, sign, self.im.abs())
    }
}

/// Error parsing a complex literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("complex() arg is a malformed string")]
pub struct ComplexParseError;

impl FromStr for Complex {
    type Err = ComplexParseError;

    /// Parses `3+4j`, `4j`, `-1.5e3-2J`, `j`, `3` and the same forms
    /// wrapped in parentheses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut body = s.trim();
        if let Some(inner) = body.strip_prefix('(') {
            body = inner.strip_suffix(')').ok_or(ComplexParseError)?.trim();
        }
        if body.is_empty() {
            return Err(ComplexParseError);
        }

        let Some(imag) = body.strip_suffix(&['j', 'J'][..]) else {
            let re = parse_part(body)?;
            return Ok(Complex::new(re, 0.0));
        };

        // The split point is the last sign that is not an exponent sign.
        let bytes = imag.as_bytes();
        let split = (1..bytes.len()).rev().find(|&i| {
            matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E')
        });

        match split {
            Some(i) => {
                let re = parse_part(&imag[..i])?;
                let im = parse_imaginary(&imag[i..])?;
                Ok(Complex::new(re, im))
            }
            None => Ok(Complex::new(0.0, parse_imaginary(imag)?)),
        }
    }
}

fn parse_part(s: &str) -> Result<f64, ComplexParseError> {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return Err(ComplexParseError);
    }
    s.parse().map_err(|_| ComplexParseError)
}

fn parse_imaginary(s: &str) -> Result<f64, ComplexParseError> {
    match s {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        other => parse_part(other),
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Complex(Complex),
    Boolean(bool),
    String(String),
    Bytes(Vec<u8>),
    Path(PathBuf),
    List(Vec<Value>),
    None,
}

impl Value {
    /// Short name of the variant, used in type mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Boolean(_) => "bool",
            Value::String(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Path(_) => "path",
            Value::List(_) => "list",
            Value::None => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Complex(c) => write!(f, "{}", c),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::None => write!(f, "None"),
        }
    }
}

/// JSON-friendly rendering: complex numbers as strings, bytes as standard
/// base64, paths as strings, `None` as null.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Complex(c) => serializer.collect_str(c),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&STANDARD.encode(b)),
            Value::Path(p) => serializer.collect_str(&p.display()),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::None => serializer.serialize_none(),
        }
    }
}
