//! Type-directed casting of raw setting strings.
//!
//! A [`TypeTag`] names the value domain of a configuration field. A
//! [`CastTable`] resolves a tag into a [`Cast`] that turns the raw string of
//! a setting into a typed [`Value`]:
//!
//! - scalars: `int`, `float`, `complex`, `bool`, `str`, `bytes`
//! - `list[T]`: comma-separated, each element cast as `T`
//! - `optional[T]`: empty input becomes `Value::None`
//!
//! Callers extend or replace casts per tag, including custom tags such as
//! `path`.

mod cast;
mod csv;
mod tag;
mod table;
mod value;

pub use cast::{cast_fn, extra, BoxError, Cast, CastError, CastFn};
pub use csv::{split_csv, CsvError};
pub use table::{resolve, CastTable, UnsupportedType};
pub use tag::{TagParseError, TypeTag};
pub use value::{Complex, ComplexParseError, Value};
