//! Typed configuration behavior tests
//!
//! End-to-end population of schemas from an in-memory source: scalar and
//! list casts, optional fields, literal defaults, ignored names and cast
//! overrides.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::BTreeSet;
use std::path::PathBuf;
use typed_env_config::{
    extra, populate, BoxError, CastTable, Complex, ConfigError, ConfigInstance, ConfigLoader,
    MapSource, Schema, TypeTag, Value, ValueOrigin,
};

fn load(schema: Schema, source: MapSource) -> Result<ConfigInstance, ConfigError> {
    ConfigLoader::new(schema).source(source).load()
}

fn b64_decode(raw: &str) -> Result<Value, BoxError> {
    Ok(Value::Bytes(STANDARD.decode(raw)?))
}

// =============================================================================
// Scalars
// =============================================================================

#[test]
fn test_basic_scalars() {
    let schema = Schema::builder()
        .field("INTEGER", TypeTag::Integer)
        .field("FLOAT", TypeTag::Float)
        .field("COMPLEX", TypeTag::Complex)
        .field("BOOLEAN", TypeTag::Boolean)
        .field("STRING", TypeTag::String)
        .build();
    let source = MapSource::new()
        .with("INTEGER", "6")
        .with("FLOAT", "5.6")
        .with("COMPLEX", "3+4j")
        .with("BOOLEAN", "true")
        .with("STRING", "abcdefg");

    let config = load(schema, source).unwrap();

    assert_eq!(config.get("INTEGER"), Some(&Value::Integer(6)));
    assert_eq!(config.get("FLOAT"), Some(&Value::Float(5.6)));
    assert_eq!(
        config.get("COMPLEX"),
        Some(&Value::Complex(Complex::new(3.0, 4.0)))
    );
    assert_eq!(config.get("BOOLEAN"), Some(&Value::Boolean(true)));
    assert_eq!(config.get_str("STRING"), Some("abcdefg"));
}

#[test]
fn test_boolean_is_case_insensitive() {
    let schema = Schema::builder()
        .field("A", TypeTag::Boolean)
        .field("B", TypeTag::Boolean)
        .field("C", TypeTag::Boolean)
        .build();
    let source = MapSource::new().with("A", "TRUE").with("B", "0").with("C", "No");

    let config = load(schema, source).unwrap();

    assert_eq!(config.get_bool("A"), Some(true));
    assert_eq!(config.get_bool("B"), Some(false));
    assert_eq!(config.get_bool("C"), Some(false));
}

#[test]
fn test_cast_error_names_field() {
    let schema = Schema::builder()
        .field("INTEGER", TypeTag::Integer)
        .field("BOOLEAN", TypeTag::Boolean)
        .build();
    let source = MapSource::new().with("INTEGER", "6").with("BOOLEAN", "sometimes");

    let err = load(schema, source).unwrap_err();

    assert!(matches!(err, ConfigError::Cast { .. }));
    assert_eq!(err.field(), Some("BOOLEAN"));
    assert!(err.to_string().contains("sometimes"));
}

// =============================================================================
// Required and optional
// =============================================================================

#[test]
fn test_required_value_missing() {
    let schema = Schema::builder().field("MUST_HAVE", TypeTag::String).build();

    let err = load(schema, MapSource::new()).unwrap_err();

    assert_eq!(
        err.to_string(),
        "MUST_HAVE not found. Declare it as envvar or define a default value."
    );
}

#[test]
fn test_optional_defaults_to_none() {
    let schema = Schema::builder()
        .field("MAYBE", TypeTag::optional(TypeTag::Integer))
        .build();

    let config = load(schema.clone(), MapSource::new()).unwrap();
    assert_eq!(config.get("MAYBE"), Some(&Value::None));
    assert_eq!(config.source("MAYBE").unwrap().origin, ValueOrigin::Default);

    let config = load(schema, MapSource::new().with("MAYBE", "4")).unwrap();
    assert_eq!(config.get_i64("MAYBE"), Some(4));
}

#[test]
fn test_optional_empty_value_is_none() {
    let schema = Schema::builder()
        .field("MAYBE", TypeTag::optional(TypeTag::Integer))
        .build();

    let config = load(schema, MapSource::new().with("MAYBE", "")).unwrap();

    assert_eq!(config.get("MAYBE"), Some(&Value::None));
    assert_eq!(config.source("MAYBE").unwrap().origin, ValueOrigin::Memory);
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_string_default_is_cast() {
    let schema = Schema::builder()
        .field_with_default("DEFAULT", TypeTag::Float, "5.8")
        .build();

    let config = load(schema, MapSource::new()).unwrap();

    assert_eq!(config.get_f64("DEFAULT"), Some(5.8));
}

#[test]
fn test_source_overrides_default() {
    let schema = Schema::builder()
        .field_with_default("DEFAULT", TypeTag::Float, "5.8")
        .build();

    let config = load(schema, MapSource::new().with("DEFAULT", "2")).unwrap();

    assert_eq!(config.get_f64("DEFAULT"), Some(2.0));
}

#[test]
fn test_literal_default_used_as_is() {
    let schema = Schema::builder()
        .field_with_value("RATIO", TypeTag::Float, Value::Float(0.25))
        .build();

    let config = load(schema, MapSource::new()).unwrap();

    assert_eq!(config.get_f64("RATIO"), Some(0.25));
}

#[test]
fn test_invalid_string_default_is_a_cast_error() {
    let schema = Schema::builder()
        .field_with_default("PORT", TypeTag::Integer, "eighty")
        .build();

    let err = load(schema, MapSource::new()).unwrap_err();

    assert!(matches!(err, ConfigError::Cast { ref name, .. } if name == "PORT"));
}

// =============================================================================
// Lists
// =============================================================================

#[test]
fn test_list_of_floats() {
    let schema = Schema::builder()
        .field("FLOATS", TypeTag::list(TypeTag::Float))
        .build();

    let config = load(schema, MapSource::new().with("FLOATS", "2,3.6,7")).unwrap();

    assert_eq!(config.extract::<Vec<f64>>("FLOATS").unwrap(), vec![2.0, 3.6, 7.0]);
}

#[test]
fn test_optional_list_and_list_default() {
    let schema = Schema::builder()
        .field("MAYBE_STRINGS", TypeTag::optional(TypeTag::list(TypeTag::String)))
        .field_with_default("INTEGERS", TypeTag::list(TypeTag::Integer), " 4, 100, 12")
        .build();

    let config = load(schema, MapSource::new()).unwrap();

    assert_eq!(config.get("MAYBE_STRINGS"), Some(&Value::None));
    assert_eq!(config.extract::<Vec<i64>>("INTEGERS").unwrap(), vec![4, 100, 12]);
}

#[test]
fn test_list_of_booleans_and_strings() {
    let schema = Schema::builder()
        .field("FLAGS", TypeTag::list(TypeTag::Boolean))
        .field("NAMES", TypeTag::list(TypeTag::String))
        .build();
    let source = MapSource::new()
        .with("FLAGS", "yes, off,TRUE")
        .with("NAMES", "alpha, \"beta, gamma\",,delta,");

    let config = load(schema, source).unwrap();

    assert_eq!(
        config.extract::<Vec<bool>>("FLAGS").unwrap(),
        vec![true, false, true]
    );
    assert_eq!(
        config.extract::<Vec<String>>("NAMES").unwrap(),
        vec!["alpha", "beta, gamma", "delta"]
    );
}

// =============================================================================
// Ignored names
// =============================================================================

#[test]
fn test_ignored_names_are_never_fetched() {
    let schema = Schema::builder()
        .field_with_default("NORMAL_BYTES", TypeTag::Bytes, "hi")
        .field_with_value(
            "APP_PATH",
            TypeTag::custom("path"),
            Value::Path(PathBuf::from("/srv/app")),
        )
        .field("_NOTHING", TypeTag::Integer)
        .field("BIN64", TypeTag::Bytes)
        .build();
    // Values that would fail to cast prove the ignored fields are skipped.
    let source = MapSource::new()
        .with("_NOTHING", "not a number")
        .with("BIN64", "aGVsbG8gd29ybGQ=");

    let config = ConfigLoader::new(schema)
        .ignore(["APP_PATH", "BIN64"])
        .source(source)
        .preset("BIN64", Value::Bytes(b"hello world".to_vec()))
        .load()
        .unwrap();

    assert_eq!(config.get("NORMAL_BYTES"), Some(&Value::Bytes(b"hi".to_vec())));
    assert_eq!(
        config.extract::<PathBuf>("APP_PATH").unwrap(),
        PathBuf::from("/srv/app")
    );
    assert!(!config.contains("_NOTHING"));
    assert_eq!(config.get("BIN64"), Some(&Value::Bytes(b"hello world".to_vec())));
    assert_eq!(config.source("BIN64").unwrap().origin, ValueOrigin::Preset);
}

#[test]
fn test_ignored_field_with_unsupported_type_is_fine() {
    let schema = Schema::builder()
        .field("_PRIVATE", TypeTag::list(TypeTag::list(TypeTag::Integer)))
        .field("PORT", TypeTag::Integer)
        .build();

    let config = load(schema, MapSource::new().with("PORT", "1")).unwrap();

    assert_eq!(config.len(), 1);
}

// =============================================================================
// Cast overrides
// =============================================================================

#[test]
fn test_override_bytes_and_add_path() {
    let schema = Schema::builder()
        .field_with_default("SOMEWHERE", TypeTag::custom("path"), "/tmp")
        .field("BIN64", TypeTag::Bytes)
        .field("PLAIN", TypeTag::String)
        .build();
    let casts = CastTable::new()
        .with(TypeTag::custom("path"), extra::path)
        .with(TypeTag::Bytes, b64_decode);
    let source = MapSource::new()
        .with("BIN64", "aGVsbG8gd29ybGQ=")
        .with("PLAIN", "aGVsbG8=");

    let config = ConfigLoader::new(schema)
        .casts(casts)
        .source(source)
        .load()
        .unwrap();

    let somewhere = config.extract::<PathBuf>("SOMEWHERE").unwrap();
    assert_eq!(somewhere.file_name().unwrap(), "tmp");
    assert_eq!(
        config.extract::<Vec<u8>>("BIN64").unwrap(),
        b"hello world".to_vec()
    );
    // Unaffected tags keep builtin behavior.
    assert_eq!(config.get_str("PLAIN"), Some("aGVsbG8="));
}

#[test]
fn test_unregistered_custom_type_fails() {
    let schema = Schema::builder()
        .field_with_default("SOMEWHERE", TypeTag::custom("path"), "/tmp")
        .build();

    let err = load(schema, MapSource::new()).unwrap_err();

    assert!(matches!(err, ConfigError::UnsupportedType { .. }));
    assert_eq!(err.field(), Some("SOMEWHERE"));
}

// =============================================================================
// populate() directly
// =============================================================================

#[test]
fn test_populate_returns_same_instance_with_presets() {
    let schema = Schema::builder().field("PORT", TypeTag::Integer).build();
    let instance = ConfigInstance::new().with_preset("EXTRA", Value::Integer(1));

    let instance = populate(
        instance,
        &schema,
        &CastTable::new(),
        &BTreeSet::new(),
        &MapSource::new().with("PORT", "8080"),
    )
    .unwrap();

    assert_eq!(instance.names().collect::<Vec<_>>(), vec!["EXTRA", "PORT"]);
}
