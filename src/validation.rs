// Copyright (c) 2025 - Cowboy AI, Inc.
//! All-or-nothing decoding of untyped input
//!
//! Decoding runs in three passes over a JSON document:
//!
//! ```text
//! raw JSON → shape pass → typed decode (serde) → constraint pass (validator)
//!              ↓                  ↓                      ↓
//!       Required / Type      Type mismatch        Range / Length / Pattern
//! ```
//!
//! The shape pass walks the raw document and records every missing required
//! field and every wrongly typed value before anything is decoded, so callers
//! get one report listing all problems rather than the first one serde trips
//! over. An instance is only handed back once every pass is clean.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::{self, timestamp};
use crate::errors::{Constraint, FieldViolation, SchemaError, SchemaResult, ValidationError};

/// A type that can be decoded from untrusted JSON
///
/// `check_shape` inspects the raw value; the derived `Validate` impl checks
/// constraints on the decoded instance.
pub trait Schema: DeserializeOwned + Validate {
    /// Record structural violations of `value` found under `path`
    fn check_shape(_value: &Value, _path: &str, _out: &mut Vec<FieldViolation>) {}
}

/// Decode and validate `value` as `T`
pub fn decode<T: Schema>(value: Value) -> SchemaResult<T> {
    if !value.is_object() {
        return Err(SchemaError::Malformed(format!(
            "expected a JSON object, found {}",
            json_type(&value)
        )));
    }

    let mut violations = Vec::new();
    T::check_shape(&value, "", &mut violations);
    if let Some(report) = ValidationError::from_violations(violations) {
        return Err(report.into());
    }

    let instance: T = serde_json::from_value(value)?;
    instance.validate().map_err(ValidationError::from)?;

    tracing::trace!(schema = std::any::type_name::<T>(), "decoded");
    Ok(instance)
}

/// Parse `text` as JSON, then [`decode`] it
pub fn decode_str<T: Schema>(text: &str) -> SchemaResult<T> {
    let value: Value = serde_json::from_str(text)?;
    decode(value)
}

/// Re-run constraint checks on an instance built in code
pub fn validate<T: Validate>(instance: &T) -> SchemaResult<()> {
    instance.validate().map_err(ValidationError::from)?;
    Ok(())
}

/// Encode any schema value to JSON
pub fn encode<T: serde::Serialize>(instance: &T) -> SchemaResult<Value> {
    serde_json::to_value(instance).map_err(|e| SchemaError::Serialization(e.to_string()))
}

/// `deserialize_with` for fields where `null` means "use the default"
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Shape helpers
// ---------------------------------------------------------------------------

/// Dotted child path
pub fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_violation(path: String, expected: &str, found: &Value) -> FieldViolation {
    FieldViolation::new(
        path,
        Constraint::Type,
        format!("expected {}, found {}", expected, json_type(found)),
    )
}

/// Object at `path`, or a `Type` violation
pub fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    out: &mut Vec<FieldViolation>,
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(fields) => Some(fields),
        other => {
            out.push(type_violation(path.to_string(), "an object", other));
            None
        }
    }
}

/// Non-null field value; records `Required` when `required` and absent
fn lookup<'a>(
    fields: &'a Map<String, Value>,
    path: &str,
    field: &str,
    required: bool,
    out: &mut Vec<FieldViolation>,
) -> Option<&'a Value> {
    match fields.get(field) {
        Some(Value::Null) | None => {
            if required {
                out.push(FieldViolation::required(join(path, field)));
            }
            None
        }
        Some(value) => Some(value),
    }
}

/// Required field that may hold anything non-null
pub fn require<'a>(
    fields: &'a Map<String, Value>,
    path: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) -> Option<&'a Value> {
    lookup(fields, path, field, true, out)
}

/// Key must be present, though `null` is allowed
pub fn require_key(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) {
    if !fields.contains_key(field) {
        out.push(FieldViolation::required(join(path, field)));
    }
}

/// Field may be absent but must not be `null`
pub fn check_non_null(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) {
    if let Some(Value::Null) = fields.get(field) {
        out.push(type_violation(join(path, field), "a value", &Value::Null));
    }
}

pub fn check_string<'a>(
    fields: &'a Map<String, Value>,
    path: &str,
    field: &str,
    required: bool,
    out: &mut Vec<FieldViolation>,
) -> Option<&'a str> {
    let value = lookup(fields, path, field, required, out)?;
    match value.as_str() {
        Some(text) => Some(text),
        None => {
            out.push(type_violation(join(path, field), "a string", value));
            None
        }
    }
}

pub fn check_bool(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) {
    if let Some(value) = lookup(fields, path, field, false, out) {
        if !value.is_boolean() {
            out.push(type_violation(join(path, field), "a boolean", value));
        }
    }
}

pub fn check_number(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    required: bool,
    out: &mut Vec<FieldViolation>,
) -> Option<f64> {
    let value = lookup(fields, path, field, required, out)?;
    match value.as_f64() {
        Some(number) => Some(number),
        None => {
            out.push(type_violation(join(path, field), "a number", value));
            None
        }
    }
}

/// Optional integer field
pub fn check_integer(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) {
    if let Some(value) = lookup(fields, path, field, false, out) {
        if value.as_i64().is_none() {
            out.push(type_violation(join(path, field), "an integer", value));
        }
    }
}

/// Free-form map field
pub fn check_map(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    required: bool,
    out: &mut Vec<FieldViolation>,
) {
    if let Some(value) = lookup(fields, path, field, required, out) {
        if !value.is_object() {
            out.push(type_violation(join(path, field), "an object", value));
        }
    }
}

/// Instant in any accepted timestamp form
pub fn check_timestamp(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    required: bool,
    out: &mut Vec<FieldViolation>,
) {
    if let Some(value) = lookup(fields, path, field, required, out) {
        if let Err(err) = timestamp::from_json(value) {
            out.push(FieldViolation::new(join(path, field), Constraint::Type, err.to_string()));
        }
    }
}

/// UUID-or-string identifier (integers are tolerated as legacy ids)
pub fn check_identifier(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    required: bool,
    out: &mut Vec<FieldViolation>,
) {
    if let Some(value) = lookup(fields, path, field, required, out) {
        let ok = value.is_string() || value.is_i64() || value.is_u64();
        if !ok {
            out.push(type_violation(join(path, field), "a UUID or string", value));
        }
    }
}

/// Optional natural key: type, length and pattern when present
pub fn check_natural_key(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) {
    let Some(text) = check_string(fields, path, field, false, out) else {
        return;
    };
    let (min, max) = domain::NATURAL_KEY_LENGTH;
    let len = text.chars().count() as u64;
    if !(min..=max).contains(&len) {
        out.push(FieldViolation::new(
            join(path, field),
            Constraint::Length,
            format!("length {} outside [{}, {}]", len, min, max),
        ));
    }
    if !domain::NATURAL_KEY.is_match(text) {
        out.push(FieldViolation::new(
            join(path, field),
            Constraint::Pattern,
            format!("must match {}", domain::NATURAL_KEY.as_str()),
        ));
    }
}

/// Nested schema value
pub fn check_nested<T: Schema>(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    required: bool,
    out: &mut Vec<FieldViolation>,
) {
    if let Some(value) = lookup(fields, path, field, required, out) {
        T::check_shape(value, &join(path, field), out);
    }
}

/// List of nested schema values
pub fn check_list<T: Schema>(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    required: bool,
    out: &mut Vec<FieldViolation>,
) {
    let Some(value) = lookup(fields, path, field, required, out) else {
        return;
    };
    let Some(items) = value.as_array() else {
        out.push(type_violation(join(path, field), "an array", value));
        return;
    };
    for (index, item) in items.iter().enumerate() {
        T::check_shape(item, &format!("{}[{}]", join(path, field), index), out);
    }
}

/// List of strings
pub fn check_string_list(
    fields: &Map<String, Value>,
    path: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) {
    let Some(value) = lookup(fields, path, field, false, out) else {
        return;
    };
    let Some(items) = value.as_array() else {
        out.push(type_violation(join(path, field), "an array", value));
        return;
    };
    for (index, item) in items.iter().enumerate() {
        if !item.is_string() {
            out.push(type_violation(
                format!("{}[{}]", join(path, field), index),
                "a string",
                item,
            ));
        }
    }
}
