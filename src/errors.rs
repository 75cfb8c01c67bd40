// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for schema construction, encoding and decoding
//!
//! Every fallible operation in this crate returns [`SchemaResult`]. Errors are
//! handed back to the caller untouched; nothing here logs, retries or falls
//! back to a different type.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::versioning::UpcastError;

/// Errors that can occur while building, encoding or decoding schema types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// One or more field constraints were violated
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The `observation_type` value has no entry in the stream-type registry
    #[error("Unknown stream type: {value}")]
    UnknownDiscriminator { value: String },

    /// The name is not an event type in the catalog
    #[error("Unknown event type: {value}")]
    UnknownEventType { value: String },

    /// The consumer does not know how to interpret this schema version
    #[error("Unsupported schema version {schema_version} for {event_type}")]
    UnsupportedSchemaVersion {
        event_type: String,
        schema_version: String,
    },

    /// Input is not parseable as JSON, or configuration text is malformed
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Encoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A registered upcaster rejected the document
    #[error("Upcast failed: {0}")]
    Upcast(#[from] UpcastError),
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => SchemaError::Serialization(err.to_string()),
            serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                SchemaError::Malformed(err.to_string())
            }
            serde_json::error::Category::Data => {
                SchemaError::Validation(ValidationError::single(FieldViolation::new(
                    "",
                    Constraint::Type,
                    err.to_string(),
                )))
            }
        }
    }
}

/// Kind of constraint a field violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Field is missing or null
    Required,
    /// Numeric value outside its allowed interval
    Range,
    /// String or collection length outside its allowed interval
    Length,
    /// String does not match the required pattern
    Pattern,
    /// Value has the wrong JSON type or cannot be parsed
    Type,
    /// Any other rule
    Custom,
}

impl Constraint {
    /// Map a `validator` error code onto a constraint kind
    pub fn from_code(code: &str) -> Self {
        match code {
            "range" => Constraint::Range,
            "length" => Constraint::Length,
            "regex" => Constraint::Pattern,
            "required" => Constraint::Required,
            _ => Constraint::Custom,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Constraint::Required => "required",
            Constraint::Range => "range",
            Constraint::Length => "length",
            Constraint::Pattern => "pattern",
            Constraint::Type => "type",
            Constraint::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// A single violated constraint, located by a dotted field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field (`location.lat`, `configurations[0].action.value`)
    pub path: String,

    /// Which constraint was violated
    pub constraint: Constraint,

    /// Human-readable explanation
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            constraint,
            message: message.into(),
        }
    }

    /// Shorthand for a missing required field
    pub fn required(path: impl Into<String>) -> Self {
        Self::new(path, Constraint::Required, "field required")
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.constraint, self.message)
        } else {
            write!(f, "{}: [{}] {}", self.path, self.constraint, self.message)
        }
    }
}

/// Report of every constraint an input violated
///
/// Never empty: an input either validates completely or yields a report
/// listing all violations found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Build a report, returning `None` when there is nothing to report
    pub fn from_violations(violations: Vec<FieldViolation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// First violation reported against `path`, if any
    pub fn violation_at(&self, path: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.path == path)
    }

    /// Whether any violation was reported against `path`
    pub fn has_violation_at(&self, path: &str) -> bool {
        self.violation_at(path).is_some()
    }

    /// Re-root every violation under `prefix` (used for nested payloads)
    pub fn prefixed(mut self, prefix: &str) -> Self {
        if prefix.is_empty() {
            return self;
        }
        for violation in &mut self.violations {
            violation.path = if violation.path.is_empty() {
                prefix.to_string()
            } else {
                format!("{}.{}", prefix, violation.path)
            };
        }
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s): ", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations = Vec::new();
        flatten_validator_errors(&errors, "", &mut violations);
        // Stable order regardless of the HashMap iteration inside `validator`
        violations.sort_by(|a, b| a.path.cmp(&b.path));
        Self { violations }
    }
}

fn flatten_validator_errors(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut Vec<FieldViolation>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let field = field.to_string();
        let field = field.trim_start_matches("r#");
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| describe_validator_error(error));
                    out.push(FieldViolation::new(
                        path.clone(),
                        Constraint::from_code(&error.code),
                        message,
                    ));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                flatten_validator_errors(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten_validator_errors(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn describe_validator_error(error: &validator::ValidationError) -> String {
    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match &*error.code {
        "range" => format!(
            "value {} outside [{}, {}]",
            param("value").unwrap_or_default(),
            param("min").unwrap_or_else(|| "-inf".to_string()),
            param("max").unwrap_or_else(|| "inf".to_string()),
        ),
        "length" => format!(
            "length outside [{}, {}]",
            param("min").unwrap_or_else(|| "0".to_string()),
            param("max").unwrap_or_else(|| "inf".to_string()),
        ),
        "regex" => "does not match the required pattern".to_string(),
        code => format!("failed {} check", code),
    }
}
