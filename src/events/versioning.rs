// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schema Versioning
//!
//! Every envelope carries an opaque `schema_version` (default `"v1"`). A
//! consumer decodes an envelope only when it accepts that version for the
//! envelope's event type; anything else is refused with
//! [`SchemaError::UnsupportedSchemaVersion`](crate::errors::SchemaError).
//!
//! Older documents can still be read when the consumer has explicitly
//! registered upcasters for that event type. Upcasters work on the raw JSON
//! envelope before it is decoded:
//!
//! ```text
//! Raw JSON → schema_version? ──accepted──────────────→ decode
//!                  │
//!                  └─not accepted→ registered chain? → v1 → v2 → ... → decode
//!                                        │
//!                                        └─none→ UnsupportedSchemaVersion
//! ```
//!
//! # Example
//!
//! ```rust
//! use gundi_core::events::versioning::*;
//! use gundi_core::events::EventType;
//!
//! struct DeletionDetailsV0ToV1;
//!
//! impl Upcaster for DeletionDetailsV0ToV1 {
//!     fn event_type(&self) -> EventType { EventType::IntegrationDeleted }
//!     fn from_version(&self) -> SchemaVersion { SchemaVersion::new("v0") }
//!     fn to_version(&self) -> SchemaVersion { SchemaVersion::new("v1") }
//!
//!     fn upcast(&self, mut value: serde_json::Value) -> Result<serde_json::Value, UpcastError> {
//!         let payload = value
//!             .get_mut("payload")
//!             .and_then(|p| p.as_object_mut())
//!             .ok_or_else(|| UpcastError::MissingField("payload".to_string()))?;
//!         let id = payload
//!             .remove("integration_id")
//!             .ok_or_else(|| UpcastError::MissingField("payload.integration_id".to_string()))?;
//!         payload.insert("id".to_string(), id);
//!         Ok(value)
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::EventType;

/// Opaque schema version tag (`"v1"`, `"v2"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    /// Version assigned when none is given
    pub const DEFAULT: &'static str = "v1";

    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of a `vN` tag
    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix('v')?.parse().ok()
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SchemaVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for SchemaVersion {
    fn from(version: &str) -> Self {
        Self::new(version)
    }
}

/// Error type for upcasting operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpcastError {
    /// Document version does not match what the upcaster expects
    UnexpectedVersion {
        expected: SchemaVersion,
        found: SchemaVersion,
    },

    /// No registered path leads from `from` to `to`
    NoPath { from: SchemaVersion, to: SchemaVersion },

    /// JSON transformation failed
    TransformationFailed(String),

    /// Missing required field in old version
    MissingField(String),

    /// Invalid field value that cannot be migrated
    InvalidFieldValue { field: String, reason: String },
}

impl fmt::Display for UpcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpcastError::UnexpectedVersion { expected, found } => {
                write!(f, "Upcaster expects schema version {}, got {}", expected, found)
            }
            UpcastError::NoPath { from, to } => {
                write!(f, "No upcaster path from schema version {} to {}", from, to)
            }
            UpcastError::TransformationFailed(msg) => {
                write!(f, "Envelope transformation failed: {}", msg)
            }
            UpcastError::MissingField(field) => {
                write!(f, "Required field '{}' missing in old schema version", field)
            }
            UpcastError::InvalidFieldValue { field, reason } => {
                write!(f, "Invalid value in field '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for UpcastError {}

/// Migrates a raw envelope of one event type between two schema versions
///
/// The chain rewrites `schema_version` after each step, so implementations
/// only need to reshape the document.
pub trait Upcaster: Send + Sync {
    /// Event type this upcaster applies to
    fn event_type(&self) -> EventType;

    /// Version this upcaster expects as input
    fn from_version(&self) -> SchemaVersion;

    /// Version this upcaster produces as output
    fn to_version(&self) -> SchemaVersion;

    /// Reshape the envelope JSON from `from_version` to `to_version`
    fn upcast(&self, value: serde_json::Value) -> Result<serde_json::Value, UpcastError>;

    /// Post-condition check on the reshaped document
    fn validate(&self, _value: &serde_json::Value) -> Result<(), UpcastError> {
        Ok(())
    }
}

/// Ordered chain of upcasters for a single event type
#[derive(Default)]
pub struct UpcasterChain {
    upcasters: Vec<Box<dyn Upcaster>>,
}

impl UpcasterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an upcaster; add them in version order (v1→v2, then v2→v3)
    pub fn add<U: Upcaster + 'static>(&mut self, upcaster: U) {
        self.upcasters.push(Box::new(upcaster));
    }

    pub fn len(&self) -> usize {
        self.upcasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upcasters.is_empty()
    }

    /// Latest version this chain can produce
    pub fn latest_version(&self) -> Option<SchemaVersion> {
        self.upcasters.last().map(|u| u.to_version())
    }

    /// Walk the chain from `current` until `accepts` says stop
    ///
    /// Returns the reshaped document and the version it ended at, or
    /// `None` when no sequence of registered steps reaches an accepted version.
    pub fn upcast_until<F>(
        &self,
        mut value: serde_json::Value,
        current: &SchemaVersion,
        accepts: F,
    ) -> Result<Option<(serde_json::Value, SchemaVersion)>, UpcastError>
    where
        F: Fn(&SchemaVersion) -> bool,
    {
        let mut version = current.clone();

        for upcaster in &self.upcasters {
            if accepts(&version) {
                break;
            }
            if version == upcaster.from_version() {
                value = self.step(upcaster.as_ref(), value)?;
                version = upcaster.to_version();
            }
        }

        if accepts(&version) {
            Ok(Some((value, version)))
        } else {
            Ok(None)
        }
    }

    /// Upcast to a specific target version
    pub fn upcast_to_version(
        &self,
        value: serde_json::Value,
        current: &SchemaVersion,
        target: &SchemaVersion,
    ) -> Result<serde_json::Value, UpcastError> {
        self.upcast_until(value, current, |v| v == target)?
            .map(|(value, _)| value)
            .ok_or_else(|| UpcastError::NoPath {
                from: current.clone(),
                to: target.clone(),
            })
    }

    fn step(
        &self,
        upcaster: &dyn Upcaster,
        value: serde_json::Value,
    ) -> Result<serde_json::Value, UpcastError> {
        let found = get_schema_version(&value)?;
        if found != upcaster.from_version() {
            return Err(UpcastError::UnexpectedVersion {
                expected: upcaster.from_version(),
                found,
            });
        }

        let mut value = upcaster.upcast(value)?;
        set_schema_version(&mut value, &upcaster.to_version())?;
        upcaster.validate(&value)?;

        tracing::debug!(
            event_type = %upcaster.event_type(),
            from = %upcaster.from_version(),
            to = %upcaster.to_version(),
            "upcast applied"
        );
        Ok(value)
    }
}

impl fmt::Debug for UpcasterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self
            .upcasters
            .iter()
            .map(|u| format!("{}→{}", u.from_version(), u.to_version()))
            .collect();
        f.debug_struct("UpcasterChain").field("steps", &steps).finish()
    }
}

/// Registered upcaster chains, keyed by event type
#[derive(Debug, Default)]
pub struct Upcasters {
    chains: BTreeMap<EventType, UpcasterChain>,
}

impl Upcasters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an upcaster under its own event type
    pub fn register<U: Upcaster + 'static>(&mut self, upcaster: U) {
        self.chains
            .entry(upcaster.event_type())
            .or_default()
            .add(upcaster);
    }

    pub fn chain(&self, event_type: EventType) -> Option<&UpcasterChain> {
        self.chains.get(&event_type)
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Read `schema_version` from a raw envelope (absent or null means the default)
pub fn get_schema_version(value: &serde_json::Value) -> Result<SchemaVersion, UpcastError> {
    match value.get("schema_version") {
        None | Some(serde_json::Value::Null) => Ok(SchemaVersion::default()),
        Some(serde_json::Value::String(version)) => Ok(SchemaVersion::new(version.as_str())),
        Some(other) => Err(UpcastError::InvalidFieldValue {
            field: "schema_version".to_string(),
            reason: format!("expected a string, found {}", other),
        }),
    }
}

/// Overwrite `schema_version` in a raw envelope
pub fn set_schema_version(
    value: &mut serde_json::Value,
    version: &SchemaVersion,
) -> Result<(), UpcastError> {
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "schema_version".to_string(),
            serde_json::Value::String(version.to_string()),
        );
        Ok(())
    } else {
        Err(UpcastError::TransformationFailed(
            "Envelope is not a JSON object".to_string(),
        ))
    }
}
