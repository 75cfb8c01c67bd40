// Copyright (c) 2025 - Cowboy AI, Inc.
//! Directed envelope decoding
//!
//! The caller names the event type (from the channel it listens on, or an
//! `event_type` it has already read); the decoder never picks a type by
//! looking inside the document. The `event_type` field of the input, if any,
//! is ignored.

use serde_json::Value;

use super::catalog::{self, EventType, SystemEvent, TypedEvent};
use super::envelope::Envelope;
use super::versioning::{get_schema_version, UpcastError, Upcaster, Upcasters};
use crate::config::DecodeConfig;
use crate::errors::{Constraint, FieldViolation, SchemaError, SchemaResult, ValidationError};

/// Decodes envelopes under a version policy, upcasting where registered
#[derive(Debug, Default)]
pub struct EventDecoder {
    config: DecodeConfig,
    upcasters: Upcasters,
}

impl EventDecoder {
    pub fn new(config: DecodeConfig) -> Self {
        Self {
            config,
            upcasters: Upcasters::new(),
        }
    }

    /// Register an upcaster for its event type
    pub fn with_upcaster<U: Upcaster + 'static>(mut self, upcaster: U) -> Self {
        self.upcasters.register(upcaster);
        self
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode `value` as the typed event `E`
    pub fn decode<E: TypedEvent>(&self, value: Value) -> SchemaResult<E> {
        let value = self.settle_version(E::EVENT_TYPE, value)?;
        let envelope = Envelope::<E::Payload>::decode(value)?;
        tracing::debug!(event_type = %E::EVENT_TYPE, event_id = %envelope.event_id(), "envelope decoded");
        Ok(E::from_envelope(envelope))
    }

    /// Decode `value` as the envelope of `event_type`
    pub fn decode_as(&self, event_type: EventType, value: Value) -> SchemaResult<SystemEvent> {
        let value = self.settle_version(event_type, value)?;
        let event = catalog::decode_envelope(event_type, value)?;
        tracing::debug!(event_type = %event_type, event_id = %event.event_id(), "envelope decoded");
        Ok(event)
    }

    /// Parse `text` as JSON, then [`decode_as`](Self::decode_as) the named type
    pub fn decode_str_as(&self, event_type: &str, text: &str) -> SchemaResult<SystemEvent> {
        let event_type: EventType = event_type.parse()?;
        let value: Value = serde_json::from_str(text)?;
        self.decode_as(event_type, value)
    }

    /// Bring `value` to a version this decoder accepts, or refuse it
    fn settle_version(&self, event_type: EventType, value: Value) -> SchemaResult<Value> {
        if !value.is_object() {
            return Err(SchemaError::Malformed(
                "expected a JSON object envelope".to_string(),
            ));
        }

        let version = get_schema_version(&value).map_err(|err| match err {
            UpcastError::InvalidFieldValue { field, reason } => SchemaError::Validation(
                ValidationError::single(FieldViolation::new(field, Constraint::Type, reason)),
            ),
            other => SchemaError::Upcast(other),
        })?;

        if self.config.accepts(event_type, &version) {
            return Ok(value);
        }

        let unsupported = || SchemaError::UnsupportedSchemaVersion {
            event_type: event_type.to_string(),
            schema_version: version.to_string(),
        };

        let Some(chain) = self.upcasters.chain(event_type) else {
            return Err(unsupported());
        };
        match chain.upcast_until(value, &version, |v| self.config.accepts(event_type, v))? {
            Some((value, reached)) => {
                tracing::debug!(event_type = %event_type, from = %version, to = %reached, "envelope upcast");
                Ok(value)
            }
            None => Err(unsupported()),
        }
    }
}
