// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event envelope
//!
//! An [`Envelope`] wraps a typed payload with identity, creation time and
//! schema version. It is built once by the producing service and never
//! mutated afterwards. The `event_type` tag is not part of the envelope
//! state: it belongs to the concrete event kind and is written only when the
//! event is serialized (see [`catalog`](super::catalog)).

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use super::catalog::EventType;
use super::versioning::SchemaVersion;
use crate::clock::{Clock, IdGenerator, RandomIds, SystemClock};
use crate::domain::timestamp;
use crate::errors::{Constraint, FieldViolation, SchemaError, SchemaResult, ValidationError};
use crate::validation::{self, Schema};

/// Identity, time and version around a payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<P> {
    event_id: Uuid,

    #[serde(with = "timestamp::utc")]
    timestamp: DateTime<Utc>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    schema_version: SchemaVersion,

    payload: P,
}

impl<P> Envelope<P> {
    /// Assemble an envelope from explicit parts
    pub fn from_parts(
        event_id: Uuid,
        timestamp: DateTime<Utc>,
        schema_version: SchemaVersion,
        payload: P,
    ) -> Self {
        Self {
            event_id,
            timestamp,
            schema_version,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn schema_version(&self) -> &SchemaVersion {
        &self.schema_version
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<P: Schema> Envelope<P> {
    /// Decode a raw envelope whose payload type is already known
    ///
    /// The version is not checked here; see [`EventDecoder`](super::EventDecoder).
    pub(crate) fn decode(value: Value) -> SchemaResult<Self> {
        if !value.is_object() {
            return Err(SchemaError::Malformed(
                "expected a JSON object envelope".to_string(),
            ));
        }

        let mut violations = Vec::new();
        check_envelope_shape::<P>(&value, &mut violations);
        if let Some(report) = ValidationError::from_violations(violations) {
            return Err(report.into());
        }

        let envelope: Self = serde_json::from_value(value)?;
        validation::validate(&envelope.payload).map_err(|err| match err {
            SchemaError::Validation(report) => report.prefixed("payload").into(),
            other => other,
        })?;
        Ok(envelope)
    }
}

fn check_envelope_shape<P: Schema>(value: &Value, out: &mut Vec<FieldViolation>) {
    let Some(fields) = validation::expect_object(value, "", out) else {
        return;
    };

    if let Some(id) = validation::check_string(fields, "", "event_id", true, out) {
        if Uuid::parse_str(id).is_err() {
            out.push(FieldViolation::new(
                "event_id",
                Constraint::Type,
                "expected a UUID",
            ));
        }
    }
    validation::check_timestamp(fields, "", "timestamp", true, out);
    validation::check_string(fields, "", "schema_version", false, out);
    validation::check_nested::<P>(fields, "", "payload", true, out);
}

/// Write an envelope with its `event_type` tag appended
pub(crate) fn serialize_tagged<S, P>(
    envelope: &Envelope<P>,
    event_type: EventType,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    P: Serialize,
{
    let mut state = serializer.serialize_struct("Envelope", 5)?;
    state.serialize_field("event_id", &envelope.event_id)?;
    state.serialize_field("timestamp", &timestamp::format(&envelope.timestamp))?;
    state.serialize_field("schema_version", &envelope.schema_version)?;
    state.serialize_field("payload", &envelope.payload)?;
    state.serialize_field("event_type", event_type.as_str())?;
    state.end()
}

/// Builds envelopes from injected time and identifier sources
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use gundi_core::clock::{FixedClock, SequentialIds};
/// use gundi_core::events::EnvelopeFactory;
///
/// let factory = EnvelopeFactory::new(
///     FixedClock(Utc.with_ymd_and_hms(2023, 6, 23, 19, 1, 2).unwrap()),
///     SequentialIds::starting_at(1),
/// );
/// let envelope = factory.envelope("payload");
/// assert_eq!(envelope.schema_version().as_str(), "v1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvelopeFactory<C = SystemClock, G = RandomIds> {
    clock: C,
    ids: G,
}

impl EnvelopeFactory<SystemClock, RandomIds> {
    /// Wall clock and random UUIDs
    pub fn system() -> Self {
        Self {
            clock: SystemClock,
            ids: RandomIds,
        }
    }
}

impl<C: Clock, G: IdGenerator> EnvelopeFactory<C, G> {
    pub fn new(clock: C, ids: G) -> Self {
        Self { clock, ids }
    }

    /// Wrap `payload` at the default schema version
    pub fn envelope<P>(&self, payload: P) -> Envelope<P> {
        self.envelope_at(SchemaVersion::default(), payload)
    }

    /// Wrap `payload` at an explicit schema version
    pub fn envelope_at<P>(&self, schema_version: SchemaVersion, payload: P) -> Envelope<P> {
        Envelope {
            event_id: self.ids.next_id(),
            timestamp: self.clock.now(),
            schema_version,
            payload,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ids(&self) -> &G {
        &self.ids
    }
}
