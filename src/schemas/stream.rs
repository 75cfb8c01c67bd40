// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stream types and the entity registry
//!
//! Every entity carries an `observation_type` discriminator fixed by its Rust
//! type. Decoding untyped input reads that discriminator, looks it up in an
//! explicit registry, and validates the rest of the document against the
//! matching entity schema. Unknown discriminators are refused outright.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::attachment::Attachment;
use super::base::{GundiBase, GundiEntity};
use super::event::Event;
use super::observation::Observation;
use crate::errors::{Constraint, FieldViolation, SchemaError, SchemaResult, ValidationError};
use crate::validation;

/// Wire discriminator of an entity stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StreamType {
    #[serde(rename = "obv")]
    Observation,
    #[serde(rename = "obvu")]
    ObservationUpdate,
    #[serde(rename = "ev")]
    Event,
    #[serde(rename = "evu")]
    EventUpdate,
    #[serde(rename = "att")]
    Attachment,
}

impl StreamType {
    pub const ALL: [StreamType; 5] = [
        StreamType::Observation,
        StreamType::ObservationUpdate,
        StreamType::Event,
        StreamType::EventUpdate,
        StreamType::Attachment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamType::Observation => "obv",
            StreamType::ObservationUpdate => "obvu",
            StreamType::Event => "ev",
            StreamType::EventUpdate => "evu",
            StreamType::Attachment => "att",
        }
    }

    /// Whether an entity schema is registered for this stream type
    pub fn is_registered(&self) -> bool {
        REGISTERED.contains(self)
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StreamType::ALL
            .into_iter()
            .find(|stream| stream.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownDiscriminator {
                value: s.to_string(),
            })
    }
}

/// Stream types with an entity schema
///
/// `obvu` and `evu` are known prefixes but are not dispatched here. Event
/// updates are decoded as [`EventUpdate`](super::EventUpdate) directly by
/// callers that expect them.
pub const REGISTERED: [StreamType; 3] = [
    StreamType::Observation,
    StreamType::Event,
    StreamType::Attachment,
];

/// An entity type with a fixed discriminator
pub trait StreamEntity {
    const STREAM_TYPE: StreamType;
}

/// Zero-sized `observation_type` field
///
/// Always encodes as `E::STREAM_TYPE`. Whatever the input holds for this
/// field is read and discarded, so the tag cannot be overridden.
pub struct StreamTag<E>(PhantomData<fn() -> E>);

impl<E> StreamTag<E> {
    pub fn new() -> Self {
        StreamTag(PhantomData)
    }
}

impl<E: StreamEntity> StreamTag<E> {
    pub fn stream_type(&self) -> StreamType {
        E::STREAM_TYPE
    }
}

impl<E> Default for StreamTag<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for StreamTag<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for StreamTag<E> {}

impl<E> PartialEq for StreamTag<E> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<E> Eq for StreamTag<E> {}

impl<E: StreamEntity> fmt::Debug for StreamTag<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StreamTag({})", E::STREAM_TYPE)
    }
}

impl<E: StreamEntity> Serialize for StreamTag<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(E::STREAM_TYPE.as_str())
    }
}

impl<'de, E> Deserialize<'de> for StreamTag<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Self::new())
    }
}

/// Any registered entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Observation(Observation),
    Event(Event),
    Attachment(Attachment),
}

impl Entity {
    /// Decode untyped input by its `observation_type`
    pub fn decode(value: Value) -> SchemaResult<Self> {
        let stream_type = read_stream_type(&value)?;
        tracing::trace!(stream_type = %stream_type, "stream type resolved");

        match stream_type {
            StreamType::Observation => validation::decode(value).map(Entity::Observation),
            StreamType::Event => validation::decode(value).map(Entity::Event),
            StreamType::Attachment => validation::decode(value).map(Entity::Attachment),
            StreamType::ObservationUpdate | StreamType::EventUpdate => Err(SchemaError::UnknownDiscriminator {
                value: stream_type.as_str().to_string(),
            }),
        }
    }

    /// Parse JSON text, then [`Entity::decode`]
    pub fn decode_str(text: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::decode(value)
    }

    pub fn encode(&self) -> SchemaResult<Value> {
        validation::encode(self)
    }

    pub fn stream_type(&self) -> StreamType {
        match self {
            Entity::Observation(_) => Observation::STREAM_TYPE,
            Entity::Event(_) => Event::STREAM_TYPE,
            Entity::Attachment(_) => Attachment::STREAM_TYPE,
        }
    }

    pub fn base(&self) -> &GundiBase {
        match self {
            Entity::Observation(e) => e.base(),
            Entity::Event(e) => e.base(),
            Entity::Attachment(e) => e.base(),
        }
    }
}

impl From<Observation> for Entity {
    fn from(entity: Observation) -> Self {
        Entity::Observation(entity)
    }
}

impl From<Event> for Entity {
    fn from(entity: Event) -> Self {
        Entity::Event(entity)
    }
}

impl From<Attachment> for Entity {
    fn from(entity: Attachment) -> Self {
        Entity::Attachment(entity)
    }
}

fn read_stream_type(value: &Value) -> SchemaResult<StreamType> {
    let fields = value
        .as_object()
        .ok_or_else(|| SchemaError::Malformed("expected a JSON object entity".to_string()))?;

    match fields.get("observation_type") {
        None | Some(Value::Null) => {
            Err(ValidationError::single(FieldViolation::required("observation_type")).into())
        }
        Some(Value::String(tag)) => tag.parse(),
        Some(_) => Err(ValidationError::single(FieldViolation::new(
            "observation_type",
            Constraint::Type,
            "expected a string",
        ))
        .into()),
    }
}
