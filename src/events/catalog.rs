// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event catalog
//!
//! One typed event per catalogued name, each fixing the payload type of its
//! [`Envelope`]. The `event_type` written on the wire is the constant
//! [`TypedEvent::EVENT_TYPE`] of the Rust type, never a value taken from
//! input.
//!
//! # Families
//!
//! - **Dispatcher**: delivery and update outcomes reported by dispatchers
//! - **Configuration**: integration and action configuration lifecycle
//! - **Transformer**: per-destination payloads ready for dispatch
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use gundi_core::clock::{FixedClock, SequentialIds};
//! use gundi_core::events::{EnvelopeFactory, ObservationDelivered, TypedEvent};
//! use gundi_core::schemas::DispatchedObservation;
//!
//! let factory = EnvelopeFactory::new(
//!     FixedClock(Utc.with_ymd_and_hms(2023, 7, 10, 19, 36, 0).unwrap()),
//!     SequentialIds::starting_at(1),
//! );
//!
//! let payload = DispatchedObservation {
//!     gundi_id: Some("23ca4b15-18b6-4cf4-9da6-36dd69c6f638".into()),
//!     related_to: None,
//!     external_id: Some("d5a8e1a4-2b5a-4c52-8f4f-6d3ce1d0fb2b".into()),
//!     data_provider_id: Some("ddd0946d-15b0-4308-b93d-e0470b6d33b6".into()),
//!     destination_id: Some("338225f3-91f9-4fe1-b013-353a229ce504".into()),
//!     delivered_at: Some(Utc.with_ymd_and_hms(2023, 7, 10, 19, 35, 31).unwrap()),
//! };
//!
//! let event = ObservationDelivered::create_with(&factory, payload);
//! let json = event.to_json().unwrap();
//! assert_eq!(json["event_type"], "ObservationDelivered");
//! assert_eq!(json["event_id"], "00000000-0000-4000-8000-000000000001");
//! assert_eq!(json["timestamp"], "2023-07-10T19:36:00+00:00");
//! ```
//!
//! Producers pass their own [`EnvelopeFactory`] to
//! [`TypedEvent::create_with`]; the `new` constructors are shorthand for
//! [`EnvelopeFactory::system`].

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use super::envelope::{serialize_tagged, Envelope, EnvelopeFactory};
use super::versioning::SchemaVersion;
use crate::clock::{Clock, IdGenerator};
use crate::errors::{SchemaError, SchemaResult};
use crate::schemas::{
    ActionConfigChanges, DeletionDetails, DispatchedObservation, ERAttachment, EREvent,
    EREventUpdate, ERObservation, IntegrationActionConfiguration, IntegrationConfigChanges,
    IntegrationSummary, SMARTCompositeRequest, SMARTUpdateRequest, UpdatedObservation,
    WPSWatchImage, WPSWatchImageMetadata,
};
use crate::validation::{self, Schema};

/// Producer family an event type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFamily {
    Dispatcher,
    Configuration,
    Transformer,
}

impl EventFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventFamily::Dispatcher => "dispatcher",
            EventFamily::Configuration => "configuration",
            EventFamily::Transformer => "transformer",
        }
    }
}

impl fmt::Display for EventFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An envelope whose payload type and `event_type` tag are fixed
pub trait TypedEvent: Serialize + Into<SystemEvent> + Sized {
    type Payload: Schema + Serialize;

    /// Tag written as `event_type`
    const EVENT_TYPE: EventType;

    fn from_envelope(envelope: Envelope<Self::Payload>) -> Self;

    fn envelope(&self) -> &Envelope<Self::Payload>;

    fn into_envelope(self) -> Envelope<Self::Payload>;

    /// Wrap `payload` with an id and timestamp from `factory`
    fn create_with<C: Clock, G: IdGenerator>(
        factory: &EnvelopeFactory<C, G>,
        payload: Self::Payload,
    ) -> Self {
        Self::from_envelope(factory.envelope(payload))
    }

    /// Encode with the `event_type` tag
    fn to_json(&self) -> SchemaResult<Value> {
        validation::encode(self)
    }

    /// Decode under the default [`DecodeConfig`](crate::config::DecodeConfig)
    fn decode(value: Value) -> SchemaResult<Self> {
        super::EventDecoder::default().decode::<Self>(value)
    }
}

macro_rules! event_catalog {
    (
        $(
            $family:ident {
                $( $(#[$meta:meta])* $name:ident => $payload:ty ),+ $(,)?
            }
        )+
    ) => {
        /// Every catalogued event type
        ///
        /// Serializes as the exact event name (`"ObservationDelivered"`).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum EventType {
            $( $( $name, )+ )+
        }

        impl EventType {
            pub const ALL: &'static [EventType] = &[$( $( EventType::$name, )+ )+];

            /// Name written as `event_type`
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $( EventType::$name => stringify!($name), )+ )+
                }
            }

            pub fn family(&self) -> EventFamily {
                match self {
                    $( $( EventType::$name => EventFamily::$family, )+ )+
                }
            }
        }

        $( $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq)]
            pub struct $name(Envelope<$payload>);

            impl $name {
                /// Wrap `payload` with a random id and the wall-clock time
                ///
                /// Prefer [`TypedEvent::create_with`] where the clock and
                /// id source should be injected.
                pub fn new(payload: $payload) -> Self {
                    Self(EnvelopeFactory::system().envelope(payload))
                }
            }

            impl TypedEvent for $name {
                type Payload = $payload;
                const EVENT_TYPE: EventType = EventType::$name;

                fn from_envelope(envelope: Envelope<$payload>) -> Self {
                    Self(envelope)
                }

                fn envelope(&self) -> &Envelope<$payload> {
                    &self.0
                }

                fn into_envelope(self) -> Envelope<$payload> {
                    self.0
                }
            }

            impl Deref for $name {
                type Target = Envelope<$payload>;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl Serialize for $name {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serialize_tagged(&self.0, EventType::$name, serializer)
                }
            }

            impl From<$name> for SystemEvent {
                fn from(event: $name) -> Self {
                    SystemEvent::$name(event)
                }
            }
        )+ )+

        /// Any catalogued event
        ///
        /// Encodes through the variant's own tagging. There is no
        /// self-directed decoding: use
        /// [`EventDecoder::decode_as`](super::EventDecoder::decode_as) with a
        /// tag known from the channel.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum SystemEvent {
            $( $( $name($name), )+ )+
        }

        impl SystemEvent {
            pub fn event_type(&self) -> EventType {
                match self {
                    $( $( SystemEvent::$name(_) => EventType::$name, )+ )+
                }
            }

            pub fn event_id(&self) -> Uuid {
                match self {
                    $( $( SystemEvent::$name(event) => event.event_id(), )+ )+
                }
            }

            pub fn timestamp(&self) -> DateTime<Utc> {
                match self {
                    $( $( SystemEvent::$name(event) => event.timestamp(), )+ )+
                }
            }

            pub fn schema_version(&self) -> &SchemaVersion {
                match self {
                    $( $( SystemEvent::$name(event) => event.schema_version(), )+ )+
                }
            }
        }

        /// Decode `value` as the envelope of `event_type` (version already settled)
        pub(crate) fn decode_envelope(event_type: EventType, value: Value) -> SchemaResult<SystemEvent> {
            match event_type {
                $( $(
                    EventType::$name => {
                        Envelope::<$payload>::decode(value).map(|envelope| SystemEvent::$name($name(envelope)))
                    }
                )+ )+
            }
        }
    };
}

event_catalog! {
    Dispatcher {
        /// Observation accepted by a destination
        ObservationDelivered => DispatchedObservation,
        /// Destination refused or could not be reached
        ObservationDeliveryFailed => DispatchedObservation,
        ObservationUpdated => UpdatedObservation,
        ObservationUpdateFailed => UpdatedObservation,
    }
    Configuration {
        IntegrationCreated => IntegrationSummary,
        IntegrationUpdated => IntegrationConfigChanges,
        IntegrationDeleted => DeletionDetails,
        ActionConfigCreated => IntegrationActionConfiguration,
        ActionConfigUpdated => ActionConfigChanges,
        ActionConfigDeleted => DeletionDetails,
    }
    Transformer {
        /// Event ready for EarthRanger
        EventTransformedER => EREvent,
        EventUpdateTransformedER => EREventUpdate,
        AttachmentTransformedER => ERAttachment,
        ObservationTransformedER => ERObservation,
        /// Event ready for SMART Connect
        EventTransformedSMART => SMARTCompositeRequest,
        EventUpdateTransformedSMART => SMARTUpdateRequest,
        /// Image metadata ready for WPS Watch
        EventTransformedWPSWatch => WPSWatchImageMetadata,
        AttachmentTransformedWPSWatch => WPSWatchImage,
    }
}

impl EventType {
    /// Version producers currently publish
    pub fn current_version(&self) -> SchemaVersion {
        SchemaVersion::default()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|event_type| event_type.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownEventType {
                value: s.to_string(),
            })
    }
}

impl SystemEvent {
    /// Encode with the `event_type` tag
    pub fn to_json(&self) -> SchemaResult<Value> {
        validation::encode(self)
    }
}
