// Copyright (c) 2025 - Cowboy AI, Inc.
//! System events
//!
//! Every event crossing a service boundary is an [`Envelope`] around a typed
//! payload. The concrete event kind fixes both the payload type and the
//! `event_type` tag written on the wire.
//!
//! # Event Flow
//!
//! ```text
//! producer: payload → EnvelopeFactory → ObservationDelivered → to_json (adds event_type)
//!                                                                 ↓
//! consumer: channel tag → EventDecoder::decode_as → version check → SystemEvent
//!                                                       ↓
//!                                          registered upcasters (if any)
//! ```
//!
//! # Versioning
//!
//! - `schema_version` defaults to `"v1"`
//! - A consumer only decodes versions its [`DecodeConfig`](crate::config::DecodeConfig) accepts
//! - Older versions are readable only through registered [`Upcaster`]s
//! - Anything else is [`SchemaError::UnsupportedSchemaVersion`](crate::errors::SchemaError)
//!
//! # Module Organization
//!
//! - [`envelope`] - Envelope and its factory
//! - [`catalog`] - Event types, typed events and the [`SystemEvent`] union
//! - [`decoder`] - Directed decoding under a version policy
//! - [`versioning`] - Schema versions and upcasting

pub mod catalog;
pub mod decoder;
pub mod envelope;
pub mod versioning;

pub use catalog::{
    ActionConfigCreated, ActionConfigDeleted, ActionConfigUpdated, AttachmentTransformedER,
    AttachmentTransformedWPSWatch, EventFamily, EventTransformedER, EventTransformedSMART,
    EventTransformedWPSWatch, EventType, EventUpdateTransformedER, EventUpdateTransformedSMART,
    IntegrationCreated, IntegrationDeleted, IntegrationUpdated, ObservationDelivered,
    ObservationDeliveryFailed, ObservationTransformedER, ObservationUpdateFailed,
    ObservationUpdated, SystemEvent, TypedEvent,
};
pub use decoder::EventDecoder;
pub use envelope::{Envelope, EnvelopeFactory};
pub use versioning::{SchemaVersion, UpcastError, Upcaster, UpcasterChain, Upcasters};
