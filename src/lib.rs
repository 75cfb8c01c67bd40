// Copyright (c) 2025 - Cowboy AI, Inc.
//! Wire contracts for the Gundi wildlife data platform
//!
//! This crate defines the data that crosses service boundaries: tracked
//! entities (observations, events, event updates, attachments), the
//! versioned event envelope that carries them, and the integration and
//! routing configuration model. Everything decodes from untrusted JSON
//! all-or-nothing and encodes back losslessly.
//!
//! # Quick start
//!
//! ```rust
//! use gundi_core::schemas::{Entity, StreamType};
//! use serde_json::json;
//!
//! let entity = Entity::decode(json!({
//!     "observation_type": "obv",
//!     "source_id": "bc14b256-dec0-4363-831d-39d0d2d85d50",
//!     "recorded_at": "2021-03-27 11:15:00+0200",
//!     "location": {"lat": -1.59083, "lon": 35.43902}
//! }))
//! .unwrap();
//!
//! assert_eq!(entity.stream_type(), StreamType::Observation);
//! assert_eq!(entity.encode().unwrap()["recorded_at"], "2021-03-27T09:15:00+00:00");
//! ```

pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod schemas;
pub mod validation;

// Re-export commonly used types
pub use config::DecodeConfig;
pub use errors::{SchemaError, SchemaResult, ValidationError};
pub use events::{Envelope, EnvelopeFactory, EventDecoder, EventType, SystemEvent, TypedEvent};
pub use schemas::{Entity, StreamType};
