// Copyright (c) 2025 - Cowboy AI, Inc.
//! Wire schemas
//!
//! Every type here decodes from untrusted JSON through
//! [`validation::decode`](crate::validation::decode) and encodes back
//! losslessly with `serde`.
//!
//! - **Entities**: [`Observation`], [`Event`], [`EventUpdate`], [`Attachment`],
//!   dispatched by their `observation_type` through [`Entity`]
//! - **Dispatcher payloads**: [`DispatchedObservation`], [`UpdatedObservation`]
//! - **Destination payloads**: EarthRanger, SMART and WPS Watch shapes
//! - **Configuration model**: integrations, connections, routes, action configs
//! - **Audit**: [`GundiTrace`]

pub mod actions;
pub mod attachment;
pub mod base;
pub mod changes;
pub mod dispatch;
pub mod earthranger;
pub mod event;
pub mod integration;
pub mod observation;
pub mod route;
pub mod smart;
pub mod stream;
pub mod trace;
pub mod wpswatch;

pub use attachment::Attachment;
pub use base::{GundiBase, GundiEntity};
pub use changes::{ActionConfigChanges, DeletionDetails, IntegrationConfigChanges};
pub use dispatch::{DispatchedObservation, UpdatedObservation};
pub use earthranger::{ERAttachment, EREvent, EREventUpdate, ERObservation};
pub use event::{Event, EventUpdate};
pub use integration::{
    Integration, IntegrationAction, IntegrationActionConfiguration, IntegrationActionSummary,
    IntegrationSummary, IntegrationType, IntegrationWebhook, IntegrationWebhookSummary,
    Organization, WebhookConfiguration,
};
pub use observation::Observation;
pub use route::{
    Connection, ConnectionIntegration, ConnectionIntegrationOwner, ConnectionIntegrationType,
    ConnectionRoute, Route, RouteConfiguration,
};
pub use smart::{
    SMARTCompositeRequest, SMARTGeometry, SMARTProperties, SMARTRequest, SMARTUpdateRequest,
};
pub use stream::{Entity, StreamEntity, StreamTag, StreamType, REGISTERED};
pub use trace::GundiTrace;
pub use wpswatch::{WPSWatchImage, WPSWatchImageMetadata};
