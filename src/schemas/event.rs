// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event (`ev`) and EventUpdate (`evu`) entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::base::{impl_gundi_entity, GundiBase};
use super::stream::{StreamEntity, StreamTag, StreamType};
use crate::domain::{timestamp, FreeForm, Identifier, Location};
use crate::errors::FieldViolation;
use crate::validation::{self, Schema};

pub(crate) fn default_external_source_id() -> Option<String> {
    Some("none".to_string())
}

/// A reported occurrence (sighting, incident, alert)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Event {
    #[serde(flatten)]
    pub base: GundiBase,

    #[serde(default)]
    pub source_id: Option<Identifier>,

    #[serde(default = "default_external_source_id")]
    pub external_source_id: Option<String>,

    #[serde(with = "timestamp::utc")]
    pub recorded_at: DateTime<Utc>,

    #[serde(default)]
    #[validate(nested)]
    pub location: Option<Location>,

    #[serde(default)]
    pub title: Option<String>,

    /// Source-specific event category
    #[serde(default)]
    pub event_type: Option<String>,

    #[serde(default)]
    pub event_details: Option<FreeForm>,

    /// GeoJSON geometry
    #[serde(default)]
    pub geometry: Option<FreeForm>,

    #[serde(default)]
    observation_type: StreamTag<Event>,
}

impl StreamEntity for Event {
    const STREAM_TYPE: StreamType = StreamType::Event;
}

impl_gundi_entity!(Event);

impl Event {
    pub fn new(recorded_at: DateTime<Utc>) -> Self {
        Self {
            base: GundiBase::default(),
            source_id: None,
            external_source_id: default_external_source_id(),
            recorded_at,
            location: None,
            title: None,
            event_type: None,
            event_details: None,
            geometry: None,
            observation_type: StreamTag::new(),
        }
    }

    pub fn with_source_id(mut self, id: impl Into<Identifier>) -> Self {
        self.source_id = Some(id.into());
        self
    }

    pub fn with_external_source_id(mut self, id: impl Into<String>) -> Self {
        self.external_source_id = Some(id.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_event_details(mut self, details: FreeForm) -> Self {
        self.event_details = Some(details);
        self
    }

    pub fn with_geometry(mut self, geometry: FreeForm) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn stream_type(&self) -> StreamType {
        self.observation_type.stream_type()
    }
}

impl Schema for Event {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_identifier(fields, path, "source_id", false, out);
        validation::check_string(fields, path, "external_source_id", false, out);
        validation::check_timestamp(fields, path, "recorded_at", true, out);
        validation::check_nested::<Location>(fields, path, "location", false, out);
        validation::check_string(fields, path, "title", false, out);
        validation::check_string(fields, path, "event_type", false, out);
        validation::check_map(fields, path, "event_details", false, out);
        validation::check_map(fields, path, "geometry", false, out);
    }
}

/// Changes to a previously delivered event
///
/// `related_to` carries the Gundi ID of the original event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EventUpdate {
    #[serde(flatten)]
    pub base: GundiBase,

    #[serde(default)]
    pub source_id: Option<Identifier>,

    #[serde(default = "default_external_source_id")]
    pub external_source_id: Option<String>,

    /// Field-level diff
    #[serde(default)]
    pub changes: Option<FreeForm>,

    #[serde(default)]
    observation_type: StreamTag<EventUpdate>,
}

impl StreamEntity for EventUpdate {
    const STREAM_TYPE: StreamType = StreamType::EventUpdate;
}

impl_gundi_entity!(EventUpdate);

impl EventUpdate {
    pub fn new(changes: FreeForm) -> Self {
        Self {
            base: GundiBase::default(),
            source_id: None,
            external_source_id: default_external_source_id(),
            changes: Some(changes),
            observation_type: StreamTag::new(),
        }
    }

    pub fn with_source_id(mut self, id: impl Into<Identifier>) -> Self {
        self.source_id = Some(id.into());
        self
    }

    pub fn with_external_source_id(mut self, id: impl Into<String>) -> Self {
        self.external_source_id = Some(id.into());
        self
    }

    pub fn stream_type(&self) -> StreamType {
        self.observation_type.stream_type()
    }
}

impl Schema for EventUpdate {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_identifier(fields, path, "source_id", false, out);
        validation::check_string(fields, path, "external_source_id", false, out);
        validation::check_map(fields, path, "changes", false, out);
    }
}
