// Copyright (c) 2025 - Cowboy AI, Inc.
//! Observation entity (`obv`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::base::{impl_gundi_entity, GundiBase};
use super::stream::{StreamEntity, StreamTag, StreamType};
use crate::domain::{timestamp, FreeForm, Identifier, Location};
use crate::errors::FieldViolation;
use crate::validation::{self, Schema};

fn default_external_source_id() -> Option<String> {
    Some("None".to_string())
}

fn default_source_type() -> Option<String> {
    Some("tracking-device".to_string())
}

/// A position fix reported by a tracked source
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use gundi_core::domain::Location;
/// use gundi_core::schemas::{GundiEntity, Observation};
///
/// let observation = Observation::new(
///     Utc.with_ymd_and_hms(2021, 3, 27, 9, 15, 0).unwrap(),
///     Location::new(-1.59083, 35.43902).unwrap(),
/// )
/// .with_source_id("bc14b256-dec0-4363-831d-39d0d2d85d50")
/// .with_source_name("Logistics Truck A")
/// .with_owner("na");
///
/// let json = serde_json::to_value(&observation).unwrap();
/// assert_eq!(json["observation_type"], "obv");
/// assert_eq!(json["recorded_at"], "2021-03-27T09:15:00+00:00");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observation {
    #[serde(flatten)]
    pub base: GundiBase,

    #[serde(default)]
    pub source_id: Option<Identifier>,

    /// Manufacturer identifier of the device
    #[serde(default = "default_external_source_id")]
    pub external_source_id: Option<String>,

    #[serde(default)]
    pub source_name: Option<String>,

    #[serde(rename = "type", default = "default_source_type")]
    pub source_type: Option<String>,

    #[serde(default)]
    pub subject_type: Option<String>,

    #[serde(with = "timestamp::utc")]
    pub recorded_at: DateTime<Utc>,

    #[validate(nested)]
    pub location: Location,

    #[serde(default)]
    pub additional: Option<FreeForm>,

    #[serde(default)]
    observation_type: StreamTag<Observation>,
}

impl StreamEntity for Observation {
    const STREAM_TYPE: StreamType = StreamType::Observation;
}

impl_gundi_entity!(Observation);

impl Observation {
    pub fn new(recorded_at: DateTime<Utc>, location: Location) -> Self {
        Self {
            base: GundiBase::default(),
            source_id: None,
            external_source_id: default_external_source_id(),
            source_name: None,
            source_type: default_source_type(),
            subject_type: None,
            recorded_at,
            location,
            additional: None,
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

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }

    pub fn with_subject_type(mut self, subject_type: impl Into<String>) -> Self {
        self.subject_type = Some(subject_type.into());
        self
    }

    pub fn with_additional(mut self, additional: FreeForm) -> Self {
        self.additional = Some(additional);
        self
    }

    pub fn stream_type(&self) -> StreamType {
        self.observation_type.stream_type()
    }
}

impl Schema for Observation {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_identifier(fields, path, "source_id", false, out);
        validation::check_string(fields, path, "external_source_id", false, out);
        validation::check_string(fields, path, "source_name", false, out);
        validation::check_string(fields, path, "type", false, out);
        validation::check_string(fields, path, "subject_type", false, out);
        validation::check_timestamp(fields, path, "recorded_at", true, out);
        validation::check_nested::<Location>(fields, path, "location", true, out);
        validation::check_map(fields, path, "additional", false, out);
    }
}
