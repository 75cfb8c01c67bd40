// Copyright (c) 2025 - Cowboy AI, Inc.
//! EarthRanger destination payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::base::{impl_gundi_entity, GundiBase};
use crate::domain::{timestamp, ERLocation, FreeForm};
use crate::errors::FieldViolation;
use crate::validation::{self, Schema};

/// Event as posted to the EarthRanger events API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EREvent {
    #[serde(flatten)]
    pub base: GundiBase,

    #[serde(default)]
    pub title: Option<String>,

    /// EarthRanger event type key (`animal_sighting`, ...)
    pub event_type: String,

    #[serde(with = "timestamp::utc")]
    pub time: DateTime<Utc>,

    #[validate(nested)]
    pub location: ERLocation,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub event_details: FreeForm,

    #[serde(default)]
    pub geometry: Option<FreeForm>,
}

impl Schema for EREvent {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_string(fields, path, "title", false, out);
        validation::check_string(fields, path, "event_type", true, out);
        validation::check_timestamp(fields, path, "time", true, out);
        validation::check_nested::<ERLocation>(fields, path, "location", true, out);
        validation::check_map(fields, path, "event_details", false, out);
        validation::check_map(fields, path, "geometry", false, out);
    }
}

/// Observation as posted to the EarthRanger sensors API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ERObservation {
    #[serde(flatten)]
    pub base: GundiBase,

    /// Device identifier as known to EarthRanger
    pub manufacturer_id: String,

    #[serde(default)]
    pub source_type: Option<String>,

    #[serde(default)]
    pub subject_name: Option<String>,

    #[serde(default)]
    pub subject_type: Option<String>,

    #[serde(default)]
    pub subject_subtype: Option<String>,

    #[serde(with = "timestamp::utc")]
    pub recorded_at: DateTime<Utc>,

    #[validate(nested)]
    pub location: ERLocation,

    #[serde(default)]
    pub additional: Option<FreeForm>,
}

impl Schema for ERObservation {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_string(fields, path, "manufacturer_id", true, out);
        for field in ["source_type", "subject_name", "subject_type", "subject_subtype"] {
            validation::check_string(fields, path, field, false, out);
        }
        validation::check_timestamp(fields, path, "recorded_at", true, out);
        validation::check_nested::<ERLocation>(fields, path, "location", true, out);
        validation::check_map(fields, path, "additional", false, out);
    }
}

/// Changes to an event already in EarthRanger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EREventUpdate {
    #[serde(flatten)]
    pub base: GundiBase,

    #[serde(default)]
    pub changes: Option<FreeForm>,
}

impl Schema for EREventUpdate {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_map(fields, path, "changes", false, out);
    }
}

/// File to attach to an EarthRanger event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ERAttachment {
    #[serde(flatten)]
    pub base: GundiBase,

    pub file_path: String,
}

impl Schema for ERAttachment {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_string(fields, path, "file_path", true, out);
    }
}

impl_gundi_entity!(EREvent, ERObservation, EREventUpdate, ERAttachment);
