// Copyright (c) 2025 - Cowboy AI, Inc.
//! WPS Watch destination payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::base::{impl_gundi_entity, GundiBase};
use crate::domain::{timestamp, FreeForm, Location};
use crate::errors::FieldViolation;
use crate::validation::{self, Schema};

/// Metadata sent ahead of a camera-trap image upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WPSWatchImageMetadata {
    #[serde(flatten)]
    pub base: GundiBase,

    pub camera_id: String,

    #[serde(default, with = "timestamp::utc_option")]
    pub captured_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate(nested)]
    pub location: Option<Location>,

    #[serde(default)]
    pub event_details: Option<FreeForm>,
}

impl Schema for WPSWatchImageMetadata {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_string(fields, path, "camera_id", true, out);
        validation::check_timestamp(fields, path, "captured_at", false, out);
        validation::check_nested::<Location>(fields, path, "location", false, out);
        validation::check_map(fields, path, "event_details", false, out);
    }
}

/// Camera-trap image to upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WPSWatchImage {
    #[serde(flatten)]
    pub base: GundiBase,

    pub camera_id: String,

    pub file_path: String,
}

impl Schema for WPSWatchImage {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_string(fields, path, "camera_id", true, out);
        validation::check_string(fields, path, "file_path", true, out);
    }
}

impl_gundi_entity!(WPSWatchImageMetadata, WPSWatchImage);
