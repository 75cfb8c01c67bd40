// Copyright (c) 2025 - Cowboy AI, Inc.
//! SMART Connect destination payloads
//!
//! SMART ingests GeoJSON features whose `properties` use camelCase keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{timestamp, FreeForm};
use crate::errors::{Constraint, FieldViolation};
use crate::validation::{self, Schema};

fn default_feature_type() -> String {
    "Feature".to_string()
}

/// Point geometry (`[lon, lat]` or `[lon, lat, alt]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTGeometry {
    #[validate(length(min = 2, max = 3))]
    pub coordinates: Vec<f64>,
}

impl Schema for SMARTGeometry {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        let Some(coordinates) = validation::require(fields, path, "coordinates", out) else {
            return;
        };
        let numeric = coordinates
            .as_array()
            .map(|items| items.iter().all(Value::is_number))
            .unwrap_or(false);
        if !numeric {
            out.push(FieldViolation::new(
                validation::join(path, "coordinates"),
                Constraint::Type,
                "expected an array of numbers",
            ));
        }
    }
}

/// Feature properties understood by SMART Connect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SMARTProperties {
    #[serde(with = "timestamp::utc")]
    pub date_time: DateTime<Utc>,

    /// `integrateincident`, `patrol`, ...
    pub smart_data_type: String,

    /// `waypoint/new`, `patrol/new`, `trackpoint/new`, ...
    pub smart_feature_type: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub smart_attributes: FreeForm,
}

impl Schema for SMARTProperties {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        validation::check_timestamp(fields, path, "dateTime", true, out);
        validation::check_string(fields, path, "smartDataType", true, out);
        validation::check_string(fields, path, "smartFeatureType", true, out);
        validation::check_map(fields, path, "smartAttributes", false, out);
    }
}

/// One GeoJSON feature for SMART
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTRequest {
    #[serde(rename = "type", default = "default_feature_type")]
    pub feature_type: String,

    #[validate(nested)]
    pub geometry: SMARTGeometry,

    #[validate(nested)]
    pub properties: SMARTProperties,
}

impl SMARTRequest {
    pub fn new(geometry: SMARTGeometry, properties: SMARTProperties) -> Self {
        Self {
            feature_type: default_feature_type(),
            geometry,
            properties,
        }
    }
}

impl Schema for SMARTRequest {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        validation::check_string(fields, path, "type", false, out);
        validation::check_nested::<SMARTGeometry>(fields, path, "geometry", true, out);
        validation::check_nested::<SMARTProperties>(fields, path, "properties", true, out);
    }
}

fn check_ca_uuid(fields: &Map<String, Value>, path: &str, out: &mut Vec<FieldViolation>) {
    if let Some(text) = validation::check_string(fields, path, "ca_uuid", true, out) {
        if Uuid::parse_str(text).is_err() {
            out.push(FieldViolation::new(
                validation::join(path, "ca_uuid"),
                Constraint::Type,
                "expected a UUID",
            ));
        }
    }
}

/// Everything one event becomes in a SMART conservation area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTCompositeRequest {
    /// Conservation area
    pub ca_uuid: Uuid,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub patrol_requests: Vec<SMARTRequest>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub waypoint_requests: Vec<SMARTRequest>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub track_point_requests: Vec<SMARTRequest>,
}

impl SMARTCompositeRequest {
    pub fn new(ca_uuid: Uuid) -> Self {
        Self {
            ca_uuid,
            patrol_requests: Vec::new(),
            waypoint_requests: Vec::new(),
            track_point_requests: Vec::new(),
        }
    }
}

impl Schema for SMARTCompositeRequest {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_ca_uuid(fields, path, out);
        validation::check_list::<SMARTRequest>(fields, path, "patrol_requests", false, out);
        validation::check_list::<SMARTRequest>(fields, path, "waypoint_requests", false, out);
        validation::check_list::<SMARTRequest>(fields, path, "track_point_requests", false, out);
    }
}

/// Waypoint edits for an incident already in SMART
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTUpdateRequest {
    pub ca_uuid: Uuid,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub waypoint_requests: Vec<SMARTRequest>,
}

impl Schema for SMARTUpdateRequest {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_ca_uuid(fields, path, out);
        validation::check_list::<SMARTRequest>(fields, path, "waypoint_requests", false, out);
    }
}
