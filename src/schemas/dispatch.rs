// Copyright (c) 2025 - Cowboy AI, Inc.
//! Dispatcher payloads
//!
//! Emitted by dispatchers after attempting to deliver (or update) an
//! observation in a destination system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::{timestamp, Identifier};
use crate::errors::FieldViolation;
use crate::validation::{self, Schema};

/// Outcome of delivering one observation to one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DispatchedObservation {
    #[serde(default)]
    pub gundi_id: Option<Identifier>,

    #[serde(default)]
    pub related_to: Option<Identifier>,

    /// Identifier assigned by the destination system
    #[serde(default)]
    pub external_id: Option<Identifier>,

    #[serde(default)]
    pub data_provider_id: Option<Identifier>,

    #[serde(default)]
    pub destination_id: Option<Identifier>,

    /// Present on the wire even when unknown (`null`)
    #[serde(with = "timestamp::utc_option")]
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Outcome of updating one observation in one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdatedObservation {
    #[serde(default)]
    pub gundi_id: Option<Identifier>,

    #[serde(default)]
    pub related_to: Option<Identifier>,

    #[serde(default)]
    pub external_id: Option<Identifier>,

    #[serde(default)]
    pub data_provider_id: Option<Identifier>,

    #[serde(default)]
    pub destination_id: Option<Identifier>,

    #[serde(with = "timestamp::utc_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn check_dispatch_ids(fields: &Map<String, Value>, path: &str, out: &mut Vec<FieldViolation>) {
    for field in ["gundi_id", "related_to", "external_id", "data_provider_id", "destination_id"] {
        validation::check_identifier(fields, path, field, false, out);
    }
}

impl Schema for DispatchedObservation {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_dispatch_ids(fields, path, out);
        validation::require_key(fields, path, "delivered_at", out);
        validation::check_timestamp(fields, path, "delivered_at", false, out);
    }
}

impl Schema for UpdatedObservation {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_dispatch_ids(fields, path, out);
        validation::require_key(fields, path, "updated_at", out);
        validation::check_timestamp(fields, path, "updated_at", false, out);
    }
}
