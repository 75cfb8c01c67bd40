// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration change-sets
//!
//! Payloads of the portal's update and delete events. One shape per event
//! type, published at schema version `v1`; older shapes are only readable
//! through an explicitly registered upcaster.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::{FreeForm, Identifier};
use crate::errors::FieldViolation;
use crate::validation::{self, Schema};

fn check_ids(fields: &Map<String, Value>, path: &str, out: &mut Vec<FieldViolation>) {
    validation::check_identifier(fields, path, "id", true, out);
    validation::check_identifier(fields, path, "alt_id", false, out);
}

/// Fields changed on an integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntegrationConfigChanges {
    /// Integration ID
    pub id: Identifier,

    /// Secondary identifier (e.g. the ID the integration had in a previous system)
    #[serde(default)]
    pub alt_id: Option<Identifier>,

    /// New values keyed by field name
    pub changes: FreeForm,
}

impl Schema for IntegrationConfigChanges {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_ids(fields, path, out);
        validation::check_map(fields, path, "changes", true, out);
    }
}

/// Fields changed on an action configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ActionConfigChanges {
    /// Action configuration ID
    pub id: Identifier,

    #[serde(default)]
    pub alt_id: Option<Identifier>,

    pub changes: FreeForm,
}

impl Schema for ActionConfigChanges {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_ids(fields, path, out);
        validation::check_map(fields, path, "changes", true, out);
    }
}

/// Identity of a deleted integration or action configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeletionDetails {
    pub id: Identifier,

    #[serde(default)]
    pub alt_id: Option<Identifier>,
}

impl Schema for DeletionDetails {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        if let Some(fields) = validation::expect_object(value, path, out) {
            check_ids(fields, path, out);
        }
    }
}
