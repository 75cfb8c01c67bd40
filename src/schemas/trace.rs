// Copyright (c) 2025 - Cowboy AI, Inc.
//! Delivery traces

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use super::stream::StreamType;
use crate::domain::{timestamp, Identifier};
use crate::errors::{Constraint, FieldViolation};
use crate::validation::{self, Schema};

// Older traces store an empty string when the stream type is unknown
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<StreamType>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.is_empty() => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Audit record of one object's delivery to one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GundiTrace {
    #[serde(default)]
    pub object_id: Option<Identifier>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub object_type: Option<StreamType>,

    #[serde(default)]
    pub related_to: Option<Identifier>,

    #[serde(default)]
    pub data_provider: Option<Identifier>,

    #[serde(default)]
    pub destination: Option<Identifier>,

    #[serde(with = "timestamp::utc_option")]
    pub delivered_at: Option<DateTime<Utc>>,

    /// ID assigned by the destination system
    #[serde(default)]
    pub external_id: Option<Identifier>,

    #[serde(with = "timestamp::utc_option")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(with = "timestamp::utc_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GundiTrace {
    /// Whether the destination accepted the object
    pub fn is_delivered(&self) -> bool {
        self.delivered_at.is_some()
    }
}

impl Schema for GundiTrace {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        for field in ["object_id", "related_to", "data_provider", "destination", "external_id"] {
            validation::check_identifier(fields, path, field, false, out);
        }
        if let Some(tag) = validation::check_string(fields, path, "object_type", false, out) {
            if !tag.is_empty() && tag.parse::<StreamType>().is_err() {
                out.push(FieldViolation::new(
                    validation::join(path, "object_type"),
                    Constraint::Custom,
                    format!("unknown stream type {}", tag),
                ));
            }
        }
        for field in ["delivered_at", "created_at", "updated_at"] {
            validation::require_key(fields, path, field, out);
            validation::check_timestamp(fields, path, field, false, out);
        }
    }
}
