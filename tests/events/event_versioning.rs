// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schema Version Tests
//!
//! Tests verify:
//! - Unaccepted versions are refused, never coerced
//! - Consumers can opt into extra versions
//! - Registered upcasters move older documents to an accepted version
//! - Multi-step upcaster chains run in order

use gundi_core::config::DecodeConfig;
use gundi_core::errors::SchemaError;
use gundi_core::events::versioning::{get_schema_version, UpcastError, Upcaster};
use gundi_core::events::{EventDecoder, EventType, IntegrationUpdated, SchemaVersion, TypedEvent};
use gundi_core::schemas::IntegrationConfigChanges;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::fixtures::*;

/// v0 listed changes as `[{"field": ..., "value": ...}]` under `integration_id`
struct ChangesListToMap;

impl Upcaster for ChangesListToMap {
    fn event_type(&self) -> EventType {
        EventType::IntegrationUpdated
    }

    fn from_version(&self) -> SchemaVersion {
        SchemaVersion::new("v0")
    }

    fn to_version(&self) -> SchemaVersion {
        SchemaVersion::new("v1")
    }

    fn upcast(&self, mut value: Value) -> Result<Value, UpcastError> {
        let payload = value
            .get_mut("payload")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| UpcastError::MissingField("payload".to_string()))?;

        let id = payload
            .remove("integration_id")
            .ok_or_else(|| UpcastError::MissingField("payload.integration_id".to_string()))?;
        let list = payload.remove("changes").unwrap_or_else(|| json!([]));
        let items = list.as_array().ok_or_else(|| UpcastError::InvalidFieldValue {
            field: "payload.changes".to_string(),
            reason: "expected a list".to_string(),
        })?;

        let mut changes = serde_json::Map::new();
        for item in items {
            let field = item["field"].as_str().ok_or_else(|| UpcastError::InvalidFieldValue {
                field: "payload.changes[].field".to_string(),
                reason: "expected a string".to_string(),
            })?;
            changes.insert(field.to_string(), item["value"].clone());
        }

        payload.insert("id".to_string(), id);
        payload.insert("changes".to_string(), Value::Object(changes));
        Ok(value)
    }
}

/// v1 → v2 with an unchanged payload
struct SameShapeV2;

impl Upcaster for SameShapeV2 {
    fn event_type(&self) -> EventType {
        EventType::IntegrationUpdated
    }

    fn from_version(&self) -> SchemaVersion {
        SchemaVersion::new("v1")
    }

    fn to_version(&self) -> SchemaVersion {
        SchemaVersion::new("v2")
    }

    fn upcast(&self, value: Value) -> Result<Value, UpcastError> {
        Ok(value)
    }
}

fn integration_updated(version: &str, payload: Value) -> Value {
    json!({
        "event_id": EVENT_ID_1,
        "timestamp": FIXED_TIMESTAMP,
        "schema_version": version,
        "payload": payload,
        "event_type": "IntegrationUpdated"
    })
}

fn v0_payload() -> Value {
    json!({
        "integration_id": "779ff3ab-5589-4f4c-9e0a-ae8d6c9edff0",
        "changes": [
            {"field": "name", "value": "Gundi ER (renamed)"},
            {"field": "enabled", "value": false}
        ]
    })
}

#[test]
fn test_missing_version_means_v1() {
    let mut input = integration_updated("v1", json!({"id": "a", "changes": {}}));
    input.as_object_mut().unwrap().remove("schema_version");

    assert_eq!(get_schema_version(&input).unwrap(), SchemaVersion::default());
    let event = IntegrationUpdated::decode(input).expect("Failed to decode");
    assert_eq!(event.schema_version().as_str(), "v1");
}

#[test]
fn test_older_version_without_upcaster_is_refused() {
    let err = IntegrationUpdated::decode(integration_updated("v0", v0_payload())).unwrap_err();

    assert_eq!(
        err,
        SchemaError::UnsupportedSchemaVersion {
            event_type: "IntegrationUpdated".to_string(),
            schema_version: "v0".to_string(),
        }
    );
}

#[test]
fn test_upcaster_reshapes_older_payload() {
    let decoder = EventDecoder::default().with_upcaster(ChangesListToMap);

    let event: IntegrationUpdated = decoder
        .decode(integration_updated("v0", v0_payload()))
        .expect("Failed to decode");

    let changes: &IntegrationConfigChanges = event.payload();
    assert_eq!(changes.id.to_string(), "779ff3ab-5589-4f4c-9e0a-ae8d6c9edff0");
    assert_eq!(changes.changes["name"], json!("Gundi ER (renamed)"));
    assert_eq!(changes.changes["enabled"], json!(false));
    assert_eq!(event.schema_version().as_str(), "v1");
    assert_eq!(event.to_json().unwrap()["schema_version"], "v1");
}

#[test]
fn test_chain_stops_at_first_accepted_version() {
    let decoder = EventDecoder::default()
        .with_upcaster(ChangesListToMap)
        .with_upcaster(SameShapeV2);

    let event: IntegrationUpdated = decoder.decode(integration_updated("v0", v0_payload())).unwrap();

    assert_eq!(event.schema_version().as_str(), "v1");
}

#[test]
fn test_chain_prefers_default_version_and_refuses_unreachable() {
    let config = DecodeConfig::default()
        .with_accepted("IntegrationUpdated=v2")
        .unwrap();
    let strict = EventDecoder::new(config)
        .with_upcaster(ChangesListToMap)
        .with_upcaster(SameShapeV2);

    // v1 is still accepted by default, so the chain stops there
    let event: IntegrationUpdated = strict.decode(integration_updated("v0", v0_payload())).unwrap();
    assert_eq!(event.schema_version().as_str(), "v1");

    // a v3 document has no registered path
    let err = strict
        .decode::<IntegrationUpdated>(integration_updated("v3", json!({"id": "a", "changes": {}})))
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnsupportedSchemaVersion { .. }));
}

#[test]
fn test_opted_in_version_is_not_upcast() {
    let config = DecodeConfig::default().accept(EventType::IntegrationUpdated, "v2");

    let event: IntegrationUpdated = EventDecoder::new(config)
        .decode(integration_updated("v2", json!({"id": "a", "changes": {"name": "x"}})))
        .expect("Failed to decode");

    assert_eq!(event.schema_version().as_str(), "v2");
}

#[test]
fn test_version_policy_is_per_event_type() {
    let config = DecodeConfig::default().accept(EventType::IntegrationDeleted, "v2");

    let err = EventDecoder::new(config)
        .decode::<IntegrationUpdated>(integration_updated("v2", json!({"id": "a", "changes": {}})))
        .unwrap_err();

    assert!(matches!(err, SchemaError::UnsupportedSchemaVersion { .. }));
}
