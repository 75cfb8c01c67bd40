// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration Model Tests
//!
//! Integrations, their action configurations and delivery traces as the
//! portal serves them.

use gundi_core::errors::{Constraint, SchemaError};
use gundi_core::schemas::actions::{
    ERAuthActionConfig, ERPushEventActionConfig, EarthRangerAction,
};
use gundi_core::schemas::{GundiTrace, Integration, IntegrationSummary, IntegrationType, StreamType};
use gundi_core::validation;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::fixtures::*;

#[test]
fn test_integration_decodes() {
    let integration: Integration = validation::decode(integration_json()).expect("Failed to decode");

    assert_eq!(integration.type_value(), Some("earth_ranger"));
    assert_eq!(integration.owner.name, "Test Org");
    assert_eq!(integration.configurations.len(), 2);
    assert!(integration.integration_type.action("push_event").is_some());
    assert_eq!(integration.status["is_healthy"], json!(true));
}

#[test]
fn test_action_configuration_data_is_typed_on_demand() {
    let integration: Integration = validation::decode(integration_json()).unwrap();

    let auth: ERAuthActionConfig = integration
        .configuration(EarthRangerAction::Authenticate.as_str())
        .expect("auth configuration")
        .parse_data()
        .expect("Failed to parse auth data");
    assert!(auth.has_token());
    assert_eq!(auth.username, "");

    let push: ERPushEventActionConfig = integration
        .configuration(EarthRangerAction::PushEvent.as_str())
        .expect("push configuration")
        .parse_data()
        .expect("Failed to parse push data");
    assert_eq!(push.event_type, "animal_sighting");
}

#[test]
fn test_wrongly_typed_action_data_reports_data_path() {
    let mut bad = integration_json();
    bad["configurations"][1]["data"] = json!({"event_type": 42});
    let integration: Integration = validation::decode(bad).unwrap();
    let SchemaError::Validation(report) = integration
        .configuration("push_event")
        .unwrap()
        .parse_data::<ERPushEventActionConfig>()
        .unwrap_err()
    else {
        panic!("expected a validation error");
    };
    assert_eq!(report.violation_at("data.event_type").unwrap().constraint, Constraint::Type);
}

#[test]
fn test_natural_keys_are_enforced_everywhere() {
    let mut input = integration_json();
    input["type"]["value"] = json!("Earth Ranger");
    input["type"]["actions"][1]["value"] = json!("p");
    input["configurations"][0]["action"]["value"] = json!("AUTH");

    let SchemaError::Validation(report) = validation::decode::<Integration>(input).unwrap_err() else {
        panic!("expected a validation error");
    };

    assert_eq!(report.violation_at("type.value").unwrap().constraint, Constraint::Pattern);
    assert_eq!(report.violation_at("type.actions[1].value").unwrap().constraint, Constraint::Length);
    assert_eq!(
        report.violation_at("configurations[0].action.value").unwrap().constraint,
        Constraint::Pattern
    );
}

#[test]
fn test_natural_key_may_be_missing_or_null() {
    let mut input = integration_json();
    input["type"].as_object_mut().unwrap().remove("value");
    input["configurations"][0]["action"]["value"] = json!(null);

    let integration: Integration = validation::decode(input).expect("Failed to decode");

    assert_eq!(integration.type_value(), None);
    assert_eq!(integration.configurations[0].action.value, None);
    assert!(integration.configuration("auth").is_none());
}

#[test]
fn test_integration_type_without_value() {
    let integration_type: IntegrationType = validation::decode(json!({
        "id": "50229e21-a9fe-4caa-862c-8592dfb2479b",
        "name": "EarthRanger"
    }))
    .expect("Failed to decode");

    assert_eq!(integration_type.name, "EarthRanger");
    assert_eq!(integration_type.value, None);

    let SchemaError::Validation(report) =
        validation::decode::<IntegrationType>(json!({"name": "EarthRanger", "value": ""})).unwrap_err()
    else {
        panic!("expected a validation error");
    };
    assert_eq!(report.violation_at("value").unwrap().constraint, Constraint::Length);
}

#[test]
fn test_integration_owner_and_type_are_required() {
    let mut input = integration_json();
    let fields = input.as_object_mut().unwrap();
    fields.remove("type");
    fields.remove("owner");

    let SchemaError::Validation(report) = validation::decode::<Integration>(input).unwrap_err() else {
        panic!("expected a validation error");
    };

    assert!(report.has_violation_at("type"));
    assert!(report.has_violation_at("owner"));
}

#[test]
fn test_integration_summary() {
    let summary: IntegrationSummary = validation::decode(json!({
        "id": "779ff3ab-5589-4f4c-9e0a-ae8d6c9edff0",
        "name": "Gundi ER",
        "base_url": "https://gundi-er.pamdas.org",
        "type": {"id": "50229e21-a9fe-4caa-862c-8592dfb2479b", "name": "EarthRanger", "value": "earth_ranger"},
        "owner": {"id": "a91b400b-482a-4546-8fcb-ee42b01deeb6", "name": "Test Org"}
    }))
    .expect("Failed to decode");

    assert!(summary.enabled);
    assert!(summary.configurations.is_empty());
    assert_eq!(summary.integration_type.value.as_deref(), Some("earth_ranger"));
}

#[test]
fn test_trace_round_trip() {
    let input = json!({
        "object_id": GUNDI_ID_1,
        "object_type": "obv",
        "related_to": null,
        "data_provider": DATA_PROVIDER_ID,
        "destination": DESTINATION_ID,
        "delivered_at": "2023-07-10T21:35:31+02:00",
        "external_id": EXTERNAL_ID,
        "created_at": "2023-07-10T19:35:30Z",
        "updated_at": null
    });

    let trace: GundiTrace = validation::decode(input).expect("Failed to decode");
    assert_eq!(trace.object_type, Some(StreamType::Observation));
    assert_eq!(trace.delivered_at, Some(fixed_timestamp()));

    let encoded = validation::encode(&trace).unwrap();
    assert_eq!(encoded["delivered_at"], "2023-07-10T19:35:31+00:00");
    assert_eq!(validation::decode::<GundiTrace>(encoded).unwrap(), trace);
}
