// Copyright (c) 2025 - Cowboy AI, Inc.
//! Entity Decoding Tests
//!
//! Tests verify:
//! - Registry dispatch on `observation_type`
//! - Fixed discriminators regardless of input
//! - UTC normalisation of `recorded_at`
//! - All-or-nothing validation with every violation reported
//! - Identifier text preserved through a round trip

use gundi_core::errors::{Constraint, SchemaError};
use gundi_core::schemas::{Attachment, Entity, EventUpdate, GundiEntity, StreamType};
use gundi_core::validation;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use crate::fixtures::*;

#[test]
fn test_observation_decodes_and_normalises() {
    // Act
    let entity = Entity::decode(observation_json()).expect("Failed to decode");

    // Assert
    let Entity::Observation(observation) = &entity else {
        panic!("expected an observation, got {:?}", entity.stream_type());
    };
    assert_eq!(observation.location.lat(), -1.59083);
    assert_eq!(observation.location.alt(), 0.0);
    assert_eq!(observation.gundi_id().unwrap().to_string(), GUNDI_ID_1);
    assert_eq!(observation.base.owner, "na");

    let json = entity.encode().expect("Failed to encode");
    assert_eq!(json["recorded_at"], "2021-03-27T09:15:00+00:00");
    assert_eq!(json["observation_type"], "obv");
    assert_eq!(json["additional"], json!({"speed_kmph": 10}));
}

#[test]
fn test_naive_event_timestamp_is_utc() {
    let entity = Entity::decode(event_json()).expect("Failed to decode");

    assert_eq!(entity.stream_type(), StreamType::Event);
    let json = entity.encode().unwrap();
    assert_eq!(json["recorded_at"], "2023-07-04T21:38:00+00:00");
    assert_eq!(json["event_details"]["tags"], json!(["female adult", "male child"]));
}

#[test_case(observation_json() ; "observation")]
#[test_case(event_json() ; "event")]
#[test_case(attachment_json() ; "attachment")]
fn test_round_trip(input: serde_json::Value) {
    let entity = Entity::decode(input).expect("Failed to decode");
    let encoded = entity.encode().expect("Failed to encode");
    let decoded = Entity::decode(encoded).expect("Failed to decode again");

    assert_eq!(decoded, entity);
}

#[test]
fn test_event_update_decodes_directly() {
    let input = json!({"observation_type": "evu", "related_to": GUNDI_ID_1, "changes": {"title": "Leopard"}});

    let update: EventUpdate = validation::decode(input).expect("Failed to decode");

    assert_eq!(update.stream_type(), StreamType::EventUpdate);
    assert_eq!(update.changes.as_ref().unwrap()["title"], "Leopard");
    assert_eq!(validation::encode(&update).unwrap()["observation_type"], "evu");
}

#[test]
fn test_negative_altitude_is_rejected() {
    let mut input = observation_json();
    input["location"] = json!({"lat": 0, "lon": 0, "alt": -5.0});

    let SchemaError::Validation(report) = Entity::decode(input).unwrap_err() else {
        panic!("expected a validation error");
    };
    assert_eq!(report.violation_at("location.alt").unwrap().constraint, Constraint::Range);
}

#[test]
fn test_discriminator_cannot_be_overridden() {
    // Arrange: a typed decode told the document is an event
    let input = json!({"observation_type": "ev", "file_path": "attachments/wildcat.jpg"});

    // Act
    let attachment: Attachment = validation::decode(input).expect("Failed to decode");

    // Assert
    assert_eq!(attachment.stream_type(), StreamType::Attachment);
    assert_eq!(validation::encode(&attachment).unwrap()["observation_type"], "att");
}

#[test_case("xyz" ; "unknown")]
#[test_case("obvu" ; "recognised but unregistered")]
#[test_case("evu" ; "event updates are not registered")]
#[test_case("OBV" ; "wrong case")]
fn test_unknown_discriminator(tag: &str) {
    let mut input = observation_json();
    input["observation_type"] = json!(tag);

    let err = Entity::decode(input).unwrap_err();

    assert_eq!(err, SchemaError::UnknownDiscriminator { value: tag.to_string() });
}

#[test]
fn test_missing_discriminator() {
    let mut input = observation_json();
    input.as_object_mut().unwrap().remove("observation_type");

    let SchemaError::Validation(report) = Entity::decode(input).unwrap_err() else {
        panic!("expected a validation error");
    };
    assert_eq!(report.violation_at("observation_type").unwrap().constraint, Constraint::Required);
}

#[test]
fn test_every_violation_is_reported() {
    // Arrange: latitude out of range, no recorded_at, legacy id as a list
    let input = json!({
        "observation_type": "obv",
        "source_id": ["nope"],
        "location": {"lat": 91.0, "lon": 35.43902}
    });

    // Act
    let SchemaError::Validation(report) = Entity::decode(input).unwrap_err() else {
        panic!("expected a validation error");
    };

    // Assert
    assert_eq!(report.violations().len(), 3);
    assert_eq!(report.violation_at("location.lat").unwrap().constraint, Constraint::Range);
    assert_eq!(report.violation_at("recorded_at").unwrap().constraint, Constraint::Required);
    assert_eq!(report.violation_at("source_id").unwrap().constraint, Constraint::Type);
}

#[test_case(-90.0 ; "south pole")]
#[test_case(90.0 ; "north pole")]
fn test_latitude_bounds_are_inclusive(lat: f64) {
    let mut input = observation_json();
    input["location"]["lat"] = json!(lat);

    assert!(Entity::decode(input).is_ok());
}

#[test_case(GUNDI_ID_1 ; "uuid")]
#[test_case(LEGACY_ID ; "legacy string")]
#[test_case("BC14B256-DEC0-4363-831D-39D0D2D85D50" ; "uppercase uuid")]
fn test_identifier_text_survives(id: &str) {
    let mut input = observation_json();
    input["gundi_id"] = json!(id);

    let encoded = Entity::decode(input).unwrap().encode().unwrap();

    assert_eq!(encoded["gundi_id"], id);
}

#[test]
fn test_annotation_key_order_is_preserved() {
    let mut input = attachment_json();
    input["annotations"] = json!({"zeta": 1, "alpha": 2, "mid": {"b": 1, "a": 2}});

    let encoded = Entity::decode(input).unwrap().encode().unwrap();
    let keys: Vec<_> = encoded["annotations"].as_object().unwrap().keys().cloned().collect();

    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_built_observation_matches_decoded() {
    let built = observation();
    let decoded = Entity::decode(observation_json()).unwrap();

    let Entity::Observation(decoded) = decoded else {
        panic!("expected an observation");
    };
    assert_eq!(built.recorded_at, decoded.recorded_at);
    assert_eq!(built.location, decoded.location);
    assert_eq!(built.source_id, decoded.source_id);
}
