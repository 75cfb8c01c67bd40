// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Serialization/Deserialization Tests
//!
//! Tests verify:
//! - `event_type` is written from the event kind, never from input
//! - Wire layout of the envelope
//! - Directed decoding into typed events and the `SystemEvent` union
//! - End-to-end transformer flow from a raw observation to an EarthRanger payload
//!
//! All tests use deterministic fixtures (no side effects)

use gundi_core::domain::ERLocation;
use gundi_core::errors::SchemaError;
use gundi_core::events::{
    EventDecoder, EventType, ObservationDelivered, ObservationTransformedER, SystemEvent,
    TypedEvent,
};
use gundi_core::schemas::{ERObservation, Entity, GundiBase};
use pretty_assertions::assert_eq;
use serde_json::json;

// Import test fixtures
use crate::fixtures::*;

#[test]
fn test_observation_delivered_serialization() {
    // Arrange
    let event = ObservationDelivered::create_with(&factory(), dispatched_observation());

    // Act
    let json = event.to_json().expect("Failed to serialize");

    // Assert
    assert_eq!(
        json,
        json!({
            "event_id": "00000000-0000-4000-8000-000000000001",
            "timestamp": "2023-07-10T19:35:31+00:00",
            "schema_version": "v1",
            "payload": {
                "gundi_id": GUNDI_ID_1,
                "related_to": null,
                "external_id": EXTERNAL_ID,
                "data_provider_id": DATA_PROVIDER_ID,
                "destination_id": DESTINATION_ID,
                "delivered_at": "2023-07-10T19:35:31+00:00"
            },
            "event_type": "ObservationDelivered"
        })
    );
}

#[test]
fn test_event_type_in_input_is_ignored() {
    // Arrange: a producer claims a different event type
    let mut input = ObservationDelivered::create_with(&factory(), dispatched_observation())
        .to_json()
        .unwrap();
    input["event_type"] = json!("ObservationDeliveryFailed");

    // Act
    let event = ObservationDelivered::decode(input).expect("Failed to decode");

    // Assert
    assert_eq!(event.to_json().unwrap()["event_type"], "ObservationDelivered");
}

#[test]
fn test_observation_delivered_round_trip() {
    let original = ObservationDelivered::create_with(&factory(), dispatched_observation());

    let decoded = ObservationDelivered::decode(original.to_json().unwrap()).expect("Failed to decode");

    assert_eq!(decoded, original);
}

#[test]
fn test_decode_as_system_event() {
    let json = ObservationDelivered::create_with(&factory(), dispatched_observation())
        .to_json()
        .unwrap();

    let event = EventDecoder::default()
        .decode_as(EventType::ObservationDeliveryFailed, json)
        .expect("Failed to decode");

    // The caller's tag decides the kind; the payload shape is shared
    assert!(matches!(event, SystemEvent::ObservationDeliveryFailed(_)));
    assert_eq!(event.to_json().unwrap()["event_type"], "ObservationDeliveryFailed");
}

#[test]
fn test_payload_violations_are_prefixed() {
    let mut json = ObservationDelivered::create_with(&factory(), dispatched_observation())
        .to_json()
        .unwrap();
    json["payload"]["delivered_at"] = json!("yesterday");
    json.as_object_mut().unwrap().remove("timestamp");

    let SchemaError::Validation(report) = ObservationDelivered::decode(json).unwrap_err() else {
        panic!("expected a validation error");
    };

    assert!(report.has_violation_at("payload.delivered_at"));
    assert!(report.has_violation_at("timestamp"));
}

#[test]
fn test_delivered_at_must_be_present() {
    let mut json = ObservationDelivered::create_with(&factory(), dispatched_observation())
        .to_json()
        .unwrap();
    json["payload"].as_object_mut().unwrap().remove("delivered_at");

    let SchemaError::Validation(report) = ObservationDelivered::decode(json).unwrap_err() else {
        panic!("expected a validation error");
    };
    assert!(report.has_violation_at("payload.delivered_at"));
}

#[test]
fn test_bad_event_id() {
    let mut json = ObservationDelivered::create_with(&factory(), dispatched_observation())
        .to_json()
        .unwrap();
    json["event_id"] = json!(LEGACY_ID);

    assert!(matches!(
        ObservationDelivered::decode(json),
        Err(SchemaError::Validation(_))
    ));
}

#[test]
fn test_observation_transformed_end_to_end() {
    // Arrange: a raw observation with a +02:00 offset
    let Entity::Observation(observation) = Entity::decode(observation_json()).unwrap() else {
        panic!("expected an observation");
    };

    // Act: transform, wrap, encode, then decode on the other side
    let payload = ERObservation {
        base: GundiBase {
            gundi_id: Some(GUNDI_ID_1.into()),
            ..GundiBase::default()
        },
        manufacturer_id: observation.external_source_id.clone().unwrap_or_default(),
        source_type: observation.source_type.clone(),
        subject_name: observation.source_name.clone(),
        subject_type: observation.subject_type.clone(),
        subject_subtype: None,
        recorded_at: observation.recorded_at,
        location: ERLocation::from(observation.location),
        additional: observation.additional.clone(),
    };
    let sent = ObservationTransformedER::create_with(&factory(), payload);
    let wire = serde_json::to_string(&sent).expect("Failed to serialize");

    let received = EventDecoder::default()
        .decode_str_as("ObservationTransformedER", &wire)
        .expect("Failed to decode");

    // Assert
    let SystemEvent::ObservationTransformedER(received) = received else {
        panic!("expected ObservationTransformedER");
    };
    assert_eq!(received, sent);
    assert_eq!(received.payload().recorded_at.to_rfc3339(), "2021-03-27T09:15:00+00:00");
    assert_eq!(received.payload().location, ERLocation::new(-1.59083, 35.43902).unwrap());

    let json: serde_json::Value = serde_json::from_str(&wire).unwrap();
    assert_eq!(json["event_type"], "ObservationTransformedER");
    assert_eq!(json["payload"]["recorded_at"], "2021-03-27T09:15:00+00:00");
}
