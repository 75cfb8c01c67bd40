// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Entities
//!
//! Proves for generated entities:
//! - decode(encode(e)) == e, through `Value` and through JSON text
//! - the discriminator written is always the type's own
//! - unknown discriminators are refused
//! - latitude bounds are inclusive and enforced

use chrono::{DateTime, Utc};
use gundi_core::domain::{Identifier, Location};
use gundi_core::errors::SchemaError;
use gundi_core::schemas::{Attachment, Entity, Event, GundiEntity, Observation, StreamType};
use gundi_core::validation;
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Strategies
// ============================================================================

fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800).prop_map(|secs| DateTime::from_timestamp(secs, 0).expect("in range"))
}

fn arb_location() -> impl Strategy<Value = Location> {
    (
        -90.0f64..=90.0,
        -180.0f64..=360.0,
        0.0f64..5000.0,
        proptest::option::of(0i64..50),
    )
        .prop_map(|(lat, lon, alt, hdop)| {
            let location = Location::new(lat, lon)
                .and_then(|fix| fix.with_alt(alt))
                .expect("in range");
            match hdop {
                Some(hdop) => location.with_hdop(hdop),
                None => location,
            }
        })
}

/// UUIDs and legacy free-text ids
fn arb_identifier() -> impl Strategy<Value = Identifier> {
    prop_oneof![
        any::<u128>().prop_map(|n| Identifier::Uuid(uuid::Uuid::from_u128(n))),
        "[A-Za-z0-9_-]{1,24}".prop_map(Identifier::parse),
    ]
}

fn arb_observation() -> impl Strategy<Value = Observation> {
    (
        arb_instant(),
        arb_location(),
        arb_identifier(),
        proptest::option::of(arb_identifier()),
        proptest::option::of("[a-zA-Z ]{1,20}"),
    )
        .prop_map(|(recorded_at, location, source_id, gundi_id, source_name)| {
            let mut observation = Observation::new(recorded_at, location).with_source_id(source_id);
            if let Some(id) = gundi_id {
                observation = observation.with_gundi_id(id);
            }
            if let Some(name) = source_name {
                observation = observation.with_source_name(name);
            }
            observation
        })
}

fn arb_event() -> impl Strategy<Value = Event> {
    (
        arb_instant(),
        proptest::option::of(arb_location()),
        proptest::option::of("[a-z_]{2,20}"),
    )
        .prop_map(|(recorded_at, location, event_type)| {
            let mut event = Event::new(recorded_at).with_title("Generated");
            if let Some(location) = location {
                event = event.with_location(location);
            }
            if let Some(event_type) = event_type {
                event = event.with_event_type(event_type);
            }
            event
        })
}

fn arb_entity() -> impl Strategy<Value = Entity> {
    prop_oneof![
        arb_observation().prop_map(Entity::from),
        arb_event().prop_map(Entity::from),
        ("[a-z0-9/_]{1,40}\\.jpg", arb_identifier())
            .prop_map(|(path, related)| Entity::from(Attachment::new(path).with_related_to(related))),
    ]
}

fn is_known_tag(tag: &str) -> bool {
    StreamType::ALL.iter().any(|stream| stream.as_str() == tag)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Encoding then decoding returns the same entity
    #[test]
    fn prop_round_trip(entity in arb_entity()) {
        let encoded = entity.encode().unwrap();
        let decoded = Entity::decode(encoded).unwrap();

        prop_assert_eq!(decoded, entity);
    }

    /// Coordinates and every other field survive a trip through JSON text
    #[test]
    fn prop_text_round_trip(entity in arb_entity()) {
        let text = serde_json::to_string(&entity).unwrap();
        let decoded = Entity::decode_str(&text).unwrap();

        prop_assert_eq!(decoded, entity);
    }

    /// Latitudes written as text read back bit for bit
    #[test]
    fn prop_location_text_round_trip(lat in -90.0f64..=90.0, lon in -180.0f64..=360.0) {
        let fix = Location::new(lat, lon).unwrap();
        let text = serde_json::to_string(&fix).unwrap();
        let decoded: Location = validation::decode_str(&text).unwrap();

        prop_assert_eq!(decoded.lat().to_bits(), lat.to_bits());
        prop_assert_eq!(decoded.lon().to_bits(), lon.to_bits());
    }

    /// The written discriminator matches the Rust type
    #[test]
    fn prop_discriminator_is_fixed(entity in arb_entity()) {
        let encoded = entity.encode().unwrap();

        prop_assert_eq!(encoded["observation_type"].as_str(), Some(entity.stream_type().as_str()));
    }

    /// Whatever the input claims, a typed decode keeps the type's tag
    #[test]
    fn prop_override_is_ignored(observation in arb_observation(), tag in "[a-z]{1,6}") {
        let mut json = validation::encode(&observation).unwrap();
        json["observation_type"] = json!(tag);

        let decoded: Observation = validation::decode(json).unwrap();

        let reencoded = validation::encode(&decoded).unwrap();
        prop_assert_eq!(reencoded["observation_type"].as_str(), Some("obv"));
    }

    /// Tags outside the registry are refused, never guessed
    #[test]
    fn prop_unknown_tags_are_refused(
        observation in arb_observation(),
        tag in "[a-z]{1,6}".prop_filter("unknown tag", |t| !is_known_tag(t)),
    ) {
        let mut json = validation::encode(&observation).unwrap();
        json["observation_type"] = json!(tag.clone());

        prop_assert_eq!(Entity::decode(json).unwrap_err(), SchemaError::UnknownDiscriminator { value: tag });
    }

    /// Latitudes beyond the poles are rejected with the `lat` path
    #[test]
    fn prop_latitude_out_of_range(lat in prop_oneof![90.000001f64..1000.0, -1000.0f64..-90.000001]) {
        let SchemaError::Validation(report) = Location::new(lat, 0.0).unwrap_err() else {
            panic!("expected a validation error");
        };

        prop_assert!(report.has_violation_at("lat"));
    }
}
