// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for gundi-core
//!
//! Provides deterministic test data for entity and envelope tests.
//! All UUIDs and timestamps are fixed constants to ensure tests are reproducible.
//!
//! # Design Principles
//! - All test data is deterministic (no `Uuid::new_v4()` or `Utc::now()`)
//! - Envelopes are built through `EnvelopeFactory` with a fixed clock and sequential ids
//! - Raw JSON fixtures mirror what producers put on the wire

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use gundi_core::clock::{FixedClock, SequentialIds};
use gundi_core::domain::Location;
use gundi_core::events::EnvelopeFactory;
use gundi_core::schemas::{DispatchedObservation, GundiEntity, Observation};

// Fixed test identifiers
pub const GUNDI_ID_1: &str = "23ca4b15-18b6-4cf4-9da6-36dd69c6f638";
pub const SOURCE_ID_1: &str = "bc14b256-dec0-4363-831d-39d0d2d85d50";
pub const DATA_PROVIDER_ID: &str = "ddd0946d-15b0-4308-b93d-e0470b6d33b6";
pub const DESTINATION_ID: &str = "338225f3-91f9-4fe1-b013-353a229ce504";
pub const EXTERNAL_ID: &str = "d5a8e1a4-2b5a-4c52-8f4f-6d3ce1d0fb2b";
pub const EVENT_ID_1: &str = "9b1f3b8e-9d55-4a7b-9a3c-3f1f5c6d7e80";

/// Legacy producers still send non-UUID identifiers
pub const LEGACY_ID: &str = "901870234";

// Fixed envelope timestamp (2023-07-10T19:35:31Z)
pub const FIXED_TIMESTAMP: &str = "2023-07-10T19:35:31Z";

/// Parse a fixed UUID from a constant string
pub fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid UUID in test fixture")
}

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

/// Envelope factory pinned to the fixed timestamp, ids counting from 1
pub fn factory() -> EnvelopeFactory<FixedClock, SequentialIds> {
    EnvelopeFactory::new(FixedClock(fixed_timestamp()), SequentialIds::starting_at(1))
}

/// Raw observation as a tracking integration would submit it
pub fn observation_json() -> Value {
    json!({
        "observation_type": "obv",
        "gundi_id": GUNDI_ID_1,
        "data_provider_id": DATA_PROVIDER_ID,
        "source_id": SOURCE_ID_1,
        "external_source_id": "test-device",
        "source_name": "Logistics Truck A",
        "type": "tracking-device",
        "subject_type": "vehicle",
        "recorded_at": "2021-03-27 11:15:00+0200",
        "location": {"lat": -1.59083, "lon": 35.43902},
        "additional": {"speed_kmph": 10}
    })
}

/// Raw event as a reporting integration would submit it
pub fn event_json() -> Value {
    json!({
        "observation_type": "ev",
        "source_id": "ac1b9cdc-a193-4515-b446-b177bcc5f342",
        "external_source_id": "camera123",
        "recorded_at": "2023-07-04T21:38:00",
        "location": {"lat": -51.688246, "lon": -72.704459},
        "title": "Leopard Detected",
        "event_type": "leopard_sighting",
        "event_details": {"site_name": "Camera2G", "species": "Leopard", "tags": ["female adult", "male child"]}
    })
}

/// Raw attachment
pub fn attachment_json() -> Value {
    json!({
        "observation_type": "att",
        "gundi_id": "7a6b2d9a-8c4c-4e5b-9c2b-1f2d3a4b5c6d",
        "related_to": GUNDI_ID_1,
        "file_path": "attachments/ac1b9cdc_wildcat.jpg"
    })
}

/// Observation built in code
pub fn observation() -> Observation {
    Observation::new(
        DateTime::parse_from_rfc3339("2021-03-27T09:15:00Z")
            .expect("Invalid timestamp in test fixture")
            .with_timezone(&Utc),
        Location::new(-1.59083, 35.43902).expect("Invalid location in test fixture"),
    )
    .with_source_id(SOURCE_ID_1)
    .with_source_name("Logistics Truck A")
    .with_gundi_id(GUNDI_ID_1)
    .with_data_provider_id(DATA_PROVIDER_ID)
}

/// Successful delivery report
pub fn dispatched_observation() -> DispatchedObservation {
    DispatchedObservation {
        gundi_id: Some(GUNDI_ID_1.into()),
        related_to: None,
        external_id: Some(EXTERNAL_ID.into()),
        data_provider_id: Some(DATA_PROVIDER_ID.into()),
        destination_id: Some(DESTINATION_ID.into()),
        delivered_at: Some(fixed_timestamp()),
    }
}

/// Raw integration as the portal serves it
pub fn integration_json() -> Value {
    json!({
        "id": "779ff3ab-5589-4f4c-9e0a-ae8d6c9edff0",
        "name": "Gundi ER",
        "base_url": "https://gundi-er.pamdas.org",
        "enabled": true,
        "type": {
            "id": "50229e21-a9fe-4caa-862c-8592dfb2479b",
            "name": "EarthRanger",
            "value": "earth_ranger",
            "description": "Integration type for Earth Ranger Sites",
            "actions": [
                {
                    "id": "80448d1c-4696-4b32-a59f-f3494fc949ac",
                    "type": "auth",
                    "name": "Authenticate",
                    "value": "auth",
                    "description": "Authenticate against Earth Ranger",
                    "schema": {"type": "object", "required": ["token"], "properties": {"token": {"type": "string"}}}
                },
                {
                    "id": "4b721b37-f4ca-4f0e-b07d-b1ce1f2b0c29",
                    "type": "push",
                    "name": "Push Events",
                    "value": "push_event",
                    "description": "Send events to EarthRanger",
                    "schema": {}
                }
            ],
            "webhook": null
        },
        "owner": {
            "id": "a91b400b-482a-4546-8fcb-ee42b01deeb6",
            "name": "Test Org",
            "description": ""
        },
        "configurations": [
            {
                "id": "5577c323-b961-4277-9047-b1f27fd6a1b7",
                "integration": "779ff3ab-5589-4f4c-9e0a-ae8d6c9edff0",
                "action": {"id": "80448d1c-4696-4b32-a59f-f3494fc949ac", "type": "auth", "name": "Authenticate", "value": "auth"},
                "data": {"token": "1190d87681cd1d01ad07c2a0db8d2af8"}
            },
            {
                "id": "7e8d1e6a-2f4a-4c0d-9b1a-8c6d5e4f3a2b",
                "integration": "779ff3ab-5589-4f4c-9e0a-ae8d6c9edff0",
                "action": {"id": "4b721b37-f4ca-4f0e-b07d-b1ce1f2b0c29", "type": "push", "name": "Push Events", "value": "push_event"},
                "data": {"event_type": "animal_sighting"}
            }
        ],
        "additional": {},
        "default_route": null,
        "status": {"id": "mockid-b16a-4dbd-ad32-197c58aeef59", "is_healthy": true}
    })
}
