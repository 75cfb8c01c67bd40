// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Timestamp Normalisation
//!
//! Every service must turn the same logical instant into the same bytes.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use gundi_core::domain::timestamp;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Seconds between 1970 and 2100
fn arb_epoch_seconds() -> impl Strategy<Value = i64> {
    0i64..4_102_444_800
}

fn arb_naive() -> impl Strategy<Value = NaiveDateTime> {
    arb_epoch_seconds().prop_map(|secs| {
        DateTime::from_timestamp(secs, 0)
            .expect("in range")
            .naive_utc()
    })
}

/// Offsets from UTC-12:00 to UTC+14:00 in quarter hours
fn arb_offset() -> impl Strategy<Value = FixedOffset> {
    (-48i32..=56).prop_map(|quarters| FixedOffset::east_opt(quarters * 900).expect("in range"))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Naive input is read as UTC and written with an explicit offset
    #[test]
    fn prop_naive_input_is_utc(naive in arb_naive()) {
        let input = naive.format("%Y-%m-%dT%H:%M:%S").to_string();

        let parsed = timestamp::parse(&input).unwrap();

        prop_assert_eq!(timestamp::format(&parsed), format!("{}+00:00", input));
    }

    /// Normalising an already normalised timestamp changes nothing
    #[test]
    fn prop_normalisation_is_idempotent(naive in arb_naive(), offset in arb_offset()) {
        let input = offset.from_utc_datetime(&naive).to_rfc3339();

        let once = timestamp::format(&timestamp::parse(&input).unwrap());
        let twice = timestamp::format(&timestamp::parse(&once).unwrap());

        prop_assert_eq!(once, twice);
    }

    /// Offsets are converted, never dropped
    #[test]
    fn prop_offset_input_is_converted(naive in arb_naive(), offset in arb_offset()) {
        let local = offset.from_utc_datetime(&naive);
        let spaced = local.format("%Y-%m-%d %H:%M:%S%z").to_string();

        let parsed = timestamp::parse(&spaced).unwrap();

        prop_assert_eq!(parsed, Utc.from_utc_datetime(&naive));
    }

    /// Epoch numbers and their RFC 3339 rendering agree
    #[test]
    fn prop_epoch_matches_text(secs in arb_epoch_seconds()) {
        let from_number = timestamp::from_epoch_seconds(secs as f64).unwrap();
        let expected = Utc.timestamp_opt(secs, 0).unwrap();

        prop_assert_eq!(from_number, expected);
    }
}
