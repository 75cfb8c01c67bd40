// Copyright (c) 2025 - Cowboy AI, Inc.
//! Timestamp normalisation
//!
//! Every instant that crosses the wire is stored as UTC and written as
//! RFC 3339 with an explicit `+00:00` offset. Inputs without timezone
//! information are read as UTC; inputs with an offset are converted.
//!
//! Accepted inputs:
//! - RFC 3339 (`2021-03-21T12:01:02Z`, `2021-03-21T12:01:02-07:00`)
//! - ISO 8601 with a space separator and/or a colon-less offset
//!   (`2021-03-27 11:15:00+0200`)
//! - naive date-times (`2021-03-21T12:01:02`, `2021-03-21 12:01:02.5`)
//! - Unix epoch seconds as a JSON number, or milliseconds when the value is
//!   above [`MS_WATERSHED`]
//!
//! Instants are kept to microsecond precision; finer digits are truncated.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Timelike, Utc};
use thiserror::Error;

/// Timestamp parse error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Timestamp is empty")]
    Empty,

    #[error("Unrecognised timestamp format: {0}")]
    InvalidFormat(String),

    #[error("Epoch value out of range: {0}")]
    OutOfRange(String),
}

/// Epoch numbers with a magnitude above this are milliseconds
pub const MS_WATERSHED: f64 = 2e10;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a textual timestamp into a UTC instant
pub fn parse(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TimestampError::Empty);
    }

    parse_any(input).map(|instant| instant.trunc_subsecs(6))
}

fn parse_any(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    // `Z` suffix with a space separator
    let zulu = input
        .strip_suffix('Z')
        .or_else(|| input.strip_suffix('z'))
        .map(|rest| format!("{}+00:00", rest));
    let candidate = zulu.as_deref().unwrap_or(input);

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(candidate, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(TimestampError::InvalidFormat(input.to_string()))
}

/// Interpret a Unix epoch number, scaling milliseconds down to seconds
///
/// Magnitudes above [`MS_WATERSHED`] are divided by 1000 until they fall
/// below it, so `1616328062000` and `1616328062` name the same instant.
pub fn from_epoch(value: f64) -> Result<DateTime<Utc>, TimestampError> {
    if !value.is_finite() {
        return Err(TimestampError::OutOfRange(value.to_string()));
    }
    let mut seconds = value;
    while seconds.abs() > MS_WATERSHED {
        seconds /= 1000.0;
    }
    from_epoch_seconds(seconds)
}

/// Interpret a Unix epoch value in seconds
pub fn from_epoch_seconds(seconds: f64) -> Result<DateTime<Utc>, TimestampError> {
    if !seconds.is_finite() {
        return Err(TimestampError::OutOfRange(seconds.to_string()));
    }
    let mut whole = seconds.floor();
    let mut micros = ((seconds - whole) * 1e6).round();
    if micros >= 1e6 {
        whole += 1.0;
        micros = 0.0;
    }
    Utc.timestamp_opt(whole as i64, micros as u32 * 1_000)
        .single()
        .ok_or_else(|| TimestampError::OutOfRange(seconds.to_string()))
}

/// Parse a JSON value (string or epoch number) into a UTC instant
pub fn from_json(value: &serde_json::Value) -> Result<DateTime<Utc>, TimestampError> {
    match value {
        serde_json::Value::String(text) => parse(text),
        serde_json::Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| TimestampError::OutOfRange(number.to_string()))
            .and_then(from_epoch),
        other => Err(TimestampError::InvalidFormat(other.to_string())),
    }
}

/// Canonical wire form: RFC 3339 with an explicit `+00:00`
///
/// Sub-seconds are written as six digits, and only when present.
pub fn format(instant: &DateTime<Utc>) -> String {
    let seconds = if instant.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    instant.to_rfc3339_opts(seconds, false)
}

/// `#[serde(with = "timestamp::utc")]` for required instants
pub mod utc {
    use std::fmt;

    use chrono::{DateTime, Utc};
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        deserializer.deserialize_any(InstantVisitor)
    }

    pub(super) struct InstantVisitor;

    impl<'de> Visitor<'de> for InstantVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an ISO 8601 timestamp or epoch seconds")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            super::parse(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            super::from_epoch(v as f64).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            super::from_epoch(v as f64).map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            super::from_epoch(v).map_err(E::custom)
        }
    }
}

/// `#[serde(default, with = "timestamp::utc_option")]` for optional instants
pub mod utc_option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        instant: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match instant {
            Some(instant) => serializer.serialize_str(&super::format(instant)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super::utc")] DateTime<Utc>);

        Option::<Wrapped>::deserialize(deserializer).map(|opt| opt.map(|w| w.0))
    }
}
