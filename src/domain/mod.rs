// Copyright (c) 2025 - Cowboy AI, Inc.
//! Wire-level value objects
//!
//! Building blocks shared by every entity and payload:
//!
//! - [`Identifier`] - UUID or opaque legacy string, text preserved verbatim
//! - [`Location`] / [`ERLocation`] - range-checked coordinates
//! - [`timestamp`] - UTC normalisation for every instant on the wire
//! - [`FreeForm`] - ordered, opaque pass-through maps (`additional`, `annotations`, ...)
//! - [`NATURAL_KEY`] - pattern for programmatic `value` keys

use once_cell::sync::Lazy;
use regex::Regex;

pub mod identifier;
pub mod location;
pub mod timestamp;

pub use identifier::Identifier;
pub use location::{ERLocation, Location};
pub use timestamp::TimestampError;

/// Ordered string-keyed map of uninterpreted values
///
/// Key order is preserved through decode and encode.
pub type FreeForm = serde_json::Map<String, serde_json::Value>;

/// Lowercase alphanumerics and underscores (`earth_ranger`, `pull_events`)
pub static NATURAL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]+$").expect("natural key pattern is valid"));

/// Length bounds for natural keys (inclusive)
pub const NATURAL_KEY_LENGTH: (u64, u64) = (2, 200);

/// Whether `text` is a well-formed natural key
pub fn is_natural_key(text: &str) -> bool {
    let (min, max) = NATURAL_KEY_LENGTH;
    let len = text.chars().count() as u64;
    (min..=max).contains(&len) && NATURAL_KEY.is_match(text)
}
