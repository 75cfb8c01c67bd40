// Copyright (c) 2025 - Cowboy AI, Inc.
//! UUID-or-string identifier value object

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Identifier that is either a UUID or an opaque legacy string
///
/// Legacy producers emit identifiers that are not UUIDs, so both forms are
/// accepted. The original text always survives a round trip: only the
/// canonical lowercase hyphenated form is read as [`Identifier::Uuid`];
/// anything else (uppercase, braced, simple, free text) stays
/// [`Identifier::Opaque`] verbatim.
///
/// # Examples
///
/// ```rust
/// use gundi_core::domain::Identifier;
///
/// let id: Identifier = "bc14b256-dec0-4363-831d-39d0d2d85d50".parse().unwrap();
/// assert!(id.as_uuid().is_some());
///
/// let legacy: Identifier = "901870234".parse().unwrap();
/// assert_eq!(legacy.to_string(), "901870234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Uuid(Uuid),
    Opaque(String),
}

impl Identifier {
    /// Classify a textual identifier
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        match Uuid::parse_str(&text) {
            Ok(uuid) if uuid.hyphenated().to_string() == text => Identifier::Uuid(uuid),
            _ => Identifier::Opaque(text),
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Identifier::Uuid(uuid) => Some(*uuid),
            Identifier::Opaque(_) => None,
        }
    }

    pub fn is_uuid(&self) -> bool {
        matches!(self, Identifier::Uuid(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Uuid(uuid) => write!(f, "{}", uuid.hyphenated()),
            Identifier::Opaque(text) => f.write_str(text),
        }
    }
}

impl FromStr for Identifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Uuid> for Identifier {
    fn from(uuid: Uuid) -> Self {
        Identifier::Uuid(uuid)
    }
}

impl From<&str> for Identifier {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for Identifier {
    fn from(text: String) -> Self {
        Self::parse(text)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Identifier::Uuid(uuid) => serializer.collect_str(&uuid.hyphenated()),
            Identifier::Opaque(text) => serializer.serialize_str(text),
        }
    }
}

struct IdentifierVisitor;

impl<'de> Visitor<'de> for IdentifierVisitor {
    type Value = Identifier;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a UUID or identifier string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Identifier::parse(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Identifier::parse(v))
    }

    // Numeric device ids show up from older integrations
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Identifier::Opaque(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Identifier::Opaque(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdentifierVisitor)
    }
}
