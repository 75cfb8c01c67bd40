// Copyright (c) 2025 - Cowboy AI, Inc.
//! Decoding policy
//!
//! Which schema versions a consumer is prepared to read, per event type.
//! Out of the box every event type accepts only the version producers
//! currently publish; anything else needs an explicit opt-in here or a
//! registered upcaster.

use std::collections::{BTreeMap, BTreeSet};
use std::env::{self, VarError};

use crate::errors::{SchemaError, SchemaResult};
use crate::events::{EventType, SchemaVersion};

/// Environment variable holding extra accepted versions
///
/// Format: `EventType=v1|v2,OtherEventType=v3`
pub const ACCEPTED_VERSIONS_ENV: &str = "GUNDI_ACCEPTED_SCHEMA_VERSIONS";

/// Accepted schema versions per event type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    accepted_versions: BTreeMap<EventType, BTreeSet<SchemaVersion>>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        let accepted_versions = EventType::ALL
            .iter()
            .map(|event_type| (*event_type, BTreeSet::from([event_type.current_version()])))
            .collect();
        Self { accepted_versions }
    }
}

impl DecodeConfig {
    /// Defaults plus whatever [`ACCEPTED_VERSIONS_ENV`] adds
    pub fn from_env() -> SchemaResult<Self> {
        match env::var(ACCEPTED_VERSIONS_ENV) {
            Ok(text) => Self::default().with_accepted(&text),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(_)) => Err(SchemaError::Malformed(format!(
                "{} is not valid unicode",
                ACCEPTED_VERSIONS_ENV
            ))),
        }
    }

    /// Also accept `version` for `event_type`
    pub fn accept(mut self, event_type: EventType, version: impl Into<SchemaVersion>) -> Self {
        self.accepted_versions
            .entry(event_type)
            .or_default()
            .insert(version.into());
        self
    }

    /// Add every `EventType=v1|v2` entry of a comma separated list
    pub fn with_accepted(mut self, text: &str) -> SchemaResult<Self> {
        for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, versions) = entry.split_once('=').ok_or_else(|| {
                SchemaError::Malformed(format!("expected EventType=versions, found `{}`", entry))
            })?;
            let event_type: EventType = name.trim().parse()?;

            let mut added = 0;
            for version in versions.split('|').map(str::trim).filter(|v| !v.is_empty()) {
                self = self.accept(event_type, version);
                added += 1;
            }
            if added == 0 {
                return Err(SchemaError::Malformed(format!(
                    "no versions listed for {}",
                    event_type
                )));
            }
        }
        Ok(self)
    }

    pub fn accepts(&self, event_type: EventType, version: &SchemaVersion) -> bool {
        self.accepted_versions
            .get(&event_type)
            .is_some_and(|versions| versions.contains(version))
    }

    /// Accepted versions of `event_type`, in order
    pub fn accepted_versions(&self, event_type: EventType) -> impl Iterator<Item = &SchemaVersion> {
        self.accepted_versions
            .get(&event_type)
            .into_iter()
            .flat_map(|versions| versions.iter())
    }
}
