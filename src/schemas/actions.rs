// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-integration action configurations
//!
//! Typed views of [`IntegrationActionConfiguration::data`](super::IntegrationActionConfiguration)
//! for the destinations supported out of the box. Read them with
//! [`parse_data`](super::IntegrationActionConfiguration::parse_data).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::domain::FreeForm;
use crate::errors::{Constraint, FieldViolation};
use crate::validation::{self, Schema};

/// Natural keys of actions an integration type supports
macro_rules! action_keys {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

action_keys!(
    /// EarthRanger actions
    EarthRangerAction {
        Authenticate => "auth",
        PushEvent => "push_event",
    }
);

action_keys!(
    /// Movebank actions
    MovebankAction {
        Authenticate => "auth",
        Permissions => "permissions",
        PushObservations => "push_observations",
    }
);

action_keys!(
    /// SMART Connect actions
    SmartAction {
        Authenticate => "auth",
        PushEvents => "push_events",
    }
);

fn check_optional_strings(
    fields: &serde_json::Map<String, Value>,
    path: &str,
    names: &[&str],
    out: &mut Vec<FieldViolation>,
) {
    for name in names {
        validation::check_string(fields, path, name, false, out);
    }
}

fn check_required_strings(
    fields: &serde_json::Map<String, Value>,
    path: &str,
    names: &[&str],
    out: &mut Vec<FieldViolation>,
) {
    for name in names {
        validation::check_string(fields, path, name, true, out);
    }
}

// ---------------------------------------------------------------------------
// EarthRanger
// ---------------------------------------------------------------------------

/// Credentials for the EarthRanger API (user/password or token)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ERAuthActionConfig {
    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub username: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub password: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub token: String,
}

impl ERAuthActionConfig {
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

impl Schema for ERAuthActionConfig {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        if let Some(fields) = validation::expect_object(value, path, out) {
            check_optional_strings(fields, path, &["username", "password", "token"], out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ERPushEventActionConfig {
    /// Event type applied to every event sent (empty keeps the source's)
    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub event_type: String,
}

impl Schema for ERPushEventActionConfig {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        if let Some(fields) = validation::expect_object(value, path, out) {
            check_optional_strings(fields, path, &["event_type"], out);
        }
    }
}

// ---------------------------------------------------------------------------
// Movebank
// ---------------------------------------------------------------------------

fn default_study() -> String {
    "gundi".to_string()
}

fn default_feed() -> String {
    "gundi/earthranger".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MBAuthActionConfig {
    pub username: String,
    pub password: String,
}

impl Schema for MBAuthActionConfig {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        if let Some(fields) = validation::expect_object(value, path, out) {
            check_required_strings(fields, path, &["username", "password"], out);
        }
    }
}

/// Grants a Movebank user access to one tag's data
///
/// Accepts the Movebank names `login` and `tag` as well as the field names,
/// but not both spellings of the same field in one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MBUserPermission {
    #[serde(alias = "login")]
    pub username: String,

    #[serde(alias = "tag")]
    pub tag_id: String,
}

impl Schema for MBUserPermission {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        for (field, alias) in [("username", "login"), ("tag_id", "tag")] {
            // A key and its alias name the same field; only one may be sent
            if fields.contains_key(field) && fields.contains_key(alias) {
                out.push(FieldViolation::new(
                    validation::join(path, field),
                    Constraint::Custom,
                    format!("`{}` and `{}` are exclusive", field, alias),
                ));
                continue;
            }
            let present = |name: &str| fields.get(name).is_some_and(|v| !v.is_null());
            if present(field) {
                validation::check_string(fields, path, field, true, out);
            } else if present(alias) {
                validation::check_string(fields, path, alias, true, out);
            } else {
                out.push(FieldViolation::new(
                    validation::join(path, field),
                    Constraint::Required,
                    format!("field required (or `{}`)", alias),
                ));
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MBPermissionsActionConfig {
    /// Movebank study name
    #[serde(default = "default_study")]
    pub study: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub default_movebank_usernames: Vec<String>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub permissions: Vec<MBUserPermission>,
}

impl MBPermissionsActionConfig {
    /// Tags a given Movebank user may read
    pub fn tags_for<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a str> {
        self.permissions
            .iter()
            .filter(move |p| p.username == username)
            .map(|p| p.tag_id.as_str())
    }
}

impl Schema for MBPermissionsActionConfig {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        validation::check_non_null(fields, path, "study", out);
        validation::check_string(fields, path, "study", false, out);
        validation::check_string_list(fields, path, "default_movebank_usernames", out);
        validation::check_list::<MBUserPermission>(fields, path, "permissions", false, out);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MBPushObservationsActionConfig {
    /// Movebank feed name
    #[serde(default = "default_feed")]
    pub feed: String,
}

impl Schema for MBPushObservationsActionConfig {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        validation::check_non_null(fields, path, "feed", out);
        validation::check_string(fields, path, "feed", false, out);
    }
}

// ---------------------------------------------------------------------------
// SMART Connect
// ---------------------------------------------------------------------------

fn default_smart_version() -> Option<String> {
    Some("7.5".to_string())
}

fn default_attribute_type() -> String {
    "string".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTAuthActionConfig {
    pub login: String,

    pub password: String,

    /// SMART Connect server version
    #[serde(default = "default_smart_version")]
    pub version: Option<String>,
}

impl Schema for SMARTAuthActionConfig {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_required_strings(fields, path, &["login", "password"], out);
        check_optional_strings(fields, path, &["version"], out);
    }
}

/// Maps a source event type onto a SMART category path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTCategoryPair {
    pub event_type: String,
    pub category_path: String,
}

impl Schema for SMARTCategoryPair {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        if let Some(fields) = validation::expect_object(value, path, out) {
            check_required_strings(fields, path, &["event_type", "category_path"], out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTOptionMap {
    pub from_key: String,
    pub to_key: String,
}

impl Schema for SMARTOptionMap {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        if let Some(fields) = validation::expect_object(value, path, out) {
            check_required_strings(fields, path, &["from_key", "to_key"], out);
        }
    }
}

/// Maps a source attribute onto a SMART attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTAttributeMapper {
    pub from_key: String,

    pub to_key: String,

    #[serde(rename = "type", default = "default_attribute_type")]
    pub attribute_type: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub options_map: Vec<SMARTOptionMap>,

    #[serde(default)]
    pub default_option: Option<String>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub event_types: Vec<String>,
}

impl Schema for SMARTAttributeMapper {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_required_strings(fields, path, &["from_key", "to_key"], out);
        validation::check_non_null(fields, path, "type", out);
        check_optional_strings(fields, path, &["type", "default_option"], out);
        validation::check_list::<SMARTOptionMap>(fields, path, "options_map", false, out);
        validation::check_string_list(fields, path, "event_types", out);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTTransformationRules {
    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub category_map: Vec<SMARTCategoryPair>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub attribute_map: Vec<SMARTAttributeMapper>,
}

impl SMARTTransformationRules {
    /// SMART category path for a source event type
    pub fn category_for(&self, event_type: &str) -> Option<&str> {
        self.category_map
            .iter()
            .find(|pair| pair.event_type == event_type)
            .map(|pair| pair.category_path.as_str())
    }
}

impl Schema for SMARTTransformationRules {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        validation::check_list::<SMARTCategoryPair>(fields, path, "category_map", false, out);
        validation::check_list::<SMARTAttributeMapper>(fields, path, "attribute_map", false, out);
    }
}

/// Where and how events are pushed into SMART
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SMARTPushEventActionConfig {
    #[serde(default)]
    pub ca_uuid: Option<Uuid>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub ca_uuids: Vec<Uuid>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub configurable_models_enabled: Vec<Uuid>,

    #[serde(default)]
    pub configurable_models_lists: Option<FreeForm>,

    #[serde(default)]
    pub transformation_rules: Option<SMARTTransformationRules>,

    /// IANA zone name of the conservation area
    #[serde(default)]
    pub timezone: Option<String>,
}

impl SMARTPushEventActionConfig {
    /// Every configured conservation area, single and list forms combined
    pub fn conservation_areas(&self) -> Vec<Uuid> {
        let mut areas: Vec<Uuid> = self.ca_uuid.into_iter().collect();
        for ca in &self.ca_uuids {
            if !areas.contains(ca) {
                areas.push(*ca);
            }
        }
        areas
    }
}

impl Schema for SMARTPushEventActionConfig {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_uuid(fields, path, "ca_uuid", out);
        check_uuid_list(fields, path, "ca_uuids", out);
        check_uuid_list(fields, path, "configurable_models_enabled", out);
        validation::check_map(fields, path, "configurable_models_lists", false, out);
        validation::check_nested::<SMARTTransformationRules>(fields, path, "transformation_rules", false, out);
        check_optional_strings(fields, path, &["timezone"], out);
    }
}

fn check_uuid(
    fields: &serde_json::Map<String, Value>,
    path: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) {
    if let Some(text) = validation::check_string(fields, path, field, false, out) {
        if Uuid::parse_str(text).is_err() {
            out.push(FieldViolation::new(
                validation::join(path, field),
                Constraint::Type,
                "expected a UUID",
            ));
        }
    }
}

fn check_uuid_list(
    fields: &serde_json::Map<String, Value>,
    path: &str,
    field: &str,
    out: &mut Vec<FieldViolation>,
) {
    validation::check_string_list(fields, path, field, out);
    let Some(items) = fields.get(field).and_then(Value::as_array) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        if let Some(text) = item.as_str() {
            if Uuid::parse_str(text).is_err() {
                out.push(FieldViolation::new(
                    format!("{}[{}]", validation::join(path, field), index),
                    Constraint::Type,
                    "expected a UUID",
                ));
            }
        }
    }
}
