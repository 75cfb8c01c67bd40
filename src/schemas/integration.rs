// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration configuration model
//!
//! Integrations, their technology types, supported actions and per-action
//! configuration. Authored by the portal; every other service reads them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::route::{ConnectionIntegrationOwner, ConnectionIntegrationType, ConnectionRoute};
use crate::domain::{FreeForm, Identifier, NATURAL_KEY};
use crate::errors::{FieldViolation, SchemaError, SchemaResult};
use crate::validation::{self, Schema};

fn enabled_by_default() -> bool {
    true
}

fn check_id(fields: &Map<String, Value>, path: &str, out: &mut Vec<FieldViolation>) {
    validation::check_identifier(fields, path, "id", false, out);
}

fn check_strings(
    fields: &Map<String, Value>,
    path: &str,
    names: &[&str],
    out: &mut Vec<FieldViolation>,
) {
    for name in names {
        validation::check_string(fields, path, name, false, out);
    }
}

/// Organization owning integrations and connections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Organization {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub description: String,
}

impl Schema for Organization {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        check_strings(fields, path, &["name", "description"], out);
    }
}

/// An operation an integration type supports (`pull_events`, `auth`, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntegrationAction {
    #[serde(default)]
    pub id: Option<Identifier>,

    /// Free text grouping (`pull`, `push`, `auth`, `generic`)
    #[serde(rename = "type", default, deserialize_with = "validation::null_as_default")]
    pub action_type: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 2, max = 200), regex(path = *NATURAL_KEY))]
    pub value: Option<String>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub description: String,

    /// JSON Schema of the configuration this action needs
    #[serde(rename = "schema", default, deserialize_with = "validation::null_as_default")]
    pub action_schema: FreeForm,
}

impl Schema for IntegrationAction {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        check_strings(fields, path, &["type", "name", "description"], out);
        validation::check_natural_key(fields, path, "value", out);
        validation::check_map(fields, path, "schema", false, out);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntegrationActionSummary {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(rename = "type", default, deserialize_with = "validation::null_as_default")]
    pub action_type: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 2, max = 200), regex(path = *NATURAL_KEY))]
    pub value: Option<String>,
}

impl Schema for IntegrationActionSummary {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        check_strings(fields, path, &["type", "name"], out);
        validation::check_natural_key(fields, path, "value", out);
    }
}

/// Inbound webhook an integration type can receive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntegrationWebhook {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 2, max = 200), regex(path = *NATURAL_KEY))]
    pub value: Option<String>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub description: String,

    #[serde(rename = "schema", default, deserialize_with = "validation::null_as_default")]
    pub webhook_schema: FreeForm,
}

impl Schema for IntegrationWebhook {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        check_strings(fields, path, &["name", "description"], out);
        validation::check_natural_key(fields, path, "value", out);
        validation::check_map(fields, path, "schema", false, out);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntegrationWebhookSummary {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 2, max = 200), regex(path = *NATURAL_KEY))]
    pub value: Option<String>,
}

impl Schema for IntegrationWebhookSummary {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        validation::check_string(fields, path, "name", false, out);
        validation::check_natural_key(fields, path, "value", out);
    }
}

/// Third-party technology (EarthRanger, SMART, Movebank, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntegrationType {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    /// Natural key (`earth_ranger`)
    #[serde(default)]
    #[validate(length(min = 2, max = 200), regex(path = *NATURAL_KEY))]
    pub value: Option<String>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub actions: Vec<IntegrationAction>,

    #[serde(default)]
    #[validate(nested)]
    pub webhook: Option<IntegrationWebhook>,
}

impl IntegrationType {
    /// Supported action with the given natural key
    pub fn action(&self, value: &str) -> Option<&IntegrationAction> {
        self.actions.iter().find(|a| a.value.as_deref() == Some(value))
    }
}

impl Schema for IntegrationType {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        check_strings(fields, path, &["name", "description"], out);
        validation::check_natural_key(fields, path, "value", out);
        validation::check_list::<IntegrationAction>(fields, path, "actions", false, out);
        validation::check_nested::<IntegrationWebhook>(fields, path, "webhook", false, out);
    }
}

/// Configuration of one action for one integration
///
/// `data` is opaque here; [`parse_data`](Self::parse_data) reads it as one of
/// the typed action configurations in [`actions`](super::actions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntegrationActionConfiguration {
    #[serde(default)]
    pub id: Option<Identifier>,

    /// Integration this configuration belongs to
    #[serde(default)]
    pub integration: Option<Identifier>,

    #[validate(nested)]
    pub action: IntegrationActionSummary,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub data: FreeForm,
}

impl IntegrationActionConfiguration {
    /// Decode `data` as a typed action configuration
    ///
    /// Violations are reported under `data.`.
    pub fn parse_data<T: Schema>(&self) -> SchemaResult<T> {
        validation::decode(Value::Object(self.data.clone())).map_err(|err| match err {
            SchemaError::Validation(report) => report.prefixed("data").into(),
            other => other,
        })
    }
}

impl Schema for IntegrationActionConfiguration {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        validation::check_identifier(fields, path, "integration", false, out);
        validation::check_nested::<IntegrationActionSummary>(fields, path, "action", true, out);
        validation::check_map(fields, path, "data", false, out);
    }
}

/// Configuration of the webhook of one integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WebhookConfiguration {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default)]
    pub integration: Option<Identifier>,

    #[validate(nested)]
    pub webhook: IntegrationWebhookSummary,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub data: FreeForm,
}

impl Schema for WebhookConfiguration {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        validation::check_identifier(fields, path, "integration", false, out);
        validation::check_nested::<IntegrationWebhookSummary>(fields, path, "webhook", true, out);
        validation::check_map(fields, path, "data", false, out);
    }
}

/// A configured connection to a third-party system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Integration {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(nested)]
    pub integration_type: IntegrationType,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub base_url: String,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    pub owner: Organization,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub configurations: Vec<IntegrationActionConfiguration>,

    #[serde(default)]
    #[validate(nested)]
    pub webhook_configuration: Option<WebhookConfiguration>,

    #[serde(default)]
    pub default_route: Option<ConnectionRoute>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub additional: FreeForm,

    /// Health details, opaque to this crate
    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub status: FreeForm,
}

impl Integration {
    /// Configuration of the action with the given natural key
    pub fn configuration(&self, action_value: &str) -> Option<&IntegrationActionConfiguration> {
        self.configurations
            .iter()
            .find(|c| c.action.value.as_deref() == Some(action_value))
    }

    /// Natural key of the integration type, when set
    pub fn type_value(&self) -> Option<&str> {
        self.integration_type.value.as_deref()
    }
}

impl Schema for Integration {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        check_strings(fields, path, &["name", "base_url"], out);
        validation::check_nested::<IntegrationType>(fields, path, "type", true, out);
        validation::check_non_null(fields, path, "enabled", out);
        validation::check_bool(fields, path, "enabled", out);
        validation::check_nested::<Organization>(fields, path, "owner", true, out);
        validation::check_list::<IntegrationActionConfiguration>(fields, path, "configurations", false, out);
        validation::check_nested::<WebhookConfiguration>(fields, path, "webhook_configuration", false, out);
        validation::check_nested::<ConnectionRoute>(fields, path, "default_route", false, out);
        validation::check_map(fields, path, "additional", false, out);
        validation::check_map(fields, path, "status", false, out);
    }
}

/// Integration as announced in configuration events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntegrationSummary {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub base_url: String,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    #[serde(rename = "type")]
    #[validate(nested)]
    pub integration_type: ConnectionIntegrationType,

    pub owner: ConnectionIntegrationOwner,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub configurations: Vec<IntegrationActionConfiguration>,

    #[serde(default)]
    #[validate(nested)]
    pub webhook_configuration: Option<WebhookConfiguration>,

    #[serde(default)]
    pub default_route: Option<ConnectionRoute>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub additional: FreeForm,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub status: FreeForm,
}

impl Schema for IntegrationSummary {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id(fields, path, out);
        check_strings(fields, path, &["name", "base_url"], out);
        validation::check_non_null(fields, path, "enabled", out);
        validation::check_bool(fields, path, "enabled", out);
        validation::check_nested::<ConnectionIntegrationType>(fields, path, "type", true, out);
        validation::check_nested::<ConnectionIntegrationOwner>(fields, path, "owner", true, out);
        validation::check_list::<IntegrationActionConfiguration>(fields, path, "configurations", false, out);
        validation::check_nested::<WebhookConfiguration>(fields, path, "webhook_configuration", false, out);
        validation::check_nested::<ConnectionRoute>(fields, path, "default_route", false, out);
        validation::check_map(fields, path, "additional", false, out);
        validation::check_map(fields, path, "status", false, out);
    }
}
