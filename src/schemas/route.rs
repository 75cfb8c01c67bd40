// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connections and routes
//!
//! A connection pairs one provider integration with the destinations its
//! data flows to. A route carries the same wiring plus per-route
//! configuration (field mappings and the like).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::integration::Organization;
use crate::domain::{FreeForm, Identifier, NATURAL_KEY};
use crate::errors::FieldViolation;
use crate::validation::{self, Schema};

fn unknown_status() -> String {
    "unknown".to_string()
}

fn check_id_and_name(fields: &Map<String, Value>, path: &str, out: &mut Vec<FieldViolation>) {
    validation::check_identifier(fields, path, "id", false, out);
    validation::check_string(fields, path, "name", false, out);
}

/// Technology of an integration, as listed on a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConnectionIntegrationType {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    /// Natural key (`earth_ranger`)
    #[serde(default)]
    #[validate(length(min = 2, max = 200), regex(path = *NATURAL_KEY))]
    pub value: Option<String>,
}

impl Schema for ConnectionIntegrationType {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id_and_name(fields, path, out);
        validation::check_natural_key(fields, path, "value", out);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConnectionIntegrationOwner {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,
}

impl Schema for ConnectionIntegrationOwner {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        if let Some(fields) = validation::expect_object(value, path, out) {
            check_id_and_name(fields, path, out);
        }
    }
}

/// Integration as it appears inside a connection or route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConnectionIntegration {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    #[serde(rename = "type", default)]
    #[validate(nested)]
    pub integration_type: Option<ConnectionIntegrationType>,

    #[serde(default)]
    pub owner: Option<ConnectionIntegrationOwner>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub base_url: String,

    /// Computed health (`healthy`, `unhealthy`, `unknown`)
    #[serde(default = "unknown_status")]
    pub status: String,
}

impl ConnectionIntegration {
    /// Natural key of the integration type, when known
    pub fn type_value(&self) -> Option<&str> {
        self.integration_type.as_ref().and_then(|t| t.value.as_deref())
    }
}

impl Schema for ConnectionIntegration {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id_and_name(fields, path, out);
        validation::check_nested::<ConnectionIntegrationType>(fields, path, "type", false, out);
        validation::check_nested::<ConnectionIntegrationOwner>(fields, path, "owner", false, out);
        validation::check_string(fields, path, "base_url", false, out);
        validation::check_non_null(fields, path, "status", out);
        validation::check_string(fields, path, "status", false, out);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConnectionRoute {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,
}

impl Schema for ConnectionRoute {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        if let Some(fields) = validation::expect_object(value, path, out) {
            check_id_and_name(fields, path, out);
        }
    }
}

/// Provider-to-destinations wiring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Connection {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[validate(nested)]
    pub provider: ConnectionIntegration,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub destinations: Vec<ConnectionIntegration>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub routing_rules: Vec<ConnectionRoute>,

    #[serde(default)]
    pub default_route: Option<ConnectionRoute>,

    #[serde(default)]
    pub owner: Option<Organization>,

    #[serde(default = "unknown_status")]
    pub status: String,
}

impl Connection {
    /// Identifiers of every destination that has one
    pub fn destination_ids(&self) -> impl Iterator<Item = &Identifier> {
        self.destinations.iter().filter_map(|d| d.id.as_ref())
    }

    /// Destinations whose integration type has the given natural key
    pub fn destinations_of_type<'a>(
        &'a self,
        type_value: &'a str,
    ) -> impl Iterator<Item = &'a ConnectionIntegration> {
        self.destinations
            .iter()
            .filter(move |d| d.type_value() == Some(type_value))
    }
}

impl Schema for Connection {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        validation::check_identifier(fields, path, "id", false, out);
        validation::check_nested::<ConnectionIntegration>(fields, path, "provider", true, out);
        validation::check_list::<ConnectionIntegration>(fields, path, "destinations", false, out);
        validation::check_list::<ConnectionRoute>(fields, path, "routing_rules", false, out);
        validation::check_nested::<ConnectionRoute>(fields, path, "default_route", false, out);
        validation::check_nested::<Organization>(fields, path, "owner", false, out);
        validation::check_non_null(fields, path, "status", out);
        validation::check_string(fields, path, "status", false, out);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RouteConfiguration {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub data: FreeForm,
}

impl Schema for RouteConfiguration {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id_and_name(fields, path, out);
        validation::check_map(fields, path, "data", false, out);
    }
}

/// Routing of data from providers to destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Route {
    #[serde(default)]
    pub id: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub name: String,

    /// Owning organization
    #[serde(default)]
    pub owner: Option<Identifier>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub data_providers: Vec<ConnectionIntegration>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    #[validate(nested)]
    pub destinations: Vec<ConnectionIntegration>,

    #[serde(default)]
    pub configuration: Option<RouteConfiguration>,

    #[serde(default, deserialize_with = "validation::null_as_default")]
    pub additional: FreeForm,
}

impl Route {
    pub fn destination_ids(&self) -> impl Iterator<Item = &Identifier> {
        self.destinations.iter().filter_map(|d| d.id.as_ref())
    }

    /// Whether `integration_id` is one of this route's providers
    pub fn has_provider(&self, integration_id: &Identifier) -> bool {
        self.data_providers
            .iter()
            .any(|p| p.id.as_ref() == Some(integration_id))
    }
}

impl Schema for Route {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        check_id_and_name(fields, path, out);
        validation::check_identifier(fields, path, "owner", false, out);
        validation::check_list::<ConnectionIntegration>(fields, path, "data_providers", false, out);
        validation::check_list::<ConnectionIntegration>(fields, path, "destinations", false, out);
        validation::check_nested::<RouteConfiguration>(fields, path, "configuration", false, out);
        validation::check_map(fields, path, "additional", false, out);
    }
}
