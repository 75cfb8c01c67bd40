// Copyright (c) 2025 - Cowboy AI, Inc.
//! Common identity and provenance fields

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::{FreeForm, Identifier};
use crate::errors::FieldViolation;
use crate::validation::{self, Schema};

fn default_owner() -> String {
    "na".to_string()
}

/// Fields shared by every entity and most destination payloads
///
/// `gundi_id` is assigned once by the ingestion layer. `related_to` points at
/// a causally linked entity (an update at its original event, for instance);
/// the link is advisory and not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GundiBase {
    #[serde(default)]
    pub gundi_id: Option<Identifier>,

    #[serde(default)]
    pub related_to: Option<Identifier>,

    #[serde(default = "default_owner")]
    pub owner: String,

    /// Integration that provided the data
    #[serde(default)]
    pub data_provider_id: Option<Identifier>,

    /// Passed through to destination systems untouched
    #[serde(default)]
    pub annotations: Option<FreeForm>,
}

impl Default for GundiBase {
    fn default() -> Self {
        Self {
            gundi_id: None,
            related_to: None,
            owner: default_owner(),
            data_provider_id: None,
            annotations: None,
        }
    }
}

impl GundiBase {
    /// Shape checks for the flattened base fields of an enclosing object
    pub fn check_fields(fields: &Map<String, Value>, path: &str, out: &mut Vec<FieldViolation>) {
        validation::check_identifier(fields, path, "gundi_id", false, out);
        validation::check_identifier(fields, path, "related_to", false, out);
        validation::check_non_null(fields, path, "owner", out);
        validation::check_string(fields, path, "owner", false, out);
        validation::check_identifier(fields, path, "data_provider_id", false, out);
        validation::check_map(fields, path, "annotations", false, out);
    }
}

impl Schema for GundiBase {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        if let Some(fields) = validation::expect_object(value, path, out) {
            Self::check_fields(fields, path, out);
        }
    }
}

/// Access to the shared base fields, plus builder shorthands
pub trait GundiEntity: Sized {
    fn base(&self) -> &GundiBase;

    fn base_mut(&mut self) -> &mut GundiBase;

    fn gundi_id(&self) -> Option<&Identifier> {
        self.base().gundi_id.as_ref()
    }

    fn related_to(&self) -> Option<&Identifier> {
        self.base().related_to.as_ref()
    }

    fn with_gundi_id(mut self, id: impl Into<Identifier>) -> Self {
        self.base_mut().gundi_id = Some(id.into());
        self
    }

    fn with_related_to(mut self, id: impl Into<Identifier>) -> Self {
        self.base_mut().related_to = Some(id.into());
        self
    }

    fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.base_mut().owner = owner.into();
        self
    }

    fn with_data_provider_id(mut self, id: impl Into<Identifier>) -> Self {
        self.base_mut().data_provider_id = Some(id.into());
        self
    }

    fn with_annotations(mut self, annotations: FreeForm) -> Self {
        self.base_mut().annotations = Some(annotations);
        self
    }
}

/// Implement [`GundiEntity`] for a type with a `base: GundiBase` field
macro_rules! impl_gundi_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::schemas::base::GundiEntity for $ty {
                fn base(&self) -> &$crate::schemas::base::GundiBase {
                    &self.base
                }

                fn base_mut(&mut self) -> &mut $crate::schemas::base::GundiBase {
                    &mut self.base
                }
            }
        )+
    };
}

pub(crate) use impl_gundi_entity;
