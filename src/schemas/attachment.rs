// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attachment entity (`att`)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::base::{impl_gundi_entity, GundiBase};
use super::event::default_external_source_id;
use super::stream::{StreamEntity, StreamTag, StreamType};
use crate::domain::Identifier;
use crate::errors::FieldViolation;
use crate::validation::{self, Schema};

/// A file (image, document) linked to another entity through `related_to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Attachment {
    #[serde(flatten)]
    pub base: GundiBase,

    #[serde(default)]
    pub source_id: Option<Identifier>,

    #[serde(default = "default_external_source_id")]
    pub external_source_id: Option<String>,

    pub file_path: String,

    #[serde(default)]
    observation_type: StreamTag<Attachment>,
}

impl StreamEntity for Attachment {
    const STREAM_TYPE: StreamType = StreamType::Attachment;
}

impl_gundi_entity!(Attachment);

impl Attachment {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            base: GundiBase::default(),
            source_id: None,
            external_source_id: default_external_source_id(),
            file_path: file_path.into(),
            observation_type: StreamTag::new(),
        }
    }

    pub fn with_source_id(mut self, id: impl Into<Identifier>) -> Self {
        self.source_id = Some(id.into());
        self
    }

    pub fn stream_type(&self) -> StreamType {
        self.observation_type.stream_type()
    }
}

impl Schema for Attachment {
    fn check_shape(value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
        let Some(fields) = validation::expect_object(value, path, out) else {
            return;
        };
        GundiBase::check_fields(fields, path, out);
        validation::check_identifier(fields, path, "source_id", false, out);
        validation::check_string(fields, path, "external_source_id", false, out);
        validation::check_string(fields, path, "file_path", true, out);
    }
}
