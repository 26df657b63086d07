//! Components Object.

use crate::{
    ContentDescriptor, Extensions, Reference, Schema,
    error::{OpenRpcError, OpenRpcResult},
    validation::Validate,
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reusable objects referenced from elsewhere in the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Components {
    #[serde(rename = "contentDescriptors", skip_serializing_if = "Option::is_none")]
    pub content_descriptors: Option<IndexMap<String, ContentDescriptor>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<IndexMap<String, Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<IndexMap<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<IndexMap<String, Value>>,

    #[serde(
        rename = "examplePairingObjects",
        skip_serializing_if = "Option::is_none"
    )]
    pub example_pairings: Option<IndexMap<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<IndexMap<String, Value>>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content descriptor
    pub fn with_content_descriptor(
        mut self,
        name: impl Into<String>,
        content_descriptor: ContentDescriptor,
    ) -> Self {
        self.content_descriptors
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), content_descriptor);
        self
    }

    /// Add a schema
    pub fn with_schema(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.schemas
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
        self
    }

    /// Named schemas in document order
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.schemas.iter().flatten()
    }

    /// Look up the content descriptor a `#/components/contentDescriptors/..` reference points at
    pub fn resolve_content_descriptor(
        &self,
        reference: &Reference,
    ) -> OpenRpcResult<&ContentDescriptor> {
        let name = match reference.component_parts() {
            Some(("contentDescriptors", name)) => name,
            _ => {
                return Err(OpenRpcError::reference(
                    "expected a reference to components.contentDescriptors",
                    &reference.reference,
                ));
            }
        };

        self.content_descriptors
            .as_ref()
            .and_then(|descriptors| descriptors.get(name))
            .ok_or_else(|| {
                OpenRpcError::reference(
                    format!("content descriptor '{name}' is not defined"),
                    &reference.reference,
                )
            })
    }
}

impl Validate for Components {
    fn validate(&self) -> OpenRpcResult<()> {
        if let Some(ref descriptors) = self.content_descriptors {
            for (key, descriptor) in descriptors {
                crate::validation::validate_component_key(key)?;
                descriptor
                    .validate()
                    .map_err(|e| e.at(format!("contentDescriptors.{key}")))?;
            }
        }

        for (key, schema) in self.schemas() {
            crate::validation::validate_component_key(key)?;
            schema.validate().map_err(|e| e.at(format!("schemas.{key}")))?;
        }

        self.extensions.validate()
    }
}
