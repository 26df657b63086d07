//! Content Descriptor Object.

use crate::{Extensions, Reference, Schema, SchemaOrBool, error::OpenRpcResult, validation::Validate};
use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// Describes a method parameter or result. Content descriptors MUST have a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ContentDescriptor {
    /// For by-name methods this is the key of the parameter in the params object.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Defaults to false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    pub schema: SchemaOrBool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl ContentDescriptor {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            summary: None,
            description: None,
            required: None,
            schema: schema.into(),
            deprecated: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark this content as required
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Mark this content as optional
    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or(false)
    }
}

impl Validate for ContentDescriptor {
    fn validate(&self) -> OpenRpcResult<()> {
        crate::validation::validate_content_descriptor_name(&self.name)?;
        self.schema.validate().map_err(|e| e.at("schema"))?;
        self.extensions.validate()
    }
}

/// Content Descriptor or Reference Object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentDescriptorOrReference {
    ContentDescriptor(ContentDescriptor),
    Reference(Reference),
}

impl ContentDescriptorOrReference {
    /// Descriptor name, or the pointer itself for references
    pub fn key(&self) -> &str {
        match self {
            ContentDescriptorOrReference::ContentDescriptor(cd) => &cd.name,
            ContentDescriptorOrReference::Reference(r) => &r.reference,
        }
    }
}

impl Validate for ContentDescriptorOrReference {
    fn validate(&self) -> OpenRpcResult<()> {
        match self {
            ContentDescriptorOrReference::ContentDescriptor(cd) => cd.validate(),
            ContentDescriptorOrReference::Reference(r) => r.validate(),
        }
    }
}

impl From<ContentDescriptor> for ContentDescriptorOrReference {
    fn from(cd: ContentDescriptor) -> Self {
        ContentDescriptorOrReference::ContentDescriptor(cd)
    }
}

impl From<Reference> for ContentDescriptorOrReference {
    fn from(reference: Reference) -> Self {
        ContentDescriptorOrReference::Reference(reference)
    }
}

impl<'de> Deserialize<'de> for ContentDescriptorOrReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if crate::reference::is_reference_object(&value) {
            serde_json::from_value(value)
                .map(ContentDescriptorOrReference::Reference)
                .map_err(de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(ContentDescriptorOrReference::ContentDescriptor)
                .map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_descriptor_defaults() {
        let descriptor = ContentDescriptor::new("name", Schema::string());
        assert!(!descriptor.is_required());
        assert!(!descriptor.is_deprecated());
        assert!(descriptor.clone().required().is_required());
        assert!(!descriptor.optional().is_required());
    }

    #[test]
    fn test_content_descriptor_validation() {
        assert!(ContentDescriptor::new("name", Schema::string()).validate().is_ok());
        assert!(ContentDescriptor::new("", Schema::string()).validate().is_err());
        assert!(ContentDescriptor::new("first name", Schema::string())
            .validate()
            .is_err());
    }

    #[test]
    fn test_descriptor_or_reference() {
        let value: ContentDescriptorOrReference =
            serde_json::from_value(json!({ "$ref": "#/components/contentDescriptors/Name" }))
                .unwrap();
        assert!(matches!(value, ContentDescriptorOrReference::Reference(_)));

        let value: ContentDescriptorOrReference = serde_json::from_value(json!({
            "name": "age",
            "required": true,
            "schema": { "type": "integer" }
        }))
        .unwrap();
        assert_eq!(value.key(), "age");
    }

    #[test]
    fn test_schema_errors_surface_through_descriptor() {
        let err = serde_json::from_value::<ContentDescriptorOrReference>(json!({
            "name": "price",
            "schema": { "type": "decimal" }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown JSON Schema type 'decimal'"));
    }
}
