//! Reference Object.
//!
//! A `$ref` pointer to another part of the document, usually an entry under
//! `components`.

use crate::error::OpenRpcResult;
use crate::validation::Validate;
use bon::Builder;
use serde::{Deserialize, Serialize};

const COMPONENT_KINDS: &[&str] = &[
    "schemas",
    "contentDescriptors",
    "examples",
    "links",
    "errors",
    "examplePairingObjects",
    "tags",
];

/// A `{"$ref": "..."}` object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// Reference to `#/components/{component_type}/{name}`
    pub fn component(component_type: &str, name: &str) -> Self {
        Self {
            reference: format!("#/components/{component_type}/{name}"),
        }
    }

    pub fn schema(name: &str) -> Self {
        Self::component("schemas", name)
    }

    pub fn content_descriptor(name: &str) -> Self {
        Self::component("contentDescriptors", name)
    }

    /// Check if this is an internal reference (starts with #)
    pub fn is_internal(&self) -> bool {
        self.reference.starts_with('#')
    }

    /// Split `#/components/{type}/{name}` into `(type, name)`.
    ///
    /// Returns `None` for external references and other pointer shapes.
    pub fn component_parts(&self) -> Option<(&str, &str)> {
        let path = self.reference.strip_prefix("#/components/")?;
        let (kind, name) = path.split_once('/')?;
        if kind.is_empty() || name.is_empty() {
            return None;
        }
        Some((kind, name))
    }

    /// The last pointer segment, i.e. the referenced component's name.
    pub fn target_name(&self) -> &str {
        self.reference
            .rsplit_once('/')
            .map_or(self.reference.as_str(), |(_, name)| name)
    }
}

/// Whether a raw JSON value is written as a Reference Object
pub(crate) fn is_reference_object(value: &serde_json::Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key("$ref"))
}

impl Validate for Reference {
    fn validate(&self) -> OpenRpcResult<()> {
        if self.reference.is_empty() {
            return Err(crate::error::OpenRpcError::validation(
                "Reference string cannot be empty",
            ));
        }

        if !self.is_internal() {
            return crate::validation::validate_url(&self.reference);
        }

        match self.component_parts() {
            Some((kind, name)) => {
                if !COMPONENT_KINDS.contains(&kind) {
                    return Err(crate::error::OpenRpcError::validation(format!(
                        "Invalid component type in reference: {kind}"
                    )));
                }
                crate::validation::validate_component_key(name)
            }
            None if self.reference.starts_with("#/") => Ok(()),
            None => Err(crate::error::OpenRpcError::validation(format!(
                "Invalid internal reference format: {}",
                self.reference
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_creation() {
        let ref_obj = Reference::schema("Person");
        assert_eq!(ref_obj.reference, "#/components/schemas/Person");

        let ref_obj = Reference::content_descriptor("PersonParam");
        assert_eq!(
            ref_obj.reference,
            "#/components/contentDescriptors/PersonParam"
        );
    }

    #[test]
    fn test_component_parts() {
        assert_eq!(
            Reference::schema("Person").component_parts(),
            Some(("schemas", "Person"))
        );
        assert_eq!(
            Reference::new("https://example.com/person.json").component_parts(),
            None
        );
        assert_eq!(Reference::new("#/definitions/Person").component_parts(), None);
    }

    #[test]
    fn test_target_name() {
        assert_eq!(Reference::schema("Person").target_name(), "Person");
        assert_eq!(
            Reference::new("#/components/schemas/Person/definitions/Address").target_name(),
            "Address"
        );
        assert_eq!(Reference::new("Person").target_name(), "Person");
    }

    #[test]
    fn test_reference_validation() {
        assert!(Reference::schema("Person").validate().is_ok());
        assert!(Reference::new("#/definitions/Person").validate().is_ok());
        assert!(Reference::new("https://example.com/a.json").validate().is_ok());

        assert!(Reference::new("").validate().is_err());
        assert!(Reference::new("#/components/widgets/Person").validate().is_err());
        assert!(Reference::new("#/components/schemas/my person").validate().is_err());
        assert!(Reference::new("#Person").validate().is_err());
    }

    #[test]
    fn test_reference_serialization() {
        let ref_obj = Reference::schema("Person");
        let json = serde_json::to_string(&ref_obj).unwrap();
        assert_eq!(json, "{\"$ref\":\"#/components/schemas/Person\"}");

        let deserialized: Reference = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, ref_obj);
    }
}
