//! Method Object.

use crate::{
    ContentDescriptorOrReference, Extensions, Reference, Server,
    error::OpenRpcResult,
    validation::{Validate, ValidateUnique},
};
use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// Describes the interface for the given method name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Method {
    /// The JSON-RPC `method` member. MUST be unique within the document.
    pub name: String,

    /// Tags are kept as raw JSON; generators only carry them through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<Value>,

    /// Required params come first; optional params MUST follow them.
    pub params: Vec<ContentDescriptorOrReference>,

    /// Absent for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ContentDescriptorOrReference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Value>>,

    /// Defaults to [`ParameterStructure::Either`].
    #[serde(rename = "paramStructure", skip_serializing_if = "Option::is_none")]
    pub param_structure: Option<ParameterStructure>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

/// How params are sent in the JSON-RPC request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterStructure {
    ByName,
    ByPosition,
    Either,
}

impl Method {
    pub fn new(name: impl Into<String>, params: Vec<ContentDescriptorOrReference>) -> Self {
        Self {
            name: name.into(),
            tags: None,
            summary: None,
            description: None,
            external_docs: None,
            params,
            result: None,
            deprecated: None,
            servers: None,
            errors: None,
            links: None,
            param_structure: None,
            examples: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_result(mut self, result: ContentDescriptorOrReference) -> Self {
        self.result = Some(result);
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = Some(true);
        self
    }

    /// Set parameter structure to by-name
    pub fn by_name(mut self) -> Self {
        self.param_structure = Some(ParameterStructure::ByName);
        self
    }

    /// Set parameter structure to by-position
    pub fn by_position(mut self) -> Self {
        self.param_structure = Some(ParameterStructure::ByPosition);
        self
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or(false)
    }

    /// Check if this method is a notification (has no result)
    pub fn is_notification(&self) -> bool {
        self.result.is_none()
    }

    /// The parameter structure, defaulting to `Either`
    pub fn get_param_structure(&self) -> ParameterStructure {
        self.param_structure.unwrap_or(ParameterStructure::Either)
    }
}

impl Validate for Method {
    fn validate(&self) -> OpenRpcResult<()> {
        crate::validation::validate_method_name(&self.name)?;

        self.params
            .validate_unique(|param| param.key().to_string(), "method parameters")?;

        for (i, param) in self.params.iter().enumerate() {
            param.validate().map_err(|e| e.at(format!("params[{i}]")))?;
        }

        // Referenced params are checked once resolved against components
        let mut seen_optional = false;
        for param in &self.params {
            if let ContentDescriptorOrReference::ContentDescriptor(cd) = param {
                if !cd.is_required() {
                    seen_optional = true;
                } else if seen_optional {
                    return Err(crate::error::OpenRpcError::validation(format!(
                        "required parameter '{}' must be positioned before optional parameters",
                        cd.name
                    )));
                }
            }
        }

        if let Some(ref result) = self.result {
            result.validate().map_err(|e| e.at("result"))?;
        }

        if let Some(ref servers) = self.servers {
            for (i, server) in servers.iter().enumerate() {
                server.validate().map_err(|e| e.at(format!("servers[{i}]")))?;
            }
        }

        self.extensions.validate()
    }
}

/// Method Object or Reference Object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MethodOrReference {
    Method(Box<Method>),
    Reference(Reference),
}

impl Validate for MethodOrReference {
    fn validate(&self) -> OpenRpcResult<()> {
        match self {
            MethodOrReference::Method(method) => method.validate(),
            MethodOrReference::Reference(reference) => reference.validate(),
        }
    }
}

impl From<Method> for MethodOrReference {
    fn from(method: Method) -> Self {
        MethodOrReference::Method(Box::new(method))
    }
}

impl From<Reference> for MethodOrReference {
    fn from(reference: Reference) -> Self {
        MethodOrReference::Reference(reference)
    }
}

impl<'de> Deserialize<'de> for MethodOrReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if crate::reference::is_reference_object(&value) {
            serde_json::from_value(value)
                .map(MethodOrReference::Reference)
                .map_err(de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(|method| MethodOrReference::Method(Box::new(method)))
                .map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContentDescriptor, Schema};
    use serde_json::json;

    fn param(name: &str, required: bool) -> ContentDescriptorOrReference {
        let cd = ContentDescriptor::new(name, Schema::string());
        let cd = if required { cd.required() } else { cd.optional() };
        cd.into()
    }

    #[test]
    fn test_param_structure_default() {
        let method = Method::new("ping", vec![]);
        assert_eq!(method.get_param_structure(), ParameterStructure::Either);
        assert!(method.is_notification());
        assert_eq!(
            Method::new("ping", vec![]).by_name().get_param_structure(),
            ParameterStructure::ByName
        );
    }

    #[test]
    fn test_required_params_must_come_first() {
        let ok = Method::new("create_person", vec![param("name", true), param("parent", false)]);
        assert!(ok.validate().is_ok());

        let bad = Method::new("create_person", vec![param("parent", false), param("name", true)]);
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn test_duplicate_params_rejected() {
        let method = Method::new("add", vec![param("a", true), param("a", true)]);
        assert!(method.validate().is_err());
    }

    #[test]
    fn test_method_deserialization() {
        let method: Method = serde_json::from_value(json!({
            "name": "math.add",
            "paramStructure": "by-name",
            "params": [
                { "name": "a", "required": true, "schema": { "type": "integer" } },
                { "$ref": "#/components/contentDescriptors/B" }
            ],
            "result": { "name": "sum", "schema": { "type": "integer" } },
            "tags": [{ "name": "math" }],
            "x-internal": true
        }))
        .unwrap();

        assert_eq!(method.get_param_structure(), ParameterStructure::ByName);
        assert!(matches!(
            method.params[1],
            ContentDescriptorOrReference::Reference(_)
        ));
        assert!(method.extensions.contains_key("x-internal"));
        assert!(method.validate().is_ok());
    }
}
