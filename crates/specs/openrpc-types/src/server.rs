//! Server Object and Server Variable Object.

use crate::{Extensions, error::OpenRpcResult, validation::Validate};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An object representing a Server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Server {
    /// A name to be used as the canonical name for the server.
    pub name: String,

    /// A URL to the target host. May contain `{variable}` placeholders.
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Values substituted into `url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<IndexMap<String, ServerVariable>>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Server {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            summary: None,
            description: None,
            variables: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a variable
    pub fn with_variable(mut self, name: impl Into<String>, variable: ServerVariable) -> Self {
        self.variables
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), variable);
        self
    }

    /// The URL with every `{variable}` replaced by its default value
    pub fn resolve_url(&self) -> String {
        let mut resolved_url = self.url.clone();

        if let Some(ref variables) = self.variables {
            for (name, variable) in variables {
                let placeholder = format!("{{{name}}}");
                resolved_url = resolved_url.replace(&placeholder, &variable.default);
            }
        }

        resolved_url
    }
}

impl Validate for Server {
    fn validate(&self) -> OpenRpcResult<()> {
        if self.name.is_empty() {
            return Err(crate::error::OpenRpcError::missing_field("name"));
        }

        // URLs may be templates, so only presence is checked
        if self.url.is_empty() {
            return Err(crate::error::OpenRpcError::missing_field("url"));
        }

        if let Some(ref variables) = self.variables {
            for (name, variable) in variables {
                if name.is_empty() {
                    return Err(crate::error::OpenRpcError::validation(
                        "variable name cannot be empty",
                    ));
                }
                variable.validate()?;
            }
        }

        self.extensions.validate()
    }
}

/// A Server Variable used for server URL template substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ServerVariable {
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,

    /// The value used when no alternate value is supplied.
    pub default: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl ServerVariable {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            enum_values: None,
            default: default.into(),
            description: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_enum(mut self, enum_values: Vec<String>) -> Self {
        self.enum_values = Some(enum_values);
        self
    }
}

impl Validate for ServerVariable {
    fn validate(&self) -> OpenRpcResult<()> {
        if let Some(ref enum_values) = self.enum_values {
            if !enum_values.contains(&self.default) {
                return Err(crate::error::OpenRpcError::invalid_field(
                    "default",
                    format!("'{}' is not among the enum values", self.default),
                ));
            }
        }

        self.extensions.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpenRpcError;
    use serde_json::json;

    #[test]
    fn test_resolve_url() {
        let server = Server::new("main", "https://{env}.example.com:{port}/rpc")
            .with_variable("env", ServerVariable::new("api"))
            .with_variable("port", ServerVariable::new("8443"));

        assert_eq!(server.resolve_url(), "https://api.example.com:8443/rpc");
    }

    #[test]
    fn test_server_validation() {
        assert!(Server::new("main", "http://localhost:8000").validate().is_ok());
        assert!(Server::new("", "http://localhost:8000").validate().is_err());
        assert!(Server::new("main", "").validate().is_err());

        let server = Server::new("main", "https://{env}.example.com")
            .with_variable("env", ServerVariable::new("dev").with_enum(vec!["prod".into()]));
        assert!(server.validate().is_err());
    }

    #[test]
    fn test_variable_default_outside_enum() {
        let error = ServerVariable::new("dev")
            .with_enum(vec!["prod".into(), "staging".into()])
            .validate()
            .unwrap_err();
        assert_eq!(
            error,
            OpenRpcError::InvalidField {
                field_name: "default".into(),
                message: "'dev' is not among the enum values".into(),
            }
        );
        assert!(ServerVariable::new("prod").with_enum(vec!["prod".into()]).validate().is_ok());
    }

    #[test]
    fn test_server_deserialization() {
        let server: Server = serde_json::from_value(json!({
            "name": "local",
            "url": "http://localhost:{port}",
            "variables": { "port": { "default": "8000" } }
        }))
        .unwrap();

        assert_eq!(server.resolve_url(), "http://localhost:8000");
    }
}
