//! OpenRPC Object, the root of an OpenRPC document.

use crate::{
    Components, Extensions, Info, Method, MethodOrReference, Server,
    error::OpenRpcResult,
    validation::{Validate, ValidateUnique},
};
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The root object of an OpenRPC document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct OpenRpc {
    /// Version of the OpenRPC specification the document uses.
    pub openrpc: String,

    pub info: Info,

    /// Connectivity information. Empty or absent means localhost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    pub methods: Vec<MethodOrReference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<Value>,

    /// `$schema` pointer to the meta schema, as emitted by `rpc.discover` implementations
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub meta_schema: Option<String>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl OpenRpc {
    pub fn new(
        openrpc_version: impl Into<String>,
        info: Info,
        methods: Vec<MethodOrReference>,
    ) -> Self {
        Self {
            openrpc: openrpc_version.into(),
            info,
            servers: None,
            methods,
            components: None,
            external_docs: None,
            meta_schema: None,
            extensions: Extensions::new(),
        }
    }

    /// Create a document pinned to [`crate::version::CURRENT`]
    pub fn v1_3_2(info: Info, methods: Vec<MethodOrReference>) -> Self {
        Self::new(crate::version::CURRENT, info, methods)
    }

    /// Parse a document from JSON text
    pub fn from_json_str(json: &str) -> OpenRpcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from an already decoded JSON value
    pub fn from_value(value: Value) -> OpenRpcResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_server(mut self, server: Server) -> Self {
        self.servers.get_or_insert_with(Vec::new).push(server);
        self
    }

    pub fn with_components(mut self, components: Components) -> Self {
        self.components = Some(components);
        self
    }

    /// The server used when the document does not list any
    pub fn get_default_server() -> Server {
        Server::new("default", "localhost")
    }

    /// The listed servers, or the default server when none are listed
    pub fn effective_servers(&self) -> Vec<Server> {
        match &self.servers {
            Some(servers) if !servers.is_empty() => servers.clone(),
            _ => vec![Self::get_default_server()],
        }
    }

    pub fn is_supported_version(&self) -> bool {
        crate::version::is_supported(&self.openrpc)
    }

    /// Inline method definitions, skipping references
    pub fn inline_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter_map(|method| match method {
            MethodOrReference::Method(m) => Some(m.as_ref()),
            MethodOrReference::Reference(_) => None,
        })
    }
}

impl Validate for OpenRpc {
    fn validate(&self) -> OpenRpcResult<()> {
        crate::validation::validate_openrpc_version(&self.openrpc)?;

        self.info.validate().map_err(|e| e.at("info"))?;

        if let Some(ref servers) = self.servers {
            for (i, server) in servers.iter().enumerate() {
                server.validate().map_err(|e| e.at(format!("servers[{i}]")))?;
            }
        }

        for (i, method) in self.methods.iter().enumerate() {
            method.validate().map_err(|e| e.at(format!("methods[{i}]")))?;
        }

        self.methods.validate_unique(
            |method| match method {
                MethodOrReference::Method(m) => m.name.clone(),
                MethodOrReference::Reference(r) => r.reference.clone(),
            },
            "methods",
        )?;

        if let Some(ref components) = self.components {
            components.validate().map_err(|e| e.at("components"))?;
        }

        self.extensions.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContentDescriptor, OpenRpcError, Schema};
    use serde_json::json;

    fn person_document() -> Value {
        json!({
            "openrpc": "1.2.6",
            "info": { "title": "People", "version": "1.0.0" },
            "methods": [
                {
                    "name": "create_person",
                    "params": [
                        { "name": "name", "required": true, "schema": { "type": "string" } }
                    ],
                    "result": { "name": "person", "schema": { "$ref": "#/components/schemas/Person" } }
                }
            ],
            "components": {
                "schemas": {
                    "Person": {
                        "type": "object",
                        "properties": { "name": { "type": "string" } },
                        "required": ["name"]
                    }
                }
            }
        })
    }

    #[test]
    fn test_parse_and_validate() {
        let doc = OpenRpc::from_value(person_document()).unwrap();
        assert!(doc.validate().is_ok());
        assert_eq!(doc.inline_methods().count(), 1);
        assert!(doc.is_supported_version());
    }

    #[test]
    fn test_effective_servers_default() {
        let doc = OpenRpc::from_value(person_document()).unwrap();
        let servers = doc.effective_servers();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].url, "localhost");
    }

    #[test]
    fn test_duplicate_method_names() {
        let method = Method::new("ping", vec![])
            .with_result(ContentDescriptor::new("pong", Schema::string()).into());
        let doc = OpenRpc::v1_3_2(
            Info::new("Dupes", "1.0.0"),
            vec![method.clone().into(), method.into()],
        );

        assert!(matches!(
            doc.validate(),
            Err(OpenRpcError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_validation_error_path() {
        let mut value = person_document();
        value["methods"][0]["params"][0]["name"] = json!("");
        let doc = OpenRpc::from_value(value).unwrap();

        match doc.validate() {
            Err(OpenRpcError::ValidationError { field_path, .. }) => {
                assert_eq!(field_path.as_deref(), Some("methods[0].params[0]"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_fields_fail_to_parse() {
        let err = OpenRpc::from_value(json!({ "openrpc": "1.2.6", "methods": [] })).unwrap_err();
        assert!(err.to_string().contains("info"));
    }

    #[test]
    fn test_meta_schema_is_accepted() {
        let mut value = person_document();
        value["$schema"] = json!("https://meta.open-rpc.org/");
        let doc = OpenRpc::from_value(value).unwrap();
        assert!(doc.validate().is_ok());
    }
}
