//! The per-run description of an API that emitters render from.
//!
//! Built from a validated [`OpenRpc`] document: content descriptor references
//! are resolved, schemas are converted to [`SchemaNode`]s, every `$ref` is
//! checked against the [`SchemaRegistry`] and missing optional values get
//! their defaults.

use crate::error::{CodegenError, CodegenResult};
use crate::registry::SchemaRegistry;
use crate::schema_node::{PrimitiveKind, SchemaNode};
use openrpc_types::{
    Components, ContentDescriptor, ContentDescriptorOrReference, Method, MethodOrReference,
    OpenRpc, ParameterStructure, Validate,
};
use tracing::debug;

/// Used for contact details the document leaves out
pub const NOT_PROVIDED: &str = "Not Provided";

/// Everything the emitters need from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDescription {
    pub info: ApiInfo,
    pub servers: Vec<ServerInfo>,
    pub methods: Vec<RpcMethod>,
    pub registry: SchemaRegistry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub contact_name: String,
    pub contact_email: String,
    pub license: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    /// URL with server variables substituted by their defaults
    pub url: String,
}

/// One RPC method, ready to be rendered as a client callable.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcMethod {
    /// The JSON-RPC method name, sent on the wire unchanged
    pub name: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub params: Vec<Param>,
    pub result: Param,
    pub param_structure: ParamStructure,
    pub deprecated: bool,
}

impl RpcMethod {
    /// Description, or summary when there is no description
    pub fn doc(&self) -> Option<&str> {
        self.description.as_deref().or(self.summary.as_deref())
    }

    /// Params with required ones first, otherwise in document order
    pub fn ordered_params(&self) -> Vec<&Param> {
        let (mut ordered, optional): (Vec<&Param>, Vec<&Param>) =
            self.params.iter().partition(|param| param.required);
        ordered.extend(optional);
        ordered
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub schema: SchemaNode,
    pub required: bool,
    pub description: Option<String>,
}

impl Param {
    fn from_descriptor(descriptor: &ContentDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            schema: SchemaNode::from_schema_or_bool(&descriptor.schema),
            required: descriptor.is_required(),
            description: descriptor.description.clone(),
        }
    }

    /// Result of a notification
    fn null_result() -> Self {
        Self {
            name: "result".to_string(),
            schema: SchemaNode::primitive(PrimitiveKind::Null),
            required: true,
            description: None,
        }
    }
}

/// How params travel in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStructure {
    /// A JSON array in declaration order
    ByPosition,
    /// A JSON object keyed by param name
    ByName,
}

impl From<ParameterStructure> for ParamStructure {
    fn from(structure: ParameterStructure) -> Self {
        match structure {
            ParameterStructure::ByName => ParamStructure::ByName,
            ParameterStructure::ByPosition | ParameterStructure::Either => {
                ParamStructure::ByPosition
            }
        }
    }
}

impl ApiDescription {
    pub fn from_document(document: &OpenRpc) -> CodegenResult<Self> {
        document.validate()?;

        let components = document.components.as_ref();
        let registry = SchemaRegistry::from_components(components);

        let methods = document
            .methods
            .iter()
            .map(|method| match method {
                MethodOrReference::Method(method) => RpcMethod::resolve(method, components),
                MethodOrReference::Reference(reference) => Err(CodegenError::unsupported(format!(
                    "method references are not supported ({})",
                    reference.reference
                ))),
            })
            .collect::<CodegenResult<Vec<_>>>()?;

        let description = Self {
            info: ApiInfo::from_document(document),
            servers: document
                .effective_servers()
                .iter()
                .map(|server| ServerInfo {
                    name: server.name.clone(),
                    url: server.resolve_url(),
                })
                .collect(),
            methods,
            registry,
        };
        description.check_references()?;

        debug!(
            title = %description.info.title,
            methods = description.methods.len(),
            schemas = description.registry.len(),
            "Built API description"
        );
        Ok(description)
    }

    /// Every `$ref` must name a schema in the registry
    fn check_references(&self) -> CodegenResult<()> {
        let method_nodes = self.methods.iter().flat_map(|method| {
            method
                .params
                .iter()
                .chain(std::iter::once(&method.result))
                .map(move |param| (format!("{}.{}", method.name, param.name), &param.schema))
        });
        let schema_nodes = self
            .registry
            .iter()
            .map(|entry| (format!("schema {}", entry.name), &entry.node));

        for (location, node) in method_nodes.chain(schema_nodes) {
            if let Some(name) = node
                .referenced_names()
                .into_iter()
                .find(|name| !self.registry.contains(name))
            {
                return Err(CodegenError::unresolved(
                    name,
                    format!("schema '{name}' used by {location} is not defined"),
                ));
            }
        }
        Ok(())
    }
}

impl ApiInfo {
    fn from_document(document: &OpenRpc) -> Self {
        let info = &document.info;
        let contact = info.contact.as_ref();
        Self {
            title: info.title.clone(),
            version: info.version.clone(),
            description: info.description.clone(),
            contact_name: contact
                .and_then(|contact| contact.name.clone())
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            contact_email: contact
                .and_then(|contact| contact.email.clone())
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            license: info.license.as_ref().map(|license| license.name.clone()),
        }
    }
}

impl RpcMethod {
    fn resolve(method: &Method, components: Option<&Components>) -> CodegenResult<Self> {
        let params = method
            .params
            .iter()
            .map(|param| resolve_descriptor(param, components).map(Param::from_descriptor))
            .collect::<CodegenResult<Vec<_>>>()?;

        let result = match &method.result {
            Some(result) => Param::from_descriptor(resolve_descriptor(result, components)?),
            None => Param::null_result(),
        };

        Ok(Self {
            name: method.name.clone(),
            summary: method.summary.clone(),
            description: method.description.clone(),
            params,
            result,
            param_structure: method.get_param_structure().into(),
            deprecated: method.is_deprecated(),
        })
    }
}

fn resolve_descriptor<'a>(
    descriptor: &'a ContentDescriptorOrReference,
    components: Option<&'a Components>,
) -> CodegenResult<&'a ContentDescriptor> {
    match descriptor {
        ContentDescriptorOrReference::ContentDescriptor(descriptor) => Ok(descriptor),
        ContentDescriptorOrReference::Reference(reference) => components
            .ok_or_else(|| CodegenError::unresolved(&reference.reference, "document has no components"))?
            .resolve_content_descriptor(reference)
            .map_err(|e| CodegenError::unresolved(&reference.reference, e.to_string())),
    }
}
