//! Named schemas available to the model emitters.

use crate::schema_node::SchemaNode;
use indexmap::IndexMap;
use openrpc_types::{Components, Schema, SchemaOrBool};
use serde_json::Value;
use tracing::debug;

/// A named schema together with the metadata models are rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub enum_values: Option<Vec<Value>>,
    pub node: SchemaNode,
}

impl SchemaEntry {
    fn new(name: &str, schema: &Schema) -> Self {
        Self {
            name: name.to_string(),
            title: schema.title.clone(),
            description: schema.description.clone(),
            enum_values: schema
                .enum_values
                .clone()
                .filter(|values| !values.is_empty()),
            node: SchemaNode::from_schema(schema),
        }
    }

    /// Title used in generated docs, falling back to the component name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn kind(&self) -> ModelKind {
        if self.enum_values.is_some() {
            return ModelKind::Enum;
        }
        match self.node {
            SchemaNode::Object { .. } => ModelKind::Class,
            _ => ModelKind::Alias,
        }
    }
}

/// How a named schema is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// A class with one field per property
    Class,
    /// An enumeration over the schema's `enum` values
    Enum,
    /// A type alias for the mapped type
    Alias,
}

/// Component schemas flattened into a single ordered namespace.
///
/// Nested `definitions` and `$defs` are hoisted to the top level under their
/// own names. When a name appears more than once the first definition wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    entries: IndexMap<String, SchemaEntry>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(components: Option<&Components>) -> Self {
        let mut registry = Self::new();
        for (name, schema) in components.into_iter().flat_map(Components::schemas) {
            registry.insert(name, schema);
        }
        registry
    }

    fn insert(&mut self, name: &str, schema: &Schema) {
        if self.entries.contains_key(name) {
            debug!(schema = name, "Skipping duplicate schema definition");
        } else {
            self.entries
                .insert(name.to_string(), SchemaEntry::new(name, schema));
        }

        for (nested_name, nested) in schema.nested_definitions() {
            if let SchemaOrBool::Schema(nested) = nested {
                self.insert(nested_name, nested);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The class entry `node` refers to, if it is a `$ref` to an object schema
    pub fn model_class(&self, node: &SchemaNode) -> Option<&SchemaEntry> {
        match node {
            SchemaNode::Ref(pointer) => self
                .get(SchemaNode::ref_name(pointer))
                .filter(|entry| entry.kind() == ModelKind::Class),
            _ => None,
        }
    }
}
