//! Closed representation of the JSON Schema shapes the type mapper understands.
//!
//! A document [`Schema`] is a bag of optional keywords. [`SchemaNode`] picks
//! exactly one interpretation using a fixed precedence: `const`, then `type`,
//! then the first composition keyword, then `$ref`. Anything else is
//! [`SchemaNode::Absent`].

use indexmap::{IndexMap, IndexSet};
use openrpc_types::{Items, Schema, SchemaOrBool, SchemaType};
use serde_json::Value;

/// A single interpretation of a JSON Schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// No schema, or a schema with none of the recognised keywords
    Absent,
    BooleanSchema(bool),
    Const(Value),
    Primitive {
        kind: PrimitiveKind,
        /// Only ever set for strings with a recognised `format`
        format: Option<StringFormat>,
    },
    Array {
        items: Option<Box<SchemaNode>>,
        prefix_items: Option<Vec<SchemaNode>>,
        unique_items: bool,
    },
    Object {
        properties: IndexMap<String, SchemaNode>,
        required: IndexSet<String>,
        additional_properties: Option<Box<SchemaNode>>,
    },
    /// `type: [..]` with more than one entry
    TypeList(Vec<SchemaNode>),
    Union {
        combinator: Combinator,
        branches: Vec<SchemaNode>,
    },
    /// A `$ref` pointer, kept verbatim
    Ref(String),
}

/// Scalar JSON Schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Number,
    String,
    Null,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 5] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Integer,
        PrimitiveKind::Number,
        PrimitiveKind::String,
        PrimitiveKind::Null,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    AllOf,
    AnyOf,
    OneOf,
}

/// String formats with a dedicated target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFormat {
    Date,
    Time,
    DateTime,
    Duration,
    Uuid,
    Uuid1,
    Uuid3,
    Uuid4,
    Uuid5,
    Binary,
}

impl StringFormat {
    pub const ALL: [StringFormat; 10] = [
        StringFormat::Date,
        StringFormat::Time,
        StringFormat::DateTime,
        StringFormat::Duration,
        StringFormat::Uuid,
        StringFormat::Uuid1,
        StringFormat::Uuid3,
        StringFormat::Uuid4,
        StringFormat::Uuid5,
        StringFormat::Binary,
    ];

    /// Look up a `format` value. Unknown formats return `None` and map as plain strings.
    pub fn parse(format: &str) -> Option<Self> {
        let format = match format {
            "date" => StringFormat::Date,
            "time" => StringFormat::Time,
            "date-time" => StringFormat::DateTime,
            "duration" => StringFormat::Duration,
            "uuid" => StringFormat::Uuid,
            "uuid1" => StringFormat::Uuid1,
            "uuid3" => StringFormat::Uuid3,
            "uuid4" => StringFormat::Uuid4,
            "uuid5" => StringFormat::Uuid5,
            "binary" => StringFormat::Binary,
            _ => return None,
        };
        Some(format)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::Date => "date",
            StringFormat::Time => "time",
            StringFormat::DateTime => "date-time",
            StringFormat::Duration => "duration",
            StringFormat::Uuid => "uuid",
            StringFormat::Uuid1 => "uuid1",
            StringFormat::Uuid3 => "uuid3",
            StringFormat::Uuid4 => "uuid4",
            StringFormat::Uuid5 => "uuid5",
            StringFormat::Binary => "binary",
        }
    }
}

impl SchemaNode {
    pub fn from_schema(schema: &Schema) -> Self {
        if let Some(value) = &schema.const_value {
            return SchemaNode::Const(value.clone());
        }

        if let Some(types) = &schema.schema_type {
            return match types.as_slice() {
                [single] => Self::typed(schema, *single),
                many => SchemaNode::TypeList(
                    many.iter().map(|kind| Self::typed(schema, *kind)).collect(),
                ),
            };
        }

        let composition = [
            (Combinator::AllOf, &schema.all_of),
            (Combinator::AnyOf, &schema.any_of),
            (Combinator::OneOf, &schema.one_of),
        ];
        for (combinator, branches) in composition {
            if let Some(branches) = branches {
                return SchemaNode::Union {
                    combinator,
                    branches: branches.iter().map(Self::from_schema_or_bool).collect(),
                };
            }
        }

        match &schema.reference {
            Some(pointer) => SchemaNode::Ref(pointer.clone()),
            None => SchemaNode::Absent,
        }
    }

    pub fn from_schema_or_bool(schema: &SchemaOrBool) -> Self {
        match schema {
            SchemaOrBool::Bool(value) => SchemaNode::BooleanSchema(*value),
            SchemaOrBool::Schema(schema) => Self::from_schema(schema),
        }
    }

    /// Interpret `schema` as if its `type` were exactly `kind`
    fn typed(schema: &Schema, kind: SchemaType) -> Self {
        match kind {
            SchemaType::Array => {
                let (items, positional) = match &schema.items {
                    Some(Items::Single(item)) => {
                        (Some(Box::new(Self::from_schema_or_bool(item))), None)
                    }
                    Some(Items::Positional(items)) => (None, Some(items)),
                    None => (None, None),
                };
                let prefix_items = schema
                    .prefix_items
                    .as_ref()
                    .or(positional)
                    .map(|items| items.iter().map(Self::from_schema_or_bool).collect());

                SchemaNode::Array {
                    items,
                    prefix_items,
                    unique_items: schema.unique_items.unwrap_or(false),
                }
            }
            SchemaType::Object => SchemaNode::Object {
                properties: schema
                    .properties
                    .iter()
                    .flatten()
                    .map(|(name, property)| (name.clone(), Self::from_schema_or_bool(property)))
                    .collect(),
                required: schema.required.iter().flatten().cloned().collect(),
                additional_properties: schema
                    .additional_properties
                    .as_deref()
                    .map(|extra| Box::new(Self::from_schema_or_bool(extra))),
            },
            SchemaType::String => SchemaNode::Primitive {
                kind: PrimitiveKind::String,
                format: schema.format.as_deref().and_then(StringFormat::parse),
            },
            SchemaType::Boolean => Self::primitive(PrimitiveKind::Boolean),
            SchemaType::Integer => Self::primitive(PrimitiveKind::Integer),
            SchemaType::Number => Self::primitive(PrimitiveKind::Number),
            SchemaType::Null => Self::primitive(PrimitiveKind::Null),
        }
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        SchemaNode::Primitive { kind, format: None }
    }

    /// A `$ref` node's target name, i.e. everything after the last `/`
    pub fn ref_name(pointer: &str) -> &str {
        pointer.rsplit('/').next().unwrap_or(pointer)
    }

    pub fn is_null(&self) -> bool {
        matches!(
            self,
            SchemaNode::Primitive {
                kind: PrimitiveKind::Null,
                ..
            } | SchemaNode::Const(Value::Null)
        )
    }

    /// Names of every `$ref` target reachable from this node
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_refs(&mut names);
        names
    }

    fn collect_refs<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            SchemaNode::Ref(pointer) => names.push(Self::ref_name(pointer)),
            SchemaNode::Array {
                items,
                prefix_items,
                ..
            } => {
                if let Some(items) = items {
                    items.collect_refs(names);
                }
                for item in prefix_items.iter().flatten() {
                    item.collect_refs(names);
                }
            }
            SchemaNode::Object {
                properties,
                additional_properties,
                ..
            } => {
                for property in properties.values() {
                    property.collect_refs(names);
                }
                if let Some(extra) = additional_properties {
                    extra.collect_refs(names);
                }
            }
            SchemaNode::TypeList(members) | SchemaNode::Union { branches: members, .. } => {
                for member in members {
                    member.collect_refs(names);
                }
            }
            SchemaNode::Absent
            | SchemaNode::BooleanSchema(_)
            | SchemaNode::Const(_)
            | SchemaNode::Primitive { .. } => {}
        }
    }
}

impl From<&Schema> for SchemaNode {
    fn from(schema: &Schema) -> Self {
        Self::from_schema(schema)
    }
}

impl From<&SchemaOrBool> for SchemaNode {
    fn from(schema: &SchemaOrBool) -> Self {
        Self::from_schema_or_bool(schema)
    }
}
