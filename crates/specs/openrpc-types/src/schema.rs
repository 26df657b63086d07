//! Schema Object.
//!
//! OpenRPC describes parameter and result shapes with JSON Schema. This module
//! models the keywords a client generator reads (`type`, `format`, `const`,
//! `enum`, array and object keywords, composition, `$ref`, nested
//! definitions). Every other keyword is kept verbatim in
//! [`Schema::keywords`] so documents round-trip.

use crate::{
    Reference,
    error::{OpenRpcError, OpenRpcResult},
    validation::{Validate, ValidateUnique},
};
use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A JSON Schema object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Schema {
    #[serde(rename = "$id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Pointer to another schema, e.g. `#/components/schemas/Person`
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,

    /// `type`, either one name or a list of names
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaTypes>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// `const`; a literal `null` is kept as `Some(Value::Null)`
    #[serde(
        rename = "const",
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub const_value: Option<Value>,

    /// String format such as `date-time` or `uuid`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    /// Positional item schemas (tuple typing)
    #[serde(rename = "prefixItems", skip_serializing_if = "Option::is_none")]
    pub prefix_items: Option<Vec<SchemaOrBool>>,

    #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaOrBool>>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<SchemaOrBool>>,

    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaOrBool>>,

    #[serde(rename = "anyOf", skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaOrBool>>,

    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaOrBool>>,

    /// Draft 7 nested definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, SchemaOrBool>>,

    /// 2019-09+ nested definitions
    #[serde(rename = "$defs", skip_serializing_if = "Option::is_none")]
    pub defs: Option<IndexMap<String, SchemaOrBool>>,

    /// Keywords without a dedicated field (`minimum`, `pattern`, `x-*`, ...)
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    #[builder(default)]
    pub keywords: IndexMap<String, Value>,
}

/// Deserialize a keyword whose presence matters even when its value is `null`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON Schema primitive type names.
///
/// The set is closed: a document naming any other type fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

impl SchemaType {
    pub const ALL: [SchemaType; 7] = [
        SchemaType::Null,
        SchemaType::Boolean,
        SchemaType::Object,
        SchemaType::Array,
        SchemaType::Number,
        SchemaType::String,
        SchemaType::Integer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = OpenRpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| OpenRpcError::schema(format!("unknown JSON Schema type '{s}'")))
    }
}

impl<'de> Deserialize<'de> for SchemaType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// The `type` keyword: one type name or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaTypes {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl SchemaTypes {
    pub fn as_slice(&self) -> &[SchemaType] {
        match self {
            SchemaTypes::Single(t) => std::slice::from_ref(t),
            SchemaTypes::Multiple(types) => types,
        }
    }
}

impl<'de> Deserialize<'de> for SchemaTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(name) => name
                .parse()
                .map(SchemaTypes::Single)
                .map_err(de::Error::custom),
            Value::Array(names) => names
                .into_iter()
                .map(|name| match name {
                    Value::String(name) => name.parse().map_err(de::Error::custom),
                    other => Err(de::Error::custom(format!(
                        "type names must be strings, found {other}"
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(SchemaTypes::Multiple),
            other => Err(de::Error::custom(format!(
                "`type` must be a string or an array of strings, found {other}"
            ))),
        }
    }
}

impl From<SchemaType> for SchemaTypes {
    fn from(value: SchemaType) -> Self {
        SchemaTypes::Single(value)
    }
}

/// A schema position that also accepts `true` / `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<Schema>),
}

impl SchemaOrBool {
    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            SchemaOrBool::Schema(schema) => Some(schema),
            SchemaOrBool::Bool(_) => None,
        }
    }
}

impl From<Schema> for SchemaOrBool {
    fn from(schema: Schema) -> Self {
        SchemaOrBool::Schema(Box::new(schema))
    }
}

impl<'de> Deserialize<'de> for SchemaOrBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Decoded by hand so errors from inside the schema are not swallowed
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(SchemaOrBool::Bool(b)),
            value @ Value::Object(_) => serde_json::from_value(value)
                .map(|schema| SchemaOrBool::Schema(Box::new(schema)))
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a schema object or boolean, found {other}"
            ))),
        }
    }
}

/// The `items` keyword: one schema for every element, or the Draft 7 array
/// form giving one schema per position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Items {
    Single(Box<SchemaOrBool>),
    Positional(Vec<SchemaOrBool>),
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(values) => values
                .into_iter()
                .map(|value| serde_json::from_value(value).map_err(de::Error::custom))
                .collect::<Result<Vec<_>, _>>()
                .map(Items::Positional),
            value => serde_json::from_value(value)
                .map(|item| Items::Single(Box::new(item)))
                .map_err(de::Error::custom),
        }
    }
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boolean() -> Self {
        Self::new().with_type(SchemaType::Boolean)
    }

    pub fn string() -> Self {
        Self::new().with_type(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::new().with_type(SchemaType::Number)
    }

    pub fn integer() -> Self {
        Self::new().with_type(SchemaType::Integer)
    }

    pub fn array() -> Self {
        Self::new().with_type(SchemaType::Array)
    }

    pub fn object() -> Self {
        Self::new().with_type(SchemaType::Object)
    }

    pub fn null() -> Self {
        Self::new().with_type(SchemaType::Null)
    }

    /// A `$ref` to `#/components/schemas/{name}`
    pub fn reference_to(name: &str) -> Self {
        Self {
            reference: Some(Reference::schema(name).reference),
            ..Self::default()
        }
    }

    /// A schema with `type: [..]`
    pub fn of_types(types: Vec<SchemaType>) -> Self {
        Self {
            schema_type: Some(SchemaTypes::Multiple(types)),
            ..Self::default()
        }
    }

    pub fn any_of(branches: Vec<Schema>) -> Self {
        Self {
            any_of: Some(branches.into_iter().map(SchemaOrBool::from).collect()),
            ..Self::default()
        }
    }

    pub fn one_of(branches: Vec<Schema>) -> Self {
        Self {
            one_of: Some(branches.into_iter().map(SchemaOrBool::from).collect()),
            ..Self::default()
        }
    }

    pub fn all_of(branches: Vec<Schema>) -> Self {
        Self {
            all_of: Some(branches.into_iter().map(SchemaOrBool::from).collect()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, schema_type: SchemaType) -> Self {
        self.schema_type = Some(SchemaTypes::Single(schema_type));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_const(mut self, value: impl Into<Value>) -> Self {
        self.const_value = Some(value.into());
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_items(mut self, items: Schema) -> Self {
        self.items = Some(Items::Single(Box::new(items.into())));
        self
    }

    pub fn with_prefix_items(mut self, items: Vec<Schema>) -> Self {
        self.prefix_items = Some(items.into_iter().map(SchemaOrBool::from).collect());
        self
    }

    pub fn with_unique_items(mut self, unique: bool) -> Self {
        self.unique_items = Some(unique);
        self
    }

    /// Add a property to an object schema
    pub fn with_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema.into());
        self
    }

    /// Add a required property name
    pub fn require_property(mut self, property: impl Into<String>) -> Self {
        self.required
            .get_or_insert_with(Vec::new)
            .push(property.into());
        self
    }

    pub fn with_additional_properties(mut self, schema: impl Into<SchemaOrBool>) -> Self {
        self.additional_properties = Some(Box::new(schema.into()));
        self
    }

    /// Add a nested `definitions` entry
    pub fn with_definition(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.definitions
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema.into());
        self
    }

    /// Whether `property` is listed in `required`
    pub fn is_required_property(&self, property: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|required| required.iter().any(|name| name == property))
    }

    /// Nested `definitions` followed by `$defs`, in document order
    pub fn nested_definitions(&self) -> impl Iterator<Item = (&String, &SchemaOrBool)> {
        self.definitions
            .iter()
            .flatten()
            .chain(self.defs.iter().flatten())
    }
}

impl Validate for SchemaOrBool {
    fn validate(&self) -> OpenRpcResult<()> {
        match self {
            SchemaOrBool::Schema(schema) => schema.validate(),
            SchemaOrBool::Bool(_) => Ok(()),
        }
    }
}

fn validate_all(schemas: &[SchemaOrBool], keyword: &str) -> OpenRpcResult<()> {
    for (i, schema) in schemas.iter().enumerate() {
        schema.validate().map_err(|e| e.at(format!("{keyword}[{i}]")))?;
    }
    Ok(())
}

impl Validate for Schema {
    fn validate(&self) -> OpenRpcResult<()> {
        if let Some(ref reference) = self.reference {
            if reference.is_empty() {
                return Err(OpenRpcError::schema("$ref cannot be empty"));
            }
        }

        if let Some(SchemaTypes::Multiple(ref types)) = self.schema_type {
            if types.is_empty() {
                return Err(OpenRpcError::schema("type list cannot be empty"));
            }
            types.validate_unique(|t| t.as_str(), "type list")?;
        }

        if let Some(ref values) = self.enum_values {
            if values.is_empty() {
                return Err(OpenRpcError::schema("enum must list at least one value"));
            }
        }

        match self.items {
            Some(Items::Single(ref item)) => item.validate().map_err(|e| e.at("items"))?,
            Some(Items::Positional(ref items)) => validate_all(items, "items")?,
            None => {}
        }

        if let Some(ref prefix_items) = self.prefix_items {
            validate_all(prefix_items, "prefixItems")?;
        }

        if let Some(ref properties) = self.properties {
            for (name, schema) in properties {
                if name.is_empty() {
                    return Err(OpenRpcError::schema("property name cannot be empty"));
                }
                schema.validate().map_err(|e| e.at(format!("properties.{name}")))?;
            }
        }

        if let Some(ref additional) = self.additional_properties {
            additional
                .validate()
                .map_err(|e| e.at("additionalProperties"))?;
        }

        for (keyword, branches) in [
            ("allOf", &self.all_of),
            ("anyOf", &self.any_of),
            ("oneOf", &self.one_of),
        ] {
            if let Some(branches) = branches {
                if branches.is_empty() {
                    return Err(OpenRpcError::schema(format!(
                        "{keyword} must list at least one schema"
                    )));
                }
                validate_all(branches, keyword)?;
            }
        }

        for (name, schema) in self.nested_definitions() {
            crate::validation::validate_component_key(name)?;
            schema.validate().map_err(|e| e.at(format!("definitions.{name}")))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_helpers() {
        let schema = Schema::object()
            .with_title("Person")
            .with_property("name", Schema::string())
            .with_property("age", Schema::integer())
            .require_property("name");

        assert_eq!(
            schema.schema_type,
            Some(SchemaTypes::Single(SchemaType::Object))
        );
        assert!(schema.is_required_property("name"));
        assert!(!schema.is_required_property("age"));
        let names: Vec<&str> = schema
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn test_type_list_deserialization() {
        let schema: Schema = serde_json::from_value(json!({ "type": ["string", "null"] })).unwrap();
        assert_eq!(
            schema.schema_type.unwrap().as_slice(),
            &[SchemaType::String, SchemaType::Null]
        );
    }

    #[test]
    fn test_unknown_type_name_is_rejected() {
        let err = serde_json::from_value::<Schema>(json!({ "type": "decimal" })).unwrap_err();
        assert!(err.to_string().contains("unknown JSON Schema type 'decimal'"));

        let err = serde_json::from_value::<Schema>(json!({
            "type": "object",
            "properties": { "price": { "type": ["decimal", "null"] } }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("decimal"));
    }

    #[test]
    fn test_const_null_is_present() {
        let schema: Schema = serde_json::from_value(json!({ "const": null })).unwrap();
        assert_eq!(schema.const_value, Some(Value::Null));

        let schema: Schema = serde_json::from_value(json!({ "type": "string" })).unwrap();
        assert_eq!(schema.const_value, None);
    }

    #[test]
    fn test_boolean_schemas() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "object",
            "additionalProperties": false,
            "properties": { "anything": true }
        }))
        .unwrap();

        assert_eq!(
            schema.additional_properties.as_deref(),
            Some(&SchemaOrBool::Bool(false))
        );
        assert_eq!(
            schema.properties.unwrap().get("anything"),
            Some(&SchemaOrBool::Bool(true))
        );
    }

    #[test]
    fn test_items_forms() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "array",
            "items": [{ "type": "integer" }, { "type": "string" }]
        }))
        .unwrap();
        assert!(matches!(schema.items, Some(Items::Positional(ref v)) if v.len() == 2));

        let schema: Schema =
            serde_json::from_value(json!({ "type": "array", "items": { "type": "integer" } }))
                .unwrap();
        assert!(matches!(schema.items, Some(Items::Single(_))));
    }

    #[test]
    fn test_nested_definitions_order() {
        let schema: Schema = serde_json::from_value(json!({
            "definitions": { "B": { "type": "string" } },
            "$defs": { "A": { "type": "integer" } }
        }))
        .unwrap();

        let names: Vec<&str> = schema
            .nested_definitions()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_unmodelled_keywords_round_trip() {
        let value = json!({
            "type": "integer",
            "minimum": 0,
            "x-unit": "years"
        });
        let schema: Schema = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(schema.keywords.get("minimum"), Some(&json!(0)));
        assert_eq!(serde_json::to_value(&schema).unwrap(), value);
    }

    #[test]
    fn test_schema_validation() {
        assert!(Schema::of_types(vec![SchemaType::String, SchemaType::Null])
            .validate()
            .is_ok());
        assert!(Schema::of_types(vec![]).validate().is_err());
        assert!(Schema::of_types(vec![SchemaType::String, SchemaType::String])
            .validate()
            .is_err());
        assert!(Schema::any_of(vec![]).validate().is_err());
        assert!(Schema::string().with_enum(vec![]).validate().is_err());

        let nested = Schema::object().with_property("bad", Schema::of_types(vec![]));
        let err = nested.validate().unwrap_err();
        assert!(matches!(err, OpenRpcError::ValidationError { field_path: Some(ref p), .. } if p == "properties.bad"));
    }

    #[test]
    fn test_schema_builder() {
        let schema = Schema::builder()
            .schema_type(SchemaTypes::Single(SchemaType::String))
            .format("uuid".to_string())
            .build();

        assert_eq!(schema.format.as_deref(), Some("uuid"));
    }
}
