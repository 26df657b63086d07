//! JSON Schema to target-language type expressions.
//!
//! [`map_type`] walks a [`SchemaNode`] in the same order for every language;
//! a [`TypeSyntax`] supplies the primitive names, format overrides and the
//! spelling of lists, sets, tuples, maps and unions.
//!
//! ```rust
//! use openrpc_codegen::{SchemaNode, TargetLanguage, map_type};
//! use openrpc_types::{Schema, SchemaType};
//!
//! let node = SchemaNode::from_schema(&Schema::of_types(vec![SchemaType::String, SchemaType::Null]));
//! assert_eq!(map_type(&node, TargetLanguage::Python), "Optional[str]");
//! assert_eq!(map_type(&node, TargetLanguage::TypeScript), "string | null");
//! ```

mod python;
mod typescript;

pub use python::PythonSyntax;
pub use typescript::TypeScriptSyntax;

use crate::schema_node::{PrimitiveKind, SchemaNode, StringFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Languages clients can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    Python,
    #[serde(alias = "ts")]
    TypeScript,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 2] = [TargetLanguage::Python, TargetLanguage::TypeScript];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::Python => "python",
            TargetLanguage::TypeScript => "typescript",
        }
    }

    pub fn syntax(&self) -> &'static dyn TypeSyntax {
        match self {
            TargetLanguage::Python => &PythonSyntax,
            TargetLanguage::TypeScript => &TypeScriptSyntax,
        }
    }

    pub fn map_type(&self, node: &SchemaNode) -> String {
        map_type_with(node, self.syntax())
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(TargetLanguage::Python),
            "typescript" | "ts" => Ok(TargetLanguage::TypeScript),
            other => Err(format!("unsupported language '{other}'")),
        }
    }
}

/// Spelling of types in one target language.
pub trait TypeSyntax {
    /// The dynamic type, used for absent and boolean schemas
    fn any(&self) -> &'static str;

    fn primitive(&self, kind: PrimitiveKind) -> &'static str;

    fn string_format(&self, format: StringFormat) -> &'static str;

    /// Type of a `const` value
    fn literal(&self, value: &Value) -> String;

    fn tuple(&self, members: &[String]) -> String;

    fn set(&self, item: &str) -> String;

    fn list(&self, item: &str) -> String;

    /// String-keyed map with values of type `value`
    fn map(&self, value: &str) -> String;

    /// Union of de-duplicated, non-null members. `members` is never empty.
    fn union(&self, members: &[String], nullable: bool) -> String;
}

/// Map a schema node to a type expression in `language`
pub fn map_type(node: &SchemaNode, language: TargetLanguage) -> String {
    language.map_type(node)
}

pub fn map_type_with(node: &SchemaNode, syntax: &dyn TypeSyntax) -> String {
    match node {
        SchemaNode::Absent | SchemaNode::BooleanSchema(_) => syntax.any().to_string(),
        SchemaNode::Const(value) => syntax.literal(value),
        SchemaNode::Primitive {
            kind: PrimitiveKind::String,
            format: Some(format),
        } => syntax.string_format(*format).to_string(),
        SchemaNode::Primitive { kind, .. } => syntax.primitive(*kind).to_string(),
        SchemaNode::Array {
            prefix_items: Some(prefix),
            ..
        } => {
            let members: Vec<String> = prefix
                .iter()
                .map(|item| map_type_with(item, syntax))
                .collect();
            syntax.tuple(&members)
        }
        SchemaNode::Array {
            items,
            unique_items,
            ..
        } => {
            let item = items
                .as_deref()
                .map_or_else(|| syntax.any().to_string(), |item| map_type_with(item, syntax));
            if *unique_items {
                syntax.set(&item)
            } else {
                syntax.list(&item)
            }
        }
        SchemaNode::Object {
            additional_properties,
            ..
        } => {
            let value = additional_properties
                .as_deref()
                .map_or_else(|| syntax.any().to_string(), |value| map_type_with(value, syntax));
            syntax.map(&value)
        }
        SchemaNode::TypeList(members) | SchemaNode::Union { branches: members, .. } => {
            fold_union(members, syntax)
        }
        SchemaNode::Ref(pointer) => SchemaNode::ref_name(pointer).to_string(),
    }
}

/// Map each member, drop duplicates and pull `null` out into the nullable flag
fn fold_union(members: &[SchemaNode], syntax: &dyn TypeSyntax) -> String {
    let null = syntax.primitive(PrimitiveKind::Null);
    let mut nullable = false;
    let mut mapped: Vec<String> = Vec::with_capacity(members.len());

    for member in members {
        let rendered = map_type_with(member, syntax);
        if member.is_null() || rendered == null {
            nullable = true;
        } else if !mapped.contains(&rendered) {
            mapped.push(rendered);
        }
    }

    match (mapped.as_slice(), nullable) {
        ([], true) => null.to_string(),
        ([], false) => syntax.any().to_string(),
        ([single], false) => single.clone(),
        (members, nullable) => syntax.union(members, nullable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openrpc_types::SchemaOrBool;
    use serde_json::json;

    fn node(value: Value) -> SchemaNode {
        let schema: SchemaOrBool = serde_json::from_value(value).unwrap();
        SchemaNode::from_schema_or_bool(&schema)
    }

    fn py(value: Value) -> String {
        map_type(&node(value), TargetLanguage::Python)
    }

    fn ts(value: Value) -> String {
        map_type(&node(value), TargetLanguage::TypeScript)
    }

    #[test]
    fn test_primitive_table() {
        let table = [
            (PrimitiveKind::Boolean, "bool", "boolean"),
            (PrimitiveKind::Integer, "int", "number"),
            (PrimitiveKind::Number, "float", "number"),
            (PrimitiveKind::String, "str", "string"),
            (PrimitiveKind::Null, "None", "null"),
        ];
        assert_eq!(table.len(), PrimitiveKind::ALL.len());

        for (kind, python, typescript) in table {
            let n = SchemaNode::primitive(kind);
            assert_eq!(map_type(&n, TargetLanguage::Python), python);
            assert_eq!(map_type(&n, TargetLanguage::TypeScript), typescript);
        }
    }

    #[test]
    fn test_format_table() {
        let table = [
            ("date", "datetime.date"),
            ("time", "datetime.time"),
            ("date-time", "datetime.datetime"),
            ("duration", "datetime.timedelta"),
            ("uuid", "UUID"),
            ("uuid1", "UUID1"),
            ("uuid3", "UUID3"),
            ("uuid4", "UUID4"),
            ("uuid5", "UUID5"),
            ("binary", "bytes"),
        ];
        assert_eq!(table.len(), StringFormat::ALL.len());

        for (format, python) in table {
            let schema = json!({ "type": "string", "format": format });
            assert_eq!(py(schema.clone()), python, "format {format}");
            assert_eq!(ts(schema), "string", "format {format}");
        }
    }

    #[test]
    fn test_unknown_format_falls_back_to_string() {
        assert_eq!(py(json!({ "type": "string", "format": "email" })), "str");
        assert_eq!(ts(json!({ "type": "string", "format": "email" })), "string");
    }

    #[test]
    fn test_absent_and_boolean_schemas() {
        assert_eq!(py(json!({})), "Any");
        assert_eq!(ts(json!({})), "any");
        assert_eq!(py(json!(true)), "Any");
        assert_eq!(ts(json!(false)), "any");
    }

    #[test]
    fn test_const() {
        assert_eq!(py(json!({ "const": "foo" })), "Literal[\"foo\"]");
        assert_eq!(py(json!({ "const": 3 })), "Literal[3]");
        assert_eq!(py(json!({ "const": true })), "Literal[True]");
        assert_eq!(py(json!({ "const": null })), "None");

        assert_eq!(ts(json!({ "const": "foo" })), "string");
        assert_eq!(ts(json!({ "const": 3.5 })), "number");
        assert_eq!(ts(json!({ "const": false })), "boolean");
        assert_eq!(ts(json!({ "const": null })), "null");
        assert_eq!(ts(json!({ "const": [1, 2] })), "any");
    }

    #[test]
    fn test_list_and_set() {
        let list = json!({ "type": "array", "items": { "type": "string" } });
        assert_eq!(py(list.clone()), "list[str]");
        assert_eq!(ts(list), "string[]");

        let set = json!({ "type": "array", "items": { "type": "string" }, "uniqueItems": true });
        assert_eq!(py(set.clone()), "set[str]");
        assert_eq!(ts(set), "Set<string>");

        assert_eq!(py(json!({ "type": "array" })), "list[Any]");
        assert_eq!(ts(json!({ "type": "array" })), "any[]");
    }

    #[test]
    fn test_array_of_union_uses_generic_form_in_typescript() {
        let schema = json!({ "type": "array", "items": { "type": ["string", "integer"] } });
        assert_eq!(ts(schema.clone()), "Array<string | number>");
        assert_eq!(py(schema), "list[Union[str, int]]");
    }

    #[test]
    fn test_prefix_items_tuple() {
        let schema = json!({
            "type": "array",
            "prefixItems": [{ "type": "integer" }, { "type": "string" }]
        });
        assert_eq!(py(schema.clone()), "tuple[int, str]");
        assert_eq!(ts(schema), "[number, string]");
    }

    #[test]
    fn test_empty_prefix_items_tuple() {
        let schema = json!({ "type": "array", "prefixItems": [] });
        assert_eq!(py(schema.clone()), "tuple[()]");
        assert_eq!(ts(schema), "[]");
    }

    #[test]
    fn test_object_maps() {
        assert_eq!(py(json!({ "type": "object" })), "dict[str, Any]");
        assert_eq!(ts(json!({ "type": "object" })), "object");

        let typed = json!({ "type": "object", "additionalProperties": { "type": "integer" } });
        assert_eq!(py(typed.clone()), "dict[str, int]");
        assert_eq!(ts(typed), "Record<string, number>");

        let with_properties = json!({
            "type": "object",
            "properties": { "name": { "type": "string" } }
        });
        assert_eq!(py(with_properties), "dict[str, Any]");
    }

    #[test]
    fn test_nullable_type_list() {
        assert_eq!(py(json!({ "type": ["string", "null"] })), "Optional[str]");
        assert_eq!(ts(json!({ "type": ["string", "null"] })), "string | null");
        assert_eq!(
            py(json!({ "type": ["string", "integer", "null"] })),
            "Optional[Union[str, int]]"
        );
        assert_eq!(
            ts(json!({ "type": ["null", "string", "integer"] })),
            "string | number | null"
        );
        assert_eq!(py(json!({ "type": ["string", "integer"] })), "Union[str, int]");
    }

    #[test]
    fn test_union_members_are_deduplicated() {
        // integer and number both map to `number` in TypeScript
        let schema = json!({ "type": ["integer", "number"] });
        assert_eq!(ts(schema.clone()), "number");
        assert_eq!(py(schema), "Union[int, float]");
    }

    #[test]
    fn test_composition_is_a_union() {
        for keyword in ["allOf", "anyOf", "oneOf"] {
            let schema = json!({
                keyword: [{ "$ref": "#/components/schemas/Person" }, { "type": "null" }]
            });
            assert_eq!(py(schema.clone()), "Optional[Person]");
            assert_eq!(ts(schema), "Person | null");
        }
        assert_eq!(py(json!({ "anyOf": [{ "type": "null" }] })), "None");
    }

    #[test]
    fn test_ref_uses_last_segment() {
        assert_eq!(py(json!({ "$ref": "#/components/schemas/Foo" })), "Foo");
        assert_eq!(ts(json!({ "$ref": "#/components/schemas/Foo" })), "Foo");
        assert_eq!(
            py(json!({ "$ref": "#/components/schemas/Outer/definitions/Foo" })),
            "Foo"
        );
        assert_eq!(py(json!({ "$ref": "#/definitions/Foo" })), "Foo");
    }

    #[test]
    fn test_unknown_type_is_rejected_when_parsing() {
        let err = serde_json::from_value::<SchemaOrBool>(json!({ "type": "decimal" })).unwrap_err();
        assert!(err.to_string().contains("decimal"));
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("python".parse::<TargetLanguage>(), Ok(TargetLanguage::Python));
        assert_eq!("TS".parse::<TargetLanguage>(), Ok(TargetLanguage::TypeScript));
        assert!("kotlin".parse::<TargetLanguage>().is_err());
        assert_eq!(TargetLanguage::TypeScript.to_string(), "typescript");
    }
}
