use super::TypeSyntax;
use crate::schema_node::{PrimitiveKind, StringFormat};
use serde_json::Value;

/// TypeScript type spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptSyntax;

impl TypeSyntax for TypeScriptSyntax {
    fn any(&self) -> &'static str {
        "any"
    }

    fn primitive(&self, kind: PrimitiveKind) -> &'static str {
        match kind {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer | PrimitiveKind::Number => "number",
            PrimitiveKind::String => "string",
            PrimitiveKind::Null => "null",
        }
    }

    fn string_format(&self, format: StringFormat) -> &'static str {
        match format {
            StringFormat::Date
            | StringFormat::Time
            | StringFormat::DateTime
            | StringFormat::Duration
            | StringFormat::Uuid
            | StringFormat::Uuid1
            | StringFormat::Uuid3
            | StringFormat::Uuid4
            | StringFormat::Uuid5
            | StringFormat::Binary => "string",
        }
    }

    /// TypeScript gets the constant's base type, not a literal type
    fn literal(&self, value: &Value) -> String {
        let base = match value {
            Value::Null => self.primitive(PrimitiveKind::Null),
            Value::Bool(_) => self.primitive(PrimitiveKind::Boolean),
            Value::Number(_) => self.primitive(PrimitiveKind::Number),
            Value::String(_) => self.primitive(PrimitiveKind::String),
            Value::Array(_) | Value::Object(_) => self.any(),
        };
        base.to_string()
    }

    fn tuple(&self, members: &[String]) -> String {
        format!("[{}]", members.join(", "))
    }

    fn set(&self, item: &str) -> String {
        format!("Set<{item}>")
    }

    fn list(&self, item: &str) -> String {
        if item.contains('|') {
            format!("Array<{item}>")
        } else {
            format!("{item}[]")
        }
    }

    fn map(&self, value: &str) -> String {
        if value == self.any() {
            "object".to_string()
        } else {
            format!("Record<string, {value}>")
        }
    }

    fn union(&self, members: &[String], nullable: bool) -> String {
        let mut rendered = members.join(" | ");
        if nullable {
            rendered.push_str(" | null");
        }
        rendered
    }
}
