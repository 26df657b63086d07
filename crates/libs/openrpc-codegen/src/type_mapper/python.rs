use super::TypeSyntax;
use crate::schema_node::{PrimitiveKind, StringFormat};
use serde_json::Value;

/// Python typing spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonSyntax;

impl TypeSyntax for PythonSyntax {
    fn any(&self) -> &'static str {
        "Any"
    }

    fn primitive(&self, kind: PrimitiveKind) -> &'static str {
        match kind {
            PrimitiveKind::Boolean => "bool",
            PrimitiveKind::Integer => "int",
            PrimitiveKind::Number => "float",
            PrimitiveKind::String => "str",
            PrimitiveKind::Null => "None",
        }
    }

    fn string_format(&self, format: StringFormat) -> &'static str {
        match format {
            StringFormat::Date => "datetime.date",
            StringFormat::Time => "datetime.time",
            StringFormat::DateTime => "datetime.datetime",
            StringFormat::Duration => "datetime.timedelta",
            StringFormat::Uuid => "UUID",
            StringFormat::Uuid1 => "UUID1",
            StringFormat::Uuid3 => "UUID3",
            StringFormat::Uuid4 => "UUID4",
            StringFormat::Uuid5 => "UUID5",
            StringFormat::Binary => "bytes",
        }
    }

    fn literal(&self, value: &Value) -> String {
        match value {
            Value::Null => "None".to_string(),
            Value::Bool(true) => "Literal[True]".to_string(),
            Value::Bool(false) => "Literal[False]".to_string(),
            Value::Number(number) => format!("Literal[{number}]"),
            // JSON string escapes are valid Python string escapes
            Value::String(_) => format!("Literal[{value}]"),
            Value::Array(_) | Value::Object(_) => self.any().to_string(),
        }
    }

    fn tuple(&self, members: &[String]) -> String {
        if members.is_empty() {
            return "tuple[()]".to_string();
        }
        format!("tuple[{}]", members.join(", "))
    }

    fn set(&self, item: &str) -> String {
        format!("set[{item}]")
    }

    fn list(&self, item: &str) -> String {
        format!("list[{item}]")
    }

    fn map(&self, value: &str) -> String {
        format!("dict[str, {value}]")
    }

    fn union(&self, members: &[String], nullable: bool) -> String {
        let inner = match members {
            [single] => single.clone(),
            many => format!("Union[{}]", many.join(", ")),
        };
        if nullable {
            format!("Optional[{inner}]")
        } else {
            inner
        }
    }
}
