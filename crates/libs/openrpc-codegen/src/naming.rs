//! Identifier casing and sanitizing for generated code.

use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use serde_json::Value;

/// Identifier used when sanitizing leaves nothing behind
pub const PLACEHOLDER_IDENTIFIER: &str = "method";

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Names a generated method binds itself, so params must not shadow them
const PYTHON_BOUND_NAMES: &[&str] = &["self"];

const TYPESCRIPT_RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with",
];

/// Reduce a method-name segment to `[A-Za-z0-9_]`.
///
/// A leading digit gets an `n` prefix and an empty result becomes
/// [`PLACEHOLDER_IDENTIFIER`].
pub fn sanitize_identifier(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    match cleaned.chars().next() {
        None => PLACEHOLDER_IDENTIFIER.to_string(),
        Some(first) if first.is_ascii_digit() => format!("n{cleaned}"),
        Some(_) => cleaned,
    }
}

pub fn pascal_case(name: &str) -> String {
    identifier_or_placeholder(name.to_upper_camel_case())
}

pub fn camel_case(name: &str) -> String {
    identifier_or_placeholder(name.to_lower_camel_case())
}

pub fn snake_case(name: &str) -> String {
    identifier_or_placeholder(name.to_snake_case())
}

pub fn shouty_snake_case(name: &str) -> String {
    identifier_or_placeholder(name.to_shouty_snake_case())
}

/// Snake-cased name that is safe to use as a Python parameter or attribute
pub fn python_identifier(name: &str) -> String {
    let name = snake_case(name);
    if PYTHON_KEYWORDS.contains(&name.as_str()) || PYTHON_BOUND_NAMES.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// Camel-cased name that is safe to use as a TypeScript parameter
pub fn typescript_identifier(name: &str) -> String {
    let name = camel_case(name);
    if TYPESCRIPT_RESERVED.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// Member name for an enum value, e.g. `"dark-blue"` becomes `DARK_BLUE`
pub fn enum_member_name(value: &Value) -> String {
    match value {
        Value::String(text) => shouty_snake_case(text),
        Value::Number(number) => {
            let digits = number.to_string().replace('-', "MINUS_").replace('.', "_");
            format!("NUMBER_{digits}")
        }
        Value::Bool(flag) => flag.to_string().to_uppercase(),
        Value::Null => "NONE".to_string(),
        Value::Array(_) | Value::Object(_) => "VALUE".to_string(),
    }
}

/// Re-apply the digit and empty rules after case conversion
fn identifier_or_placeholder(converted: String) -> String {
    if converted.is_empty() {
        return PLACEHOLDER_IDENTIFIER.to_string();
    }
    sanitize_identifier(&converted)
}
