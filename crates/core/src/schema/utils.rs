//! Common utilities for TypeScript code generation.

use super::spec::EnumValue;
use super::types::{TsLiteral, TsPrimitive, TsType};

/// Check if a property key needs quoting.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in JavaScript/TypeScript string literals.
/// Escapes backslashes, double quotes and line breaks.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Escape the static part of a template literal type.
pub fn escape_template(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Quote a string if needed for use as a property key.
pub fn quote_if_needed(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Render a JSDoc comment at the given indentation (2 spaces per level).
///
/// Single-line text renders as `/** text */`, anything longer as a block.
pub fn format_doc(doc: &str, indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    let doc = doc.trim().replace("*/", "*\\/");
    if doc.lines().count() <= 1 {
        return format!("{prefix}/** {doc} */\n");
    }
    let mut output = format!("{prefix}/**\n");
    for line in doc.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            output.push_str(&format!("{prefix} *\n"));
        } else {
            output.push_str(&format!("{prefix} * {line}\n"));
        }
    }
    output.push_str(&format!("{prefix} */\n"));
    output
}

/// Indent every non-empty line of `text` by `indent` levels.
pub fn indent_block(text: &str, indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("{prefix}{line}\n")
            }
        })
        .collect()
}

/// Convert a JSON Schema enum value to a literal type, `unknown` for
/// object and array members.
pub fn enum_value_to_type(v: &EnumValue) -> TsType {
    let literal = match v {
        EnumValue::String(s) => TsLiteral::String(s.clone()),
        EnumValue::Integer(n) => TsLiteral::Int(*n),
        EnumValue::Float(f) => TsLiteral::Number(*f),
        EnumValue::Bool(b) => TsLiteral::Bool(*b),
        EnumValue::Null => TsLiteral::Null,
        EnumValue::Json(value) => return json_value_to_ts_type(value),
    };
    TsType::Literal(literal)
}

/// Convert an arbitrary JSON value to a literal type, `unknown` for containers.
pub fn json_value_to_ts_type(value: &serde_json::Value) -> TsType {
    match value {
        serde_json::Value::Null => TsType::Literal(TsLiteral::Null),
        serde_json::Value::Bool(b) => TsType::Literal(TsLiteral::Bool(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => TsType::Literal(TsLiteral::Int(i)),
            None => TsType::Literal(TsLiteral::Number(n.as_f64().unwrap_or(0.0))),
        },
        serde_json::Value::String(s) => TsType::Literal(TsLiteral::String(s.clone())),
        _ => TsType::Primitive(TsPrimitive::Unknown),
    }
}

/// Create a `Record<string, T>` type.
pub fn make_string_record(value_type: TsType) -> TsType {
    TsType::Record {
        key: Box::new(TsType::Primitive(TsPrimitive::String)),
        value: Box::new(value_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_quoting() {
        assert!(!needs_quoting("foo"));
        assert!(!needs_quoting("_foo"));
        assert!(!needs_quoting("$foo"));
        assert!(!needs_quoting("foo123"));

        assert!(needs_quoting(""));
        assert!(needs_quoting("123foo"));
        assert!(needs_quoting("foo-bar"));
        assert!(needs_quoting("room:join"));
        assert!(needs_quoting("foo bar"));
    }

    #[test]
    fn test_escape_js_string() {
        assert_eq!(escape_js_string("hello"), "hello");
        assert_eq!(escape_js_string("hel\"lo"), "hel\\\"lo");
        assert_eq!(escape_js_string("hel\\lo"), "hel\\\\lo");
        assert_eq!(escape_js_string("a\nb"), "a\\nb");
    }

    #[test]
    fn test_escape_template() {
        assert_eq!(escape_template("/rooms/"), "/rooms/");
        assert_eq!(escape_template("a`b"), "a\\`b");
        assert_eq!(escape_template("cost ${x}"), "cost \\${x}");
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("foo"), "foo");
        assert_eq!(quote_if_needed("foo-bar"), "\"foo-bar\"");
        assert_eq!(quote_if_needed("localhost:8080"), "\"localhost:8080\"");
    }

    #[test]
    fn test_format_doc() {
        assert_eq!(format_doc("/test/{id}", 0), "/** /test/{id} */\n");
        assert_eq!(format_doc("end */ here", 1), "  /** end *\\/ here */\n");
        assert_eq!(
            format_doc("First line\n\nSecond", 0),
            "/**\n * First line\n *\n * Second\n */\n"
        );
    }

    #[test]
    fn test_indent_block() {
        assert_eq!(indent_block("a\n\nb\n", 1), "  a\n\n  b\n");
    }
}
