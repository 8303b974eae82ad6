//! # Literal Values
//!
//! Default values, directive arguments and extension metadata are stored as owned [Value]s on
//! composer nodes. Unlike parsed source they outlive any arena, since composer nodes are freely
//! cloned and merged between schemas.

use indexmap::IndexMap;
use std::fmt::{self, Write};

/// Opaque metadata attached to schema nodes. Extensions are cloned and merged alongside their
/// nodes but never printed to SDL.
pub type Extensions = IndexMap<String, Value>;

/// A constant GraphQL input value.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Values)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the inner string slice for string values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Write this value to a buffer as a GraphQL literal. Strings are always printed quoted.
    pub fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        match self {
            Value::Null => buffer.write_str("null"),
            Value::Int(value) => write!(buffer, "{}", value),
            Value::Float(value) => write_float(*value, buffer),
            Value::String(value) => write_string(value, buffer),
            Value::Boolean(true) => buffer.write_str("true"),
            Value::Boolean(false) => buffer.write_str("false"),
            Value::Enum(value) => buffer.write_str(value),
            Value::List(values) => {
                buffer.write_char('[')?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        buffer.write_str(", ")?;
                    }
                    value.write_to_buffer(buffer)?;
                }
                buffer.write_char(']')
            }
            Value::Object(fields) => {
                buffer.write_char('{')?;
                for (index, (name, value)) in fields.iter().enumerate() {
                    if index > 0 {
                        buffer.write_str(", ")?;
                    }
                    write!(buffer, "{}: ", name)?;
                    value.write_to_buffer(buffer)?;
                }
                buffer.write_char('}')
            }
        }
    }
}

impl fmt::Display for Value {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to_buffer(f)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

fn write_float(value: f64, buffer: &mut dyn Write) -> fmt::Result {
    use lexical_core::FormattedSize;
    if !value.is_finite() {
        // GraphQL floats are limited to finite values
        return buffer.write_str("null");
    }
    let mut buf = [b'0'; f64::FORMATTED_SIZE_DECIMAL];
    let written = lexical_core::write(value, &mut buf);
    buffer.write_str(std::str::from_utf8(written).map_err(|_| fmt::Error)?)
}

/// Determines whether a description may be printed as a block string and read back unchanged.
///
/// Block strings lose leading and trailing blank lines, whitespace-only lines, and the
/// indentation shared by all of their lines when they're read.
pub(crate) fn is_block_string(value: &str) -> bool {
    if !value.contains('\n') {
        return false;
    }
    let is_indent = |c: char| c == ' ' || c == '\t';
    let mut unindented = false;
    let last = value.split('\n').count() - 1;
    for (index, line) in value.split('\n').enumerate() {
        if line.is_empty() {
            if index == 0 || index == last {
                return false;
            }
            continue;
        }
        if line.trim_matches(is_indent).is_empty()
            || line.chars().any(|c| c < ' ' && c != '\t')
        {
            return false;
        }
        unindented |= !line.starts_with(is_indent);
    }
    unindented
}

/// Writes a quoted and escaped string literal.
pub(crate) fn write_string(value: &str, buffer: &mut dyn Write) -> fmt::Result {
    // See: https://github.com/graphql-rust/graphql-parser/blob/ff34bae/src/format.rs#L127-L167
    buffer.write_char('"')?;
    for c in value.chars() {
        match c {
            '\r' => buffer.write_str(r"\r")?,
            '\n' => buffer.write_str(r"\n")?,
            '\t' => buffer.write_str(r"\t")?,
            '"' => buffer.write_str("\\\"")?,
            '\\' => buffer.write_str(r"\\")?,
            '\u{0000}'..='\u{001F}' => write!(buffer, "\\u{:04X}", c as u32)?,
            _ => buffer.write_char(c)?,
        };
    }
    buffer.write_char('"')
}

/// Writes a description, as an indented block string when it spans multiple lines.
pub(crate) fn write_description(value: &str, level: usize, buffer: &mut dyn Write) -> fmt::Result {
    if !is_block_string(value) {
        return write_string(value, buffer);
    }
    buffer.write_str("\"\"\"\n")?;
    for line in value.split('\n') {
        if !line.is_empty() {
            write_indent(level, buffer)?;
            buffer.write_str(&line.replace(r#"""""#, r#"\""""#))?;
        }
        buffer.write_char('\n')?;
    }
    write_indent(level, buffer)?;
    buffer.write_str("\"\"\"")
}

#[inline]
pub(crate) fn write_indent(level: usize, buffer: &mut dyn Write) -> fmt::Result {
    for _ in 0..level {
        buffer.write_str("  ")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_scalars() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Int(-12).to_string(), "-12");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Enum("ASC".into()).to_string(), "ASC");
    }

    #[test]
    fn prints_escaped_strings() {
        assert_eq!(Value::from("hi \"there\"").to_string(), r#""hi \"there\"""#);
        assert_eq!(Value::from("tab\there").to_string(), r#""tab\there""#);
    }

    #[test]
    fn prints_string_values_quoted() {
        assert_eq!(Value::from("  x\n  y").to_string(), r#""  x\n  y""#);
        assert_eq!(Value::from("😀 smile").to_string(), "\"😀 smile\"");
        assert_eq!(Value::from("bell\u{7}").to_string(), r#""bell\u0007""#);
    }

    #[test]
    fn prints_block_descriptions() {
        let mut out = String::new();
        write_description("first\n\n  second", 1, &mut out).unwrap();
        assert_eq!(out, "\"\"\"\n  first\n\n    second\n  \"\"\"");

        for value in ["  x\n  y", "q\"\n", "\nfirst", "a\n  \nb", "a\r\nb"] {
            assert!(!is_block_string(value), "{:?}", value);
            out.clear();
            write_description(value, 1, &mut out).unwrap();
            assert!(out.starts_with('"') && !out.starts_with("\"\"\""));
        }
    }

    #[test]
    fn prints_composite_values() {
        let mut object = IndexMap::new();
        object.insert("limit".to_string(), Value::Int(10));
        object.insert("tags".to_string(), Value::from(vec!["a", "b"]));
        assert_eq!(
            Value::Object(object).to_string(),
            r#"{limit: 10, tags: ["a", "b"]}"#
        );
    }
}
