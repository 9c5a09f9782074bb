use std::fmt;

use serde_json::Value;
use sg_core::{ErrorKind, GameError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Object,
    Array,
    String,
    UnsignedInteger,
    Integer,
    Float,
    Bool,
    Null,
}

impl ValueKind {
    /// Unsigned integers are also acceptable where a signed integer is expected.
    pub fn satisfies(&self, expected: ValueKind) -> bool {
        *self == expected || (expected == Self::Integer && *self == Self::UnsignedInteger)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::UnsignedInteger => "unsigned integer",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

pub fn value_kind(value: &Value) -> ValueKind {
    match value {
        Value::Object(_) => ValueKind::Object,
        Value::Array(_) => ValueKind::Array,
        Value::String(_) => ValueKind::String,
        Value::Number(number) if number.is_u64() => ValueKind::UnsignedInteger,
        Value::Number(number) if number.is_i64() => ValueKind::Integer,
        Value::Number(_) => ValueKind::Float,
        Value::Bool(_) => ValueKind::Bool,
        Value::Null => ValueKind::Null,
    }
}

pub fn field_kind(value: &Value, field: &str) -> Option<ValueKind> {
    value.as_object()?.get(field).map(value_kind)
}

pub fn parse_structured_text(source: &str) -> Result<Value, GameError> {
    serde_json::from_str::<Value>(source).map_err(|error| {
        let offset = byte_offset(source, error.line(), error.column());
        GameError::with_offset(
            ErrorKind::Parse,
            "JSON_PARSE_ERROR",
            format!("Invalid JSON at byte {}: {}", offset, error),
            offset,
        )
    })
}

fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0usize;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            return (offset + column.saturating_sub(1)).min(source.len());
        }
        offset += text.len();
    }
    source.len()
}
