mod json;

pub use json::{field_kind, parse_structured_text, value_kind, ValueKind};
pub use serde_json::{Map as StructuredMap, Value as StructuredValue};
