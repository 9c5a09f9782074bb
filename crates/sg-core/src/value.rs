use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

pub type VariableValue = i64;
pub type PlayerId = u64;
pub type VariableMap = BTreeMap<String, VariableValue>;

pub fn is_identifier(name: &str) -> bool {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex must compile"))
        .is_match(name)
}

/// Integer replies are accepted with surrounding whitespace and an optional sign.
pub fn parse_variable_value(text: &str) -> Option<VariableValue> {
    text.trim().parse::<VariableValue>().ok()
}
