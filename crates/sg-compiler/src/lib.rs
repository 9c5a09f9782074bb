mod condition;
mod pipeline;
mod rules;
mod validate;
mod variables;

pub use condition::check_condition_syntax;
pub use pipeline::{
    compile_game_document, compile_game_from_text, compile_server_config,
    compile_server_config_from_text,
};
pub use rules::{compile_rule, compile_rules, AliasScope};
pub use validate::{validate_document, DocumentKind, GAME_SPEC_SCHEMA, SERVER_CONFIG_SCHEMA};
pub use variables::compile_variables;

#[cfg(test)]
pub(crate) mod compiler_test_support {
    use serde_json::Value;
    use sg_core::VariablePath;

    pub(crate) fn path(raw: &str) -> VariablePath {
        VariablePath::parse(raw).expect("path should parse")
    }

    pub(crate) fn game_document(variables: Value, per_player: Value, rules: Value) -> Value {
        serde_json::json!({
            "configuration": {"name": "test"},
            "constants": {},
            "variables": variables,
            "per-player": per_player,
            "per-audience": {},
            "rules": rules,
        })
    }
}
