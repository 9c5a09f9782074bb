use serde_json::Value;
use sg_core::{ErrorKind, GameError, VariableMap};
use sg_parser::value_kind;

pub fn compile_variables(value: &Value, section: &str) -> Result<VariableMap, GameError> {
    let Some(object) = value.as_object() else {
        return Err(GameError::new(
            ErrorKind::SchemaValidation,
            "VARIABLES_NOT_OBJECT",
            format!(
                "Section \"{}\" must be an object of name to integer, got {}.",
                section,
                value_kind(value)
            ),
        ));
    };

    let mut variables = VariableMap::new();
    for (name, raw) in object {
        let Some(initial) = raw.as_i64() else {
            return Err(GameError::new(
                ErrorKind::SchemaValidation,
                "VARIABLE_VALUE_TYPE",
                format!(
                    "Variable \"{}.{}\" must be an integer, got {}.",
                    section,
                    name,
                    value_kind(raw)
                ),
            ));
        };
        variables.insert(name.clone(), initial);
    }

    Ok(variables)
}

#[cfg(test)]
mod variables_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compiles_integer_map() {
        let variables =
            compile_variables(&json!({"debug_target": -40, "round": 0}), "variables")
                .expect("variables should compile");
        assert_eq!(variables.get("debug_target"), Some(&-40));
        assert_eq!(variables.get("round"), Some(&0));
    }

    #[test]
    fn empty_object_is_an_empty_map() {
        let variables = compile_variables(&json!({}), "per-player").expect("empty section");
        assert!(variables.is_empty());
    }

    #[test]
    fn rejects_non_integer_values() {
        for bad in [json!(1.5), json!("1"), json!(true), json!(null), json!(u64::MAX)] {
            let error = compile_variables(&json!({ "x": bad }), "variables")
                .expect_err("non-integer should fail");
            assert_eq!(error.code, "VARIABLE_VALUE_TYPE");
            assert!(error.message.contains("variables.x"));
        }
    }

    #[test]
    fn rejects_non_object_section() {
        let error = compile_variables(&json!([1]), "variables").expect_err("array section");
        assert_eq!(error.code, "VARIABLES_NOT_OBJECT");
    }
}
