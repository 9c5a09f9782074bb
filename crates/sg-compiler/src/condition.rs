use rhai::Engine;
use sg_core::{ErrorKind, GameError};

pub fn check_condition_syntax(expr: &str) -> Result<(), GameError> {
    if expr.trim().is_empty() {
        return Err(GameError::new(
            ErrorKind::RuleCompile,
            "RULE_CONDITION_EMPTY",
            "Loop condition must not be empty.",
        ));
    }

    Engine::new_raw()
        .compile_expression(expr)
        .map(|_| ())
        .map_err(|error| {
            GameError::new(
                ErrorKind::RuleCompile,
                "RULE_CONDITION_INVALID",
                format!("Loop condition \"{}\" does not parse: {}", expr, error),
            )
        })
}

#[cfg(test)]
mod condition_tests {
    use super::*;

    #[test]
    fn accepts_comparisons_over_names() {
        check_condition_syntax("round >= 3").expect("comparison should parse");
        check_condition_syntax("a == 1 && (b != 2 || c < 0)").expect("boolean mix should parse");
    }

    #[test]
    fn rejects_empty_and_statements() {
        let error = check_condition_syntax("  ").expect_err("empty");
        assert_eq!(error.code, "RULE_CONDITION_EMPTY");
        let error = check_condition_syntax("let x = 1;").expect_err("statement");
        assert_eq!(error.code, "RULE_CONDITION_INVALID");
        let error = check_condition_syntax("round >=").expect_err("dangling operator");
        assert_eq!(error.code, "RULE_CONDITION_INVALID");
    }
}
