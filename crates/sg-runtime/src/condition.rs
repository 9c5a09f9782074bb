use rhai::{Dynamic, Engine, Scope, INT};
use sg_core::{is_identifier, ErrorKind, GameError};

use crate::store::VariableStore;

/// Stop condition of a Loop rule, evaluated before every iteration.
pub trait ConditionEvaluator: Send + Sync {
    fn evaluate(&self, condition: &str, store: &VariableStore) -> Result<bool, GameError>;
}

impl<F> ConditionEvaluator for F
where
    F: Fn(&str, &VariableStore) -> Result<bool, GameError> + Send + Sync,
{
    fn evaluate(&self, condition: &str, store: &VariableStore) -> Result<bool, GameError> {
        self(condition, store)
    }
}

/// Evaluates `until` expressions with rhai, exposing every global variable
/// whose name is a plain identifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct RhaiConditionEvaluator;

impl ConditionEvaluator for RhaiConditionEvaluator {
    fn evaluate(&self, condition: &str, store: &VariableStore) -> Result<bool, GameError> {
        let mut engine = Engine::new();
        engine.set_strict_variables(true);

        let mut scope = Scope::new();
        for (name, value) in store.globals() {
            if is_identifier(name) {
                scope.push_constant(name.as_str(), *value as INT);
            }
        }

        let result = engine
            .eval_expression_with_scope::<Dynamic>(&mut scope, condition)
            .map_err(|error| {
                GameError::new(
                    ErrorKind::RuleExecution,
                    "RULE_CONDITION_EVAL",
                    format!("Loop condition \"{}\" failed: {}", condition, error),
                )
            })?;

        result.as_bool().map_err(|type_name| {
            GameError::new(
                ErrorKind::RuleExecution,
                "RULE_CONDITION_NOT_BOOL",
                format!(
                    "Loop condition \"{}\" produced {} instead of a boolean.",
                    condition, type_name
                ),
            )
        })
    }
}
