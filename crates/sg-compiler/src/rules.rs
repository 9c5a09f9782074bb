use serde_json::{Map, Value};
use sg_core::{
    is_identifier, ErrorKind, GameError, PathSegment, RuleNode, VariablePath, PLAYERS_SEGMENT,
    RULE_DISCRIMINATOR,
};
use sg_parser::{value_kind, ValueKind};

use crate::condition::check_condition_syntax;

/// Compile-time aliases introduced by enclosing `foreach` rules, innermost last.
///
/// Each nested body receives its own extended copy, so an alias lives exactly
/// as long as the recursive call that compiles its body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasScope {
    entries: Vec<(String, Vec<PathSegment>)>,
}

impl AliasScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(&self, element: &str, list: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.push((
            element.to_string(),
            vec![
                PathSegment::Literal(list.to_string()),
                PathSegment::Placeholder(element.to_string()),
            ],
        ));
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<&[PathSegment]> {
        self.entries
            .iter()
            .rev()
            .find(|(alias, _)| alias == name)
            .map(|(_, expansion)| expansion.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rewrite(&self, path: &VariablePath) -> Result<VariablePath, GameError> {
        let mut segments = Vec::with_capacity(path.segments().len() + 1);
        for segment in path.segments() {
            match segment {
                PathSegment::Literal(name) => match self.lookup(name) {
                    Some(expansion) => segments.extend(expansion.iter().cloned()),
                    None => segments.push(segment.clone()),
                },
                PathSegment::Placeholder(_) => segments.push(segment.clone()),
            }
        }
        VariablePath::from_segments(segments)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Add,
    GlobalMessage,
    ForEach,
    Loop,
    InputText,
}

impl RuleKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Self::Add),
            "global-message" => Some(Self::GlobalMessage),
            "foreach" => Some(Self::ForEach),
            "loop" => Some(Self::Loop),
            "input-text" => Some(Self::InputText),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::GlobalMessage => "global-message",
            Self::ForEach => "foreach",
            Self::Loop => "loop",
            Self::InputText => "input-text",
        }
    }

    fn fields(&self) -> &'static [(&'static str, ValueKind)] {
        match self {
            Self::Add => &[("to", ValueKind::String), ("value", ValueKind::Integer)],
            Self::GlobalMessage => &[("value", ValueKind::String)],
            Self::ForEach => &[
                ("list", ValueKind::String),
                ("element", ValueKind::String),
                ("rules", ValueKind::Array),
            ],
            Self::Loop => &[("until", ValueKind::String), ("rules", ValueKind::Array)],
            Self::InputText => &[
                ("to", ValueKind::String),
                ("prompt", ValueKind::String),
                ("result", ValueKind::String),
            ],
        }
    }
}

pub fn compile_rules(value: &Value) -> Result<Vec<RuleNode>, GameError> {
    compile_rule_list(value, &AliasScope::new(), "rules")
}

pub fn compile_rule(value: &Value, scope: &AliasScope) -> Result<RuleNode, GameError> {
    compile_rule_at(value, scope, "rule")
}

fn compile_rule_list(
    value: &Value,
    scope: &AliasScope,
    location: &str,
) -> Result<Vec<RuleNode>, GameError> {
    let Some(items) = value.as_array() else {
        return Err(compile_error(
            "RULES_NOT_ARRAY",
            location,
            format!("rule list must be an array, got {}", value_kind(value)),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| compile_rule_at(item, scope, &format!("{}[{}]", location, index)))
        .collect()
}

fn compile_rule_at(value: &Value, scope: &AliasScope, location: &str) -> Result<RuleNode, GameError> {
    let Some(object) = value.as_object() else {
        return Err(compile_error(
            "RULE_NOT_OBJECT",
            location,
            format!("rule must be an object, got {}", value_kind(value)),
        ));
    };

    let Some(discriminator) = object.get(RULE_DISCRIMINATOR) else {
        return Err(compile_error(
            "RULE_KIND_MISSING",
            location,
            format!("rule does not name its kind (\"{}\" missing)", RULE_DISCRIMINATOR),
        ));
    };
    let Some(kind_name) = discriminator.as_str() else {
        return Err(compile_error(
            "RULE_KIND_MISSING",
            location,
            format!("\"{}\" must be a string", RULE_DISCRIMINATOR),
        ));
    };
    let Some(kind) = RuleKind::from_name(kind_name) else {
        return Err(compile_error(
            "RULE_KIND_UNKNOWN",
            location,
            format!("unrecognized rule kind \"{}\"", kind_name),
        ));
    };

    check_fields(object, kind, location)?;

    match kind {
        RuleKind::Add => {
            let to = compile_path(str_field(object, "to"), scope, location)?;
            let Some(value) = object.get("value").and_then(Value::as_i64) else {
                return Err(compile_error(
                    "RULE_FIELD_TYPE",
                    location,
                    "field \"value\" of add rule is out of integer range",
                ));
            };
            Ok(RuleNode::Add { to, value })
        }
        RuleKind::GlobalMessage => Ok(RuleNode::GlobalMessage {
            value: str_field(object, "value").to_string(),
        }),
        RuleKind::ForEach => {
            let list = str_field(object, "list");
            let element = str_field(object, "element");
            if list != PLAYERS_SEGMENT {
                return Err(compile_error(
                    "RULE_LIST_UNSUPPORTED",
                    location,
                    format!(
                        "list \"{}\" is not supported, only \"{}\" can be iterated",
                        list, PLAYERS_SEGMENT
                    ),
                ));
            }
            if !is_identifier(element) || element == PLAYERS_SEGMENT {
                return Err(compile_error(
                    "RULE_ELEMENT_INVALID",
                    location,
                    format!("element name \"{}\" is not a usable alias", element),
                ));
            }

            let body_scope = scope.with_alias(element, list);
            let rules = compile_rule_list(
                object.get("rules").unwrap_or(&Value::Null),
                &body_scope,
                &format!("{}.rules", location),
            )?;
            Ok(RuleNode::ForEach {
                list: list.to_string(),
                element: element.to_string(),
                rules,
            })
        }
        RuleKind::Loop => {
            let until = str_field(object, "until");
            check_condition_syntax(until).map_err(|error| error.in_context(location))?;
            let rules = compile_rule_list(
                object.get("rules").unwrap_or(&Value::Null),
                scope,
                &format!("{}.rules", location),
            )?;
            Ok(RuleNode::Loop {
                until: until.to_string(),
                rules,
            })
        }
        RuleKind::InputText => {
            let to = compile_path(str_field(object, "to"), scope, location)?;
            check_player_target(&to, location)?;
            Ok(RuleNode::InputText {
                to,
                prompt: str_field(object, "prompt").to_string(),
                result: compile_path(str_field(object, "result"), scope, location)?,
            })
        }
    }
}

fn check_fields(object: &Map<String, Value>, kind: RuleKind, location: &str) -> Result<(), GameError> {
    let fields = kind.fields();

    for (field, expected) in fields {
        let Some(value) = object.get(*field) else {
            return Err(compile_error(
                "RULE_FIELD_MISSING",
                location,
                format!("{} rule is missing field \"{}\"", kind.name(), field),
            ));
        };
        let actual = value_kind(value);
        if !actual.satisfies(*expected) {
            return Err(compile_error(
                "RULE_FIELD_TYPE",
                location,
                format!(
                    "field \"{}\" of {} rule must be {}, got {}",
                    field,
                    kind.name(),
                    expected,
                    actual
                ),
            ));
        }
    }

    if let Some(extra) = object
        .keys()
        .find(|key| {
            key.as_str() != RULE_DISCRIMINATOR
                && !fields.iter().any(|(field, _)| *field == key.as_str())
        })
    {
        return Err(compile_error(
            "RULE_FIELD_UNKNOWN",
            location,
            format!("{} rule has unexpected field \"{}\"", kind.name(), extra),
        ));
    }

    Ok(())
}

fn compile_path(raw: &str, scope: &AliasScope, location: &str) -> Result<VariablePath, GameError> {
    let parsed = VariablePath::parse(raw).map_err(|error| {
        GameError::new(ErrorKind::RuleCompile, "RULE_PATH_INVALID", error.message).in_context(location)
    })?;
    scope.rewrite(&parsed)
}

/// Input targets must name one player: `players.<id>` or an alias of one.
fn check_player_target(path: &VariablePath, location: &str) -> Result<(), GameError> {
    let is_player = match path.segments() {
        [players, PathSegment::Placeholder(_)] => players.is_players(),
        [players, PathSegment::Literal(id)] => players.is_players() && id.parse::<u64>().is_ok(),
        _ => false,
    };
    if is_player {
        return Ok(());
    }
    Err(compile_error(
        "RULE_PATH_INVALID",
        location,
        format!("input target \"{}\" is not a player reference", path),
    ))
}

// Only called after check_fields has confirmed the field is a string.
fn str_field<'a>(object: &'a Map<String, Value>, field: &str) -> &'a str {
    object.get(field).and_then(Value::as_str).unwrap_or_default()
}

fn compile_error(code: &str, location: &str, message: impl AsRef<str>) -> GameError {
    GameError::new(
        ErrorKind::RuleCompile,
        code,
        format!("{}: {}", location, message.as_ref()),
    )
}

#[cfg(test)]
mod rules_tests {
    use super::*;
    use crate::compiler_test_support::path;
    use serde_json::json;

    #[test]
    fn compiles_add_rule() {
        let rules = compile_rules(&json!([{"rule": "add", "to": "debug_target", "value": 1}]))
            .expect("rules should compile");
        assert_eq!(
            rules,
            vec![RuleNode::Add {
                to: path("debug_target"),
                value: 1
            }]
        );
    }

    #[test]
    fn foreach_rewrites_bare_alias_references() {
        let rules = compile_rules(&json!([{
            "rule": "foreach",
            "list": "players",
            "element": "player",
            "rules": [
                {"rule": "add", "to": "player.input", "value": 2},
                {"rule": "input-text", "to": "player", "prompt": "Pick", "result": "player.choice"}
            ]
        }]))
        .expect("rules should compile");

        let RuleNode::ForEach { element, rules, .. } = &rules[0] else {
            panic!("expected foreach");
        };
        assert_eq!(element, "player");
        assert_eq!(
            rules[0],
            RuleNode::Add {
                to: path("players.$player.input"),
                value: 2
            }
        );
        assert_eq!(
            rules[1],
            RuleNode::InputText {
                to: path("players.$player"),
                prompt: "Pick".to_string(),
                result: path("players.$player.choice"),
            }
        );
    }

    #[test]
    fn alias_does_not_leak_out_of_foreach_body() {
        let rules = compile_rules(&json!([
            {
                "rule": "foreach", "list": "players", "element": "p",
                "rules": [{"rule": "add", "to": "p.score", "value": 1}]
            },
            {"rule": "add", "to": "p", "value": 1}
        ]))
        .expect("rules should compile");
        assert_eq!(
            rules[1],
            RuleNode::Add {
                to: path("p"),
                value: 1
            }
        );
    }

    #[test]
    fn nested_foreach_aliases_compose() {
        let rules = compile_rules(&json!([{
            "rule": "foreach", "list": "players", "element": "a",
            "rules": [{
                "rule": "foreach", "list": "players", "element": "b",
                "rules": [
                    {"rule": "add", "to": "a.score", "value": 1},
                    {"rule": "add", "to": "b.score", "value": -1}
                ]
            }]
        }]))
        .expect("rules should compile");
        let inner = rules[0].body().expect("outer body")[0]
            .body()
            .expect("inner body");
        assert_eq!(
            inner[0],
            RuleNode::Add {
                to: path("players.$a.score"),
                value: 1
            }
        );
        assert_eq!(
            inner[1],
            RuleNode::Add {
                to: path("players.$b.score"),
                value: -1
            }
        );
    }

    #[test]
    fn already_qualified_placeholders_are_left_alone() {
        let rules = compile_rules(&json!([{
            "rule": "foreach", "list": "players", "element": "p",
            "rules": [{"rule": "add", "to": "players.$p.input", "value": 1}]
        }]))
        .expect("rules should compile");
        assert_eq!(
            rules[0].body().expect("body")[0],
            RuleNode::Add {
                to: path("players.$p.input"),
                value: 1
            }
        );
    }

    #[test]
    fn alias_scope_lookup_prefers_innermost() {
        let scope = AliasScope::new().with_alias("p", "players").with_alias("q", "players");
        assert!(!scope.is_empty());
        assert_eq!(
            scope.rewrite(&path("q.x")).expect("rewrite"),
            path("players.$q.x")
        );
        assert!(scope.lookup("r").is_none());
        assert!(AliasScope::new().is_empty());
    }

    #[test]
    fn compiles_loop_with_condition() {
        let rules = compile_rules(&json!([{
            "rule": "loop", "until": "round >= 3",
            "rules": [{"rule": "add", "to": "round", "value": 1}]
        }]))
        .expect("rules should compile");
        assert_eq!(
            rules[0],
            RuleNode::Loop {
                until: "round >= 3".to_string(),
                rules: vec![RuleNode::Add {
                    to: path("round"),
                    value: 1
                }],
            }
        );
    }

    #[test]
    fn rejects_missing_fields() {
        let error = compile_rules(&json!([{"rule": "add", "to": "x"}])).expect_err("missing value");
        assert_eq!(error.code, "RULE_FIELD_MISSING");
        assert_eq!(error.kind, ErrorKind::RuleCompile);
        assert!(error.message.starts_with("rules[0]"));

        let error = compile_rules(&json!([{"to": "x", "value": 1}])).expect_err("missing kind");
        assert_eq!(error.code, "RULE_KIND_MISSING");
    }

    #[test]
    fn rejects_extra_fields() {
        let error = compile_rules(&json!([
            {"rule": "global-message", "value": "hi", "vaule": "typo"}
        ]))
        .expect_err("extra field");
        assert_eq!(error.code, "RULE_FIELD_UNKNOWN");
        assert!(error.message.contains("vaule"));
    }

    #[test]
    fn rejects_wrong_field_types() {
        let error = compile_rules(&json!([{"rule": "add", "to": "x", "value": "1"}]))
            .expect_err("string value");
        assert_eq!(error.code, "RULE_FIELD_TYPE");
        let error = compile_rules(&json!([{"rule": "add", "to": "x", "value": 1.5}]))
            .expect_err("float value");
        assert_eq!(error.code, "RULE_FIELD_TYPE");
        let error = compile_rules(&json!([{"rule": "add", "to": "x", "value": u64::MAX}]))
            .expect_err("overflowing value");
        assert_eq!(error.code, "RULE_FIELD_TYPE");
    }

    #[test]
    fn unknown_kind_aborts_whole_list_without_partial_tree() {
        let result = compile_rules(&json!([
            {"rule": "add", "to": "x", "value": 1},
            {"rule": "foreach", "list": "players", "element": "p", "rules": [
                {"rule": "teleport"}
            ]}
        ]));
        let error = result.expect_err("unknown nested kind should fail");
        assert_eq!(error.code, "RULE_KIND_UNKNOWN");
        assert!(error.message.starts_with("rules[1].rules[0]"));
    }

    #[test]
    fn foreach_only_iterates_players() {
        let error = compile_rules(&json!([{
            "rule": "foreach", "list": "audience", "element": "a", "rules": []
        }]))
        .expect_err("unsupported list");
        assert_eq!(error.code, "RULE_LIST_UNSUPPORTED");

        let error = compile_rules(&json!([{
            "rule": "foreach", "list": "players", "element": "p.q", "rules": []
        }]))
        .expect_err("dotted element");
        assert_eq!(error.code, "RULE_ELEMENT_INVALID");
    }

    #[test]
    fn rejects_bad_paths_and_conditions() {
        let error = compile_rules(&json!([{"rule": "add", "to": "players..x", "value": 1}]))
            .expect_err("empty segment");
        assert_eq!(error.code, "RULE_PATH_INVALID");
        assert_eq!(error.kind, ErrorKind::RuleCompile);

        let error = compile_rules(&json!([{"rule": "loop", "until": "x >", "rules": []}]))
            .expect_err("bad condition");
        assert_eq!(error.code, "RULE_CONDITION_INVALID");
    }

    #[test]
    fn input_target_must_reference_a_player() {
        for target in ["score", "players", "players.x", "players.1.input", "p.input"] {
            let error = compile_rules(&json!([{
                "rule": "foreach", "list": "players", "element": "p",
                "rules": [{"rule": "input-text", "to": target, "prompt": "?", "result": "p.input"}]
            }]))
            .expect_err("non-player target");
            assert_eq!(error.code, "RULE_PATH_INVALID", "target {}", target);
            assert!(error.message.starts_with("rules[0].rules[0]"));
        }

        let rules = compile_rules(&json!([
            {"rule": "input-text", "to": "players.4", "prompt": "?", "result": "x"},
            {"rule": "input-text", "to": "players.$p", "prompt": "?", "result": "x"}
        ]))
        .expect("player targets compile");
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn rejects_non_array_rule_list_and_non_object_rules() {
        let error = compile_rules(&json!({"rule": "add"})).expect_err("object list");
        assert_eq!(error.code, "RULES_NOT_ARRAY");
        let error = compile_rules(&json!(["add"])).expect_err("string rule");
        assert_eq!(error.code, "RULE_NOT_OBJECT");
    }

    #[test]
    fn compile_rule_uses_given_scope() {
        let scope = AliasScope::new().with_alias("p", "players");
        let rule = compile_rule(&json!({"rule": "add", "to": "p.x", "value": 3}), &scope)
            .expect("rule should compile");
        assert_eq!(
            rule,
            RuleNode::Add {
                to: path("players.$p.x"),
                value: 3
            }
        );
    }
}
