use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::path::VariablePath;
use crate::value::{PlayerId, VariableMap, VariableValue};

pub const RULE_DISCRIMINATOR: &str = "rule";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum RuleNode {
    Add {
        to: VariablePath,
        value: VariableValue,
    },
    GlobalMessage {
        value: String,
    },
    #[serde(rename = "foreach")]
    ForEach {
        list: String,
        element: String,
        rules: Vec<RuleNode>,
    },
    Loop {
        until: String,
        rules: Vec<RuleNode>,
    },
    InputText {
        to: VariablePath,
        prompt: String,
        result: VariablePath,
    },
}

impl RuleNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::GlobalMessage { .. } => "global-message",
            Self::ForEach { .. } => "foreach",
            Self::Loop { .. } => "loop",
            Self::InputText { .. } => "input-text",
        }
    }

    pub fn body(&self) -> Option<&[RuleNode]> {
        match self {
            Self::ForEach { rules, .. } | Self::Loop { rules, .. } => Some(rules),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDescriptor {
    pub variables: VariableMap,
    pub per_player: VariableMap,
    pub rules: Vec<RuleNode>,
}

impl GameDescriptor {
    pub fn rule_count(&self) -> usize {
        fn count(rules: &[RuleNode]) -> usize {
            rules
                .iter()
                .map(|rule| 1 + rule.body().map(count).unwrap_or(0))
                .sum()
        }
        count(&self.rules)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub port: u16,
    pub server_html: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SessionOutput {
    Broadcast { text: String },
    InputRequest { player: PlayerId, prompt: String },
    End,
}

#[cfg(test)]
mod types_tests {
    use super::*;

    fn path(raw: &str) -> VariablePath {
        VariablePath::parse(raw).expect("path should parse")
    }

    #[test]
    fn rule_node_serializes_with_document_discriminators() {
        let rule = RuleNode::ForEach {
            list: "players".to_string(),
            element: "p".to_string(),
            rules: vec![RuleNode::Add {
                to: path("players.$p.input"),
                value: 1,
            }],
        };
        let json = serde_json::to_value(&rule).expect("rule should serialize");
        assert_eq!(json["rule"], "foreach");
        assert_eq!(json["rules"][0]["rule"], "add");
        assert_eq!(json["rules"][0]["to"], "players.$p.input");

        let message = serde_json::to_value(RuleNode::GlobalMessage {
            value: "hi".to_string(),
        })
        .expect("rule should serialize");
        assert_eq!(message["rule"], "global-message");
    }

    #[test]
    fn rule_count_includes_nested_bodies() {
        let descriptor = GameDescriptor {
            variables: VariableMap::from([("round".to_string(), 0)]),
            per_player: VariableMap::new(),
            rules: vec![
                RuleNode::GlobalMessage {
                    value: "start".to_string(),
                },
                RuleNode::Loop {
                    until: "round >= 2".to_string(),
                    rules: vec![
                        RuleNode::Add {
                            to: path("round"),
                            value: 1,
                        },
                        RuleNode::ForEach {
                            list: "players".to_string(),
                            element: "p".to_string(),
                            rules: vec![RuleNode::GlobalMessage {
                                value: "turn".to_string(),
                            }],
                        },
                    ],
                },
            ],
        };
        assert_eq!(descriptor.rule_count(), 5);
        assert_eq!(descriptor.rules[1].kind_name(), "loop");
        assert!(descriptor.rules[0].body().is_none());
    }
}
