use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Parse,
    SchemaValidation,
    RuleCompile,
    VariableNotFound,
    PlayerNotFound,
    ScopeConflict,
    PathResolution,
    RuleExecution,
    Session,
    Io,
}

impl ErrorKind {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::SchemaValidation => "schema validation",
            Self::RuleCompile => "rule compilation",
            Self::VariableNotFound | Self::PlayerNotFound | Self::PathResolution => {
                "variable lookup"
            }
            Self::ScopeConflict => "scope binding",
            Self::RuleExecution => "rule execution",
            Self::Session => "session",
            Self::Io => "io",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{code}: {message}")]
pub struct GameError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub offset: Option<usize>,
}

impl GameError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            offset: None,
        }
    }

    pub fn with_offset(
        kind: ErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            offset: Some(offset),
        }
    }

    /// Rewraps the error as the failure of an enclosing rule, keeping the
    /// original code and kind.
    pub fn in_context(mut self, context: impl AsRef<str>) -> Self {
        self.message = format!("{}: {}", context.as_ref(), self.message);
        self
    }
}
