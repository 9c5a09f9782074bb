use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, GameError};

pub const PLAYERS_SEGMENT: &str = "players";
pub const PLACEHOLDER_PREFIX: char = '$';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum PathSegment {
    Literal(String),
    Placeholder(String),
}

impl PathSegment {
    pub fn is_players(&self) -> bool {
        matches!(self, Self::Literal(name) if name == PLAYERS_SEGMENT)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(name) => write!(f, "{}", name),
            Self::Placeholder(name) => write!(f, "{}{}", PLACEHOLDER_PREFIX, name),
        }
    }
}

/// A dotted variable path split into typed segments once, so runtime
/// resolution never re-scans strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariablePath {
    segments: Vec<PathSegment>,
}

impl VariablePath {
    pub fn parse(raw: &str) -> Result<Self, GameError> {
        let mut segments = Vec::new();
        for part in raw.split('.') {
            if part.is_empty() {
                return Err(GameError::new(
                    ErrorKind::PathResolution,
                    "PATH_SEGMENT_EMPTY",
                    format!("Variable path \"{}\" contains an empty segment.", raw),
                ));
            }
            match part.strip_prefix(PLACEHOLDER_PREFIX) {
                Some("") => {
                    return Err(GameError::new(
                        ErrorKind::PathResolution,
                        "PATH_PLACEHOLDER_EMPTY",
                        format!("Variable path \"{}\" has a placeholder without a name.", raw),
                    ))
                }
                Some(name) => segments.push(PathSegment::Placeholder(name.to_string())),
                None => segments.push(PathSegment::Literal(part.to_string())),
            }
        }
        Ok(Self { segments })
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Result<Self, GameError> {
        if segments.is_empty() {
            return Err(GameError::new(
                ErrorKind::PathResolution,
                "PATH_SEGMENT_EMPTY",
                "Variable path must have at least one segment.",
            ));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_player_path(&self) -> bool {
        self.segments.iter().any(PathSegment::is_players)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Placeholder(name) => Some(name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }
}

impl fmt::Display for VariablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for VariablePath {
    type Err = GameError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl TryFrom<String> for VariablePath {
    type Error = GameError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<VariablePath> for String {
    fn from(path: VariablePath) -> Self {
        path.to_string()
    }
}
