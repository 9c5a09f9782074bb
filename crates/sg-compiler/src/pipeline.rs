use std::path::PathBuf;

use serde_json::Value;
use sg_core::{ErrorKind, GameDescriptor, GameError, ServerConfig};
use sg_parser::parse_structured_text;
use tracing::{debug, warn};

use crate::rules::compile_rules;
use crate::validate::{validate_document, DocumentKind};
use crate::variables::compile_variables;

pub fn compile_game_from_text(source: &str) -> Result<GameDescriptor, GameError> {
    let document = parse_structured_text(source)?;
    compile_game_document(&document)
}

pub fn compile_game_document(document: &Value) -> Result<GameDescriptor, GameError> {
    compile_game_document_inner(document).map_err(|error| {
        warn!(code = %error.code, "rejected game document: {}", error.message);
        error
    })
}

fn compile_game_document_inner(document: &Value) -> Result<GameDescriptor, GameError> {
    validate_document(document, DocumentKind::GameSpec)?;

    let variables = compile_variables(&document["variables"], "variables")?;
    let per_player = compile_variables(&document["per-player"], "per-player")?;
    let rules = compile_rules(&document["rules"])?;

    if variables.is_empty() {
        return Err(GameError::new(
            ErrorKind::SchemaValidation,
            "GAME_VARIABLES_EMPTY",
            "Game document must declare at least one variable.",
        ));
    }
    if rules.is_empty() {
        return Err(GameError::new(
            ErrorKind::SchemaValidation,
            "GAME_RULES_EMPTY",
            "Game document must declare at least one rule.",
        ));
    }

    let descriptor = GameDescriptor {
        variables,
        per_player,
        rules,
    };
    debug!(
        variables = descriptor.variables.len(),
        per_player = descriptor.per_player.len(),
        rules = descriptor.rule_count(),
        "compiled game document"
    );
    Ok(descriptor)
}

pub fn compile_server_config_from_text(source: &str) -> Result<ServerConfig, GameError> {
    let document = parse_structured_text(source)?;
    compile_server_config(&document)
}

pub fn compile_server_config(document: &Value) -> Result<ServerConfig, GameError> {
    validate_document(document, DocumentKind::ServerConfig)?;

    let raw_port = document["port"].as_u64().unwrap_or(u64::MAX);
    let port = u16::try_from(raw_port).map_err(|_| {
        GameError::new(
            ErrorKind::SchemaValidation,
            "CONFIG_PORT_RANGE",
            format!("Port {} is outside 0..=65535.", raw_port),
        )
    })?;
    let server_html = PathBuf::from(document["serverhtml"].as_str().unwrap_or_default());

    Ok(ServerConfig { port, server_html })
}
