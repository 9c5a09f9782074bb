use std::fmt::Display;

use sg_core::{ErrorKind, GameError};

fn map_error(kind: ErrorKind, code: &'static str, error: impl Display) -> GameError {
    GameError::new(kind, code, error.to_string())
}

fn error_lines(error: &GameError) -> Vec<String> {
    vec![
        "RESULT:ERROR".to_string(),
        format!("ERROR_CODE:{}", error.code),
        format!("ERROR_STAGE:{}", error.kind.stage()),
        format!(
            "ERROR_MSG_JSON:{}",
            serde_json::to_string(&error.message).expect("string json")
        ),
    ]
}

pub(crate) fn emit_error(error: GameError) -> i32 {
    for line in error_lines(&error) {
        println!("{}", line);
    }
    1
}

pub(crate) fn map_cli_games_scan(error: walkdir::Error) -> GameError {
    map_error(ErrorKind::Io, "CLI_GAMES_SCAN", error)
}

pub(crate) fn map_cli_reply_format(raw: &str) -> GameError {
    map_error(
        ErrorKind::Session,
        "CLI_REPLY_FORMAT",
        format!("Reply \"{}\" must look like <player>:<text>.", raw),
    )
}

pub(crate) fn map_cli_dump(error: serde_json::Error) -> GameError {
    map_error(ErrorKind::Io, "CLI_DUMP", error)
}
