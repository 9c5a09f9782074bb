use std::fs;
use std::path::Path;
use std::sync::Arc;

use sg_compiler::{compile_game_from_text, compile_server_config_from_text};
use sg_core::{ErrorKind, GameDescriptor, GameError, PlayerId, ServerConfig};

mod driver;
mod lobby;
mod transport;

pub use driver::{drive_session, Boundary, SessionProgress};
pub use lobby::{Lobby, LobbyStatus, CANCEL_COMMAND, EXECUTE_COMMAND, QUIT_COMMAND, SHUTDOWN_COMMAND};
pub use sg_core::{SessionOutput, VariableMap};
pub use sg_runtime::{
    ConditionEvaluator, GameSession, PendingInput, RhaiConditionEvaluator, SessionOptions,
    VariableStore, DEFAULT_STEP_LIMIT,
};
pub use transport::{OutgoingMessage, QueueTransport, Recipient, Transport, TransportEvent};

pub fn load_game_from_str(source: &str) -> Result<GameDescriptor, GameError> {
    compile_game_from_text(source)
}

pub fn load_game_from_file(path: &Path) -> Result<GameDescriptor, GameError> {
    load_game_from_str(&read_document(path)?)
        .map_err(|error| error.in_context(path.display().to_string()))
}

pub fn load_server_config_from_str(source: &str) -> Result<ServerConfig, GameError> {
    compile_server_config_from_text(source)
}

pub fn load_server_config_from_file(path: &Path) -> Result<ServerConfig, GameError> {
    load_server_config_from_str(&read_document(path)?)
        .map_err(|error| error.in_context(path.display().to_string()))
}

pub fn create_session(
    descriptor: Arc<GameDescriptor>,
    players: &[PlayerId],
    options: SessionOptions,
) -> Result<GameSession, GameError> {
    GameSession::new(descriptor, players, options)
}

fn read_document(path: &Path) -> Result<String, GameError> {
    fs::read_to_string(path).map_err(|error| {
        GameError::new(
            ErrorKind::Io,
            "API_DOCUMENT_READ",
            format!("Failed to read \"{}\": {}", path.display(), error),
        )
    })
}
