use std::sync::Arc;

use sg_core::{GameDescriptor, GameError, PlayerId};
use sg_runtime::{GameSession, SessionOptions};
use tracing::{info, warn};

use crate::driver::{drive_session, Boundary};
use crate::transport::{OutgoingMessage, Transport, TransportEvent};

pub const EXECUTE_COMMAND: &str = "/execute";
pub const CANCEL_COMMAND: &str = "/cancel";
pub const SHUTDOWN_COMMAND: &str = "shutdown";
pub const QUIT_COMMAND: &str = "quit";
const COMMAND_PREFIX: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyStatus {
    Running,
    Shutdown,
}

/// Drives one game for the players connected through a transport. Each
/// `/execute` starts a fresh session over the players connected at that
/// moment.
pub struct Lobby {
    descriptor: Arc<GameDescriptor>,
    options: SessionOptions,
    players: Vec<PlayerId>,
    session: Option<GameSession>,
}

impl Lobby {
    pub fn new(descriptor: Arc<GameDescriptor>, options: SessionOptions) -> Self {
        Self {
            descriptor,
            options,
            players: Vec::new(),
            session: None,
        }
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// The session of the current or most recent execution.
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn is_executing(&self) -> bool {
        self.session.as_ref().is_some_and(GameSession::is_running)
    }

    /// One outer-loop iteration: drain the transport, handle every event and
    /// flush the replies.
    pub fn poll<T: Transport>(&mut self, transport: &mut T) -> Result<LobbyStatus, GameError> {
        let mut outgoing = Vec::new();
        let mut status = LobbyStatus::Running;
        for event in transport.receive()? {
            if self.handle_event(event, &mut outgoing) == LobbyStatus::Shutdown {
                status = LobbyStatus::Shutdown;
                break;
            }
        }
        if !outgoing.is_empty() {
            transport.send(outgoing)?;
        }
        Ok(status)
    }

    pub fn run<T: Transport>(&mut self, transport: &mut T) -> Result<LobbyStatus, GameError> {
        while transport.is_open() {
            if self.poll(transport)? == LobbyStatus::Shutdown {
                info!("lobby shut down");
                return Ok(LobbyStatus::Shutdown);
            }
        }
        Ok(LobbyStatus::Running)
    }

    pub fn handle_event(
        &mut self,
        event: TransportEvent,
        outgoing: &mut Vec<OutgoingMessage>,
    ) -> LobbyStatus {
        match event {
            TransportEvent::Connected { player } => {
                self.connect(player, outgoing);
                LobbyStatus::Running
            }
            TransportEvent::Disconnected { player } => {
                self.disconnect(player, outgoing);
                LobbyStatus::Running
            }
            TransportEvent::Message { player, text } => self.message(player, &text, outgoing),
        }
    }

    fn connect(&mut self, player: PlayerId, outgoing: &mut Vec<OutgoingMessage>) {
        if self.players.contains(&player) {
            return;
        }
        self.players.push(player);
        info!(player, "player connected");
        if let Some(session) = self.session.as_mut().filter(|session| session.is_running()) {
            if let Err(error) = session.add_player(player) {
                warn!(player, code = %error.code, "could not add player to running session");
                outgoing.push(OutgoingMessage::to_player(player, failure_text(&error)));
            }
        }
    }

    fn disconnect(&mut self, player: PlayerId, outgoing: &mut Vec<OutgoingMessage>) {
        let Some(position) = self.players.iter().position(|known| *known == player) else {
            return;
        };
        self.players.remove(position);
        info!(player, "player disconnected");

        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.remove_player(player) {
            Ok(true) => outgoing.push(OutgoingMessage::broadcast(format!(
                "execution cancelled: player {} left",
                player
            ))),
            Ok(false) => {}
            Err(error) => {
                warn!(player, code = %error.code, "could not remove player from session");
            }
        }
    }

    fn message(
        &mut self,
        player: PlayerId,
        text: &str,
        outgoing: &mut Vec<OutgoingMessage>,
    ) -> LobbyStatus {
        match text.trim() {
            SHUTDOWN_COMMAND => {
                if self.session.as_mut().is_some_and(GameSession::cancel) {
                    info!("execution cancelled by shutdown");
                }
                return LobbyStatus::Shutdown;
            }
            QUIT_COMMAND => self.disconnect(player, outgoing),
            EXECUTE_COMMAND => self.execute(player, outgoing),
            CANCEL_COMMAND => {
                if self.session.as_mut().is_some_and(GameSession::cancel) {
                    outgoing.push(OutgoingMessage::broadcast("execution cancelled"));
                }
            }
            command if command.starts_with(COMMAND_PREFIX) => {
                outgoing.push(OutgoingMessage::to_player(
                    player,
                    format!("{}: command not found", command),
                ));
            }
            _ if self.awaits_input_from(player) => self.reply(player, text, outgoing),
            _ => outgoing.push(OutgoingMessage::broadcast(format!(
                "player {}> {}",
                player, text
            ))),
        }
        LobbyStatus::Running
    }

    fn execute(&mut self, player: PlayerId, outgoing: &mut Vec<OutgoingMessage>) {
        if self.is_executing() {
            outgoing.push(OutgoingMessage::to_player(
                player,
                "execution already in progress",
            ));
            return;
        }

        let started = GameSession::new(
            Arc::clone(&self.descriptor),
            &self.players,
            self.options.clone(),
        )
        .and_then(|mut session| session.start().map(|_| session));
        match started {
            Ok(session) => {
                info!(requested_by = player, players = self.players.len(), "execution requested");
                self.session = Some(session);
                self.advance(outgoing);
            }
            Err(error) => outgoing.push(OutgoingMessage::broadcast(failure_text(&error))),
        }
    }

    fn awaits_input_from(&self, player: PlayerId) -> bool {
        self.session
            .as_ref()
            .and_then(GameSession::pending_input)
            .is_some_and(|pending| pending.player == player)
    }

    fn reply(&mut self, player: PlayerId, text: &str, outgoing: &mut Vec<OutgoingMessage>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.submit_input(player, text) {
            Ok(()) => self.advance(outgoing),
            Err(error) if session.pending_input().is_some() => {
                outgoing.push(OutgoingMessage::to_player(
                    player,
                    format!("invalid input: {}", error.message),
                ));
            }
            Err(error) => outgoing.push(OutgoingMessage::broadcast(failure_text(&error))),
        }
    }

    fn advance(&mut self, outgoing: &mut Vec<OutgoingMessage>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let progress = drive_session(session);
        outgoing.extend(
            progress
                .broadcasts
                .into_iter()
                .map(OutgoingMessage::broadcast),
        );
        match progress.boundary {
            Boundary::Input { player, prompt } => {
                outgoing.push(OutgoingMessage::to_player(player, prompt));
            }
            Boundary::End => {}
            Boundary::Failed(error) => {
                outgoing.push(OutgoingMessage::broadcast(failure_text(&error)));
            }
        }
    }
}

fn failure_text(error: &GameError) -> String {
    format!(
        "execution failed during {}: {}: {}",
        error.kind.stage(),
        error.code,
        error.message
    )
}
