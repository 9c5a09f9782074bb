use sg_core::{GameError, PlayerId, SessionOutput};
use sg_runtime::GameSession;

#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    Input { player: PlayerId, prompt: String },
    End,
    Failed(GameError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgress {
    pub broadcasts: Vec<String>,
    pub boundary: Boundary,
}

/// Runs the session until it needs a player's reply, ends or fails,
/// keeping every broadcast produced on the way.
pub fn drive_session(session: &mut GameSession) -> SessionProgress {
    let mut broadcasts = Vec::new();

    loop {
        let boundary = match session.next_output() {
            Ok(SessionOutput::Broadcast { text }) => {
                broadcasts.push(text);
                continue;
            }
            Ok(SessionOutput::InputRequest { player, prompt }) => {
                Boundary::Input { player, prompt }
            }
            Ok(SessionOutput::End) => Boundary::End,
            Err(error) => Boundary::Failed(error),
        };
        return SessionProgress {
            broadcasts,
            boundary,
        };
    }
}
