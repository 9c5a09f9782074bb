use sg_core::parse_variable_value;

use super::*;

impl GameSession {
    /// Answers the pending Request-Input. Replies from other players and
    /// non-integer text are rejected and leave the request pending.
    pub fn submit_input(&mut self, player: PlayerId, text: &str) -> Result<(), GameError> {
        let Some(pending) = self.pending_input.clone() else {
            return Err(GameError::new(
                ErrorKind::Session,
                "SESSION_NO_PENDING_INPUT",
                "No pending input is available.",
            ));
        };

        if player != pending.player {
            return Err(GameError::new(
                ErrorKind::Session,
                "SESSION_INPUT_WRONG_PLAYER",
                format!(
                    "Input is awaited from player {}, not player {}.",
                    pending.player, player
                ),
            ));
        }

        let Some(value) = parse_variable_value(text) else {
            return Err(GameError::new(
                ErrorKind::Session,
                "SESSION_INPUT_NOT_INTEGER",
                format!("Reply \"{}\" is not an integer.", text.trim()),
            ));
        };

        let Some(frame_index) = self.find_frame_index(pending.frame_id) else {
            let error = GameError::new(
                ErrorKind::RuleExecution,
                "ENGINE_INPUT_FRAME_MISSING",
                "Pending input frame is missing.",
            );
            return Err(self.fail(error, &pending.location));
        };

        if let Err(error) = self.store.set(&pending.result, value) {
            return Err(self.fail(error, &pending.location));
        }

        self.frames[frame_index].node_index += 1;
        self.pending_input = None;
        debug!(player, value, result = %pending.result, "input stored");
        Ok(())
    }
}
