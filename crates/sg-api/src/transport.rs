use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use sg_core::{GameError, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TransportEvent {
    Connected { player: PlayerId },
    Disconnected { player: PlayerId },
    Message { player: PlayerId, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "to", content = "player", rename_all = "camelCase")]
pub enum Recipient {
    Player(PlayerId),
    Broadcast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub recipient: Recipient,
    pub text: String,
}

impl OutgoingMessage {
    pub fn to_player(player: PlayerId, text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::Player(player),
            text: text.into(),
        }
    }

    pub fn broadcast(text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::Broadcast,
            text: text.into(),
        }
    }
}

/// Connection layer the lobby polls once per outer-loop iteration.
pub trait Transport {
    fn receive(&mut self) -> Result<Vec<TransportEvent>, GameError>;
    fn send(&mut self, messages: Vec<OutgoingMessage>) -> Result<(), GameError>;

    fn is_open(&self) -> bool {
        true
    }
}

/// In-memory transport: events are queued by the caller and sent messages
/// are recorded.
#[derive(Debug, Default)]
pub struct QueueTransport {
    incoming: VecDeque<TransportEvent>,
    sent: Vec<OutgoingMessage>,
}

impl QueueTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: impl IntoIterator<Item = TransportEvent>) -> Self {
        Self {
            incoming: events.into_iter().collect(),
            sent: Vec::new(),
        }
    }

    pub fn push(&mut self, event: TransportEvent) {
        self.incoming.push_back(event);
    }

    pub fn sent(&self) -> &[OutgoingMessage] {
        &self.sent
    }

    pub fn take_sent(&mut self) -> Vec<OutgoingMessage> {
        std::mem::take(&mut self.sent)
    }
}

impl Transport for QueueTransport {
    /// Delivers one queued event per call, like a single network poll.
    fn receive(&mut self) -> Result<Vec<TransportEvent>, GameError> {
        Ok(self.incoming.pop_front().into_iter().collect())
    }

    fn send(&mut self, messages: Vec<OutgoingMessage>) -> Result<(), GameError> {
        self.sent.extend(messages);
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.incoming.is_empty()
    }
}
