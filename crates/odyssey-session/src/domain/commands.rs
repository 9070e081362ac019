//! Commands for the Session & Game Engine context.

use odyssey_core::command::Command;
use odyssey_core::player::PlayerId;
use uuid::Uuid;

/// Command to start (or restart) a player's session.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player starting a session.
    pub player_id: PlayerId,
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "session.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn player_id(&self) -> &PlayerId {
        &self.player_id
    }
}

/// Command carrying a player's raw chat reply.
#[derive(Debug, Clone)]
pub struct SubmitInput {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player answering.
    pub player_id: PlayerId,
    /// Untrimmed text as received from the transport.
    pub raw_text: String,
}

impl Command for SubmitInput {
    fn command_type(&self) -> &'static str {
        "session.submit_input"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn player_id(&self) -> &PlayerId {
        &self.player_id
    }
}
