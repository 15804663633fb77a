//! Effects produced by state transitions

use serde_json::Value;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a plain text reply to the conversation
    SendText { text: String },

    /// Present the story point options as suggested actions
    SendVoteOptions,

    /// Persist the new round
    PersistRound,

    /// Notify connected clients
    NotifyClient { event_type: String, data: Value },
}

impl Effect {
    pub fn send_text(text: impl Into<String>) -> Self {
        Effect::SendText { text: text.into() }
    }

    pub fn notify_round_changed(round: Value) -> Self {
        Effect::NotifyClient {
            event_type: "round_changed".to_string(),
            data: round,
        }
    }
}
