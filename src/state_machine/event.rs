//! Events that can occur in a conversation

use crate::command::Command;
use crate::state_machine::state::Participant;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// A parsed message from a participant
    Command {
        command: Command,
        sender: Participant,
    },

    /// Members joined the conversation
    MembersAdded {
        members: Vec<Participant>,
        /// The bot's own member id, which is never greeted
        bot_id: String,
    },
}

impl Event {
    /// Parse raw message text into a command event
    pub fn message(text: &str, sender: Participant) -> Self {
        Event::Command {
            command: crate::command::parse(text),
            sender,
        }
    }
}
