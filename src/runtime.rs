//! Runtime for executing conversations
//!
//! Each conversation gets one task that owns its voting round. Turns are
//! queued on a channel, so messages for the same conversation are applied
//! one at a time while different conversations never share state.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::db::Database;
use crate::prompt::{self, CardAction};
use crate::state_machine::{Event, Participant};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, RwLock};

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = ConversationRuntime<DatabaseStorage>;

/// Errors surfaced to callers of the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Conversation runtime stopped: {0}")]
    Stopped(String),
}

/// An outgoing message for the conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
    /// Plain text
    Message { id: String, text: String },
    /// Selectable options; clicking one posts its value back as a message
    SuggestedActions { id: String, actions: Vec<CardAction> },
}

impl Activity {
    pub fn message(text: impl Into<String>) -> Self {
        Activity::Message {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
        }
    }

    pub fn vote_options() -> Self {
        Activity::SuggestedActions {
            id: uuid::Uuid::new_v4().to_string(),
            actions: prompt::vote_options(),
        }
    }

    /// Text of a plain message, if this is one
    #[allow(dead_code)] // Used in tests
    pub fn text(&self) -> Option<&str> {
        match self {
            Activity::Message { text, .. } => Some(text.as_str()),
            Activity::SuggestedActions { .. } => None,
        }
    }
}

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Init {
        conversation_id: String,
        round: serde_json::Value,
    },
    Activity {
        activity: Activity,
    },
    Notify {
        event_type: String,
        data: serde_json::Value,
    },
    Error {
        message: String,
    },
}

/// A queued event and the channel its replies go back on
#[derive(Debug)]
pub struct Turn {
    pub event: Event,
    pub reply_tx: oneshot::Sender<Result<Vec<Activity>, RuntimeError>>,
}

/// Handle to interact with a running conversation
#[derive(Clone)]
pub struct ConversationHandle {
    pub turn_tx: mpsc::Sender<Turn>,
    pub broadcast_tx: broadcast::Sender<SseEvent>,
}

/// Manager for all conversation runtimes
pub struct RuntimeManager {
    db: Database,
    /// The bot's own member id, skipped when greeting new members
    bot_id: String,
    runtimes: RwLock<HashMap<String, ConversationHandle>>,
}

impl RuntimeManager {
    pub fn new(db: Database, bot_id: impl Into<String>) -> Self {
        Self {
            db,
            bot_id: bot_id.into(),
            runtimes: RwLock::new(HashMap::new()),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get the handle for a conversation, starting its runtime on first access
    pub async fn get_or_create(&self, conv_id: &str) -> Result<ConversationHandle, RuntimeError> {
        if let Some(handle) = self.runtimes.read().await.get(conv_id) {
            return Ok(handle.clone());
        }

        let mut runtimes = self.runtimes.write().await;
        // Another request may have won the race for the write lock
        if let Some(handle) = runtimes.get(conv_id) {
            return Ok(handle.clone());
        }

        let storage = DatabaseStorage::new(self.db.clone());
        let round = storage
            .load_round(conv_id)
            .await
            .map_err(RuntimeError::Storage)?;

        let (turn_tx, turn_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);

        let runtime: ProductionRuntime = ConversationRuntime::new(
            conv_id,
            round,
            storage,
            turn_rx,
            broadcast_tx.clone(),
        );
        tokio::spawn(runtime.run());

        let handle = ConversationHandle {
            turn_tx,
            broadcast_tx,
        };
        runtimes.insert(conv_id.to_string(), handle.clone());
        tracing::info!(conv_id = %conv_id, "Started conversation runtime");

        Ok(handle)
    }

    /// Queue an event and wait for the replies it produces
    pub async fn send_event(
        &self,
        conv_id: &str,
        event: Event,
    ) -> Result<Vec<Activity>, RuntimeError> {
        let handle = self.get_or_create(conv_id).await?;
        let (reply_tx, reply_rx) = oneshot::channel();

        if handle.turn_tx.send(Turn { event, reply_tx }).await.is_err() {
            self.runtimes.write().await.remove(conv_id);
            return Err(RuntimeError::Stopped(conv_id.to_string()));
        }

        reply_rx
            .await
            .map_err(|_| RuntimeError::Stopped(conv_id.to_string()))?
    }

    /// Handle a text message from a participant
    pub async fn handle_message(
        &self,
        conv_id: &str,
        text: &str,
        sender: Participant,
    ) -> Result<Vec<Activity>, RuntimeError> {
        self.send_event(conv_id, Event::message(text, sender)).await
    }

    /// Handle members joining the conversation
    pub async fn handle_members_added(
        &self,
        conv_id: &str,
        members: Vec<Participant>,
    ) -> Result<Vec<Activity>, RuntimeError> {
        let event = Event::MembersAdded {
            members,
            bot_id: self.bot_id.clone(),
        };
        self.send_event(conv_id, event).await
    }

    /// Subscribe to a conversation's live events
    pub async fn subscribe(
        &self,
        conv_id: &str,
    ) -> Result<broadcast::Receiver<SseEvent>, RuntimeError> {
        Ok(self.get_or_create(conv_id).await?.broadcast_tx.subscribe())
    }
}
