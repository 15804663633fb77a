//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::db::Database;
use crate::state_machine::VotingRound;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage for per-conversation voting rounds
#[async_trait]
pub trait RoundStore: Send + Sync {
    /// Load the conversation's round, creating an empty one on first access
    async fn load_round(&self, conv_id: &str) -> Result<VotingRound, String>;

    /// Replace the conversation's stored round
    async fn save_round(&self, conv_id: &str, round: &VotingRound) -> Result<(), String>;
}

#[async_trait]
impl<T: RoundStore + ?Sized> RoundStore for Arc<T> {
    async fn load_round(&self, conv_id: &str) -> Result<VotingRound, String> {
        (**self).load_round(conv_id).await
    }

    async fn save_round(&self, conv_id: &str, round: &VotingRound) -> Result<(), String> {
        (**self).save_round(conv_id, round).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use Database as a `RoundStore`
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoundStore for DatabaseStorage {
    async fn load_round(&self, conv_id: &str) -> Result<VotingRound, String> {
        self.db
            .get_or_create_conversation(conv_id)
            .map(|conv| conv.round)
            .map_err(|e| e.to_string())
    }

    async fn save_round(&self, conv_id: &str, round: &VotingRound) -> Result<(), String> {
        self.db
            .save_round(conv_id, round)
            .map_err(|e| e.to_string())
    }
}
