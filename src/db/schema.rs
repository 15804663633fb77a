//! Database schema and types

pub use crate::state_machine::VotingRound;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS conversations (
    id TEXT PRIMARY KEY,
    round TEXT NOT NULL DEFAULT '{"storyId":null,"votes":[]}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_conversations_updated ON conversations(updated_at DESC);
"#;

/// Conversation record with its current voting round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub round: VotingRound,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
