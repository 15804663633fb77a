//! Database module for the poker bot
//!
//! Persists one voting round per conversation.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

const CONVERSATION_COLUMNS: &str = "id, round, created_at, updated_at";

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Conversation Operations ====================

    /// Get a conversation, creating it with an empty round on first access
    pub fn get_or_create_conversation(&self, id: &str) -> DbResult<Conversation> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let empty = serde_json::to_string(&VotingRound::default())?;

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO conversations (id, round, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![id, empty, now],
        )?;
        if inserted > 0 {
            tracing::debug!(conv_id = %id, "Created conversation");
        }

        Self::query_conversation(&conn, id)?
            .ok_or_else(|| DbError::ConversationNotFound(id.to_string()))
    }

    /// Get conversation by ID
    pub fn get_conversation(&self, id: &str) -> DbResult<Conversation> {
        let conn = self.conn.lock().unwrap();
        Self::query_conversation(&conn, id)?
            .ok_or_else(|| DbError::ConversationNotFound(id.to_string()))
    }

    /// List conversations, most recently updated first
    pub fn list_conversations(&self) -> DbResult<Vec<Conversation>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations ORDER BY updated_at DESC"
        ))?;

        let rows = stmt.query_map([], parse_conversation_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Replace the stored round for a conversation
    pub fn save_round(&self, id: &str, round: &VotingRound) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        let round_json = serde_json::to_string(round)?;

        let updated = conn.execute(
            "UPDATE conversations SET round = ?1, updated_at = ?2 WHERE id = ?3",
            params![round_json, now.to_rfc3339(), id],
        )?;

        if updated == 0 {
            return Err(DbError::ConversationNotFound(id.to_string()));
        }
        Ok(())
    }

    fn query_conversation(conn: &Connection, id: &str) -> DbResult<Option<Conversation>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = ?1"
        ))?;
        stmt.query_row(params![id], parse_conversation_row)
            .optional()
            .map_err(DbError::from)
    }
}

fn parse_conversation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    let id: String = row.get(0)?;
    let round_json: String = row.get(1)?;
    let round = VotingRound::from_json(&round_json).unwrap_or_else(|e| {
        tracing::warn!(conv_id = %id, error = %e, "Unreadable round, starting empty");
        VotingRound::default()
    });

    Ok(Conversation {
        id,
        round,
        created_at: parse_datetime(&row.get::<_, String>(2)?),
        updated_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
