//! Environment-driven configuration

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3978;
const DEFAULT_BOT_ID: &str = "story-point-poker";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `SQLite` database file holding one round per conversation
    pub db_path: PathBuf,
    pub port: u16,
    /// The bot's own member id, never greeted on join
    pub bot_id: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup("POKER_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".story-point-poker").join("poker.db")
            },
            PathBuf::from,
        );

        let port = lookup("POKER_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let bot_id = lookup("POKER_BOT_ID")
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| DEFAULT_BOT_ID.to_string());

        Self {
            db_path,
            port,
            bot_id,
        }
    }
}
