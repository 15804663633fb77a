//! HTTP API for the poker bot
//!
//! The transport adapter: inbound messages and membership updates go in,
//! outgoing activities come back in the response and over SSE.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::db::Database;
use crate::runtime::RuntimeManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
}

impl AppState {
    pub fn new(db: Database, bot_id: impl Into<String>) -> Self {
        Self {
            runtime: Arc::new(RuntimeManager::new(db, bot_id)),
        }
    }
}
