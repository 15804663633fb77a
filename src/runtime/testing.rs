//! Mock implementations for testing
//!
//! These mocks enable runtime testing without a database.

use super::traits::RoundStore;
use crate::state_machine::VotingRound;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory round store that records every save
#[derive(Default)]
pub struct MockRoundStore {
    rounds: Mutex<HashMap<String, VotingRound>>,
    /// Record of all saves, in order
    pub saves: Mutex<Vec<(String, VotingRound)>>,
    fail_saves: AtomicBool,
}

#[allow(dead_code)]
impl MockRoundStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored round
    pub fn with_round(self, conv_id: impl Into<String>, round: VotingRound) -> Self {
        self.rounds.lock().unwrap().insert(conv_id.into(), round);
        self
    }

    /// Make subsequent saves fail
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Get recorded saves
    pub fn recorded_saves(&self) -> Vec<(String, VotingRound)> {
        self.saves.lock().unwrap().clone()
    }

    pub fn stored(&self, conv_id: &str) -> Option<VotingRound> {
        self.rounds.lock().unwrap().get(conv_id).cloned()
    }
}

#[async_trait]
impl RoundStore for MockRoundStore {
    async fn load_round(&self, conv_id: &str) -> Result<VotingRound, String> {
        Ok(self
            .rounds
            .lock()
            .unwrap()
            .entry(conv_id.to_string())
            .or_default()
            .clone())
    }

    async fn save_round(&self, conv_id: &str, round: &VotingRound) -> Result<(), String> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err("disk full".to_string());
        }
        self.rounds
            .lock()
            .unwrap()
            .insert(conv_id.to_string(), round.clone());
        self.saves
            .lock()
            .unwrap()
            .push((conv_id.to_string(), round.clone()));
        Ok(())
    }
}
