//! Voting round state types

use serde::{Deserialize, Serialize};

// ============================================================================
// Participants and votes
// ============================================================================

/// A conversation member as identified by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

impl Participant {
    #[allow(dead_code)] // Used in tests
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One participant's current estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVote {
    pub voter_id: String,
    /// Display name at the time of the latest vote
    pub voter_name: String,
    pub points: i32,
}

impl UserVote {
    pub fn new(voter_id: impl Into<String>, voter_name: impl Into<String>, points: i32) -> Self {
        Self {
            voter_id: voter_id.into(),
            voter_name: voter_name.into(),
            points,
        }
    }
}

// ============================================================================
// Voting Round
// ============================================================================

/// The round owned by one conversation.
///
/// `votes` holds at most one entry per voter id. A repeated vote replaces the
/// earlier entry in place, so the report keeps first-submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingRound {
    #[serde(default)]
    story_id: Option<String>,
    #[serde(default)]
    votes: Vec<UserVote>,
}

impl VotingRound {
    /// A fresh round with no votes. Empty story ids are treated as absent.
    pub fn started(story_id: Option<String>) -> Self {
        Self {
            story_id: story_id.filter(|id| !id.is_empty()),
            votes: Vec::new(),
        }
    }

    pub fn story_id(&self) -> Option<&str> {
        self.story_id.as_deref()
    }

    pub fn votes(&self) -> &[UserVote] {
        &self.votes
    }

    /// Insert or replace the voter's entry (last vote wins)
    pub fn record(&mut self, vote: UserVote) {
        match self.votes.iter_mut().find(|v| v.voter_id == vote.voter_id) {
            Some(existing) => {
                existing.voter_name = vote.voter_name;
                existing.points = vote.points;
            }
            None => self.votes.push(vote),
        }
    }

    /// Whether a story has been named or any vote cast
    pub fn is_open(&self) -> bool {
        self.story_id.is_some() || !self.votes.is_empty()
    }

    /// Rebuild a round from persisted JSON, collapsing duplicate voters
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: VotingRound = serde_json::from_str(json)?;
        let mut round = VotingRound::started(raw.story_id);
        for vote in raw.votes {
            round.record(vote);
        }
        Ok(round)
    }
}
