//! API request and response types

use crate::prompt::CardAction;
use crate::runtime::Activity;
use crate::state_machine::{Participant, VotingRound};
use serde::{Deserialize, Serialize};

/// A message posted by a conversation member
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
    pub from: Participant,
}

/// Members who joined the conversation
#[derive(Debug, Deserialize)]
pub struct MembersAddedRequest {
    pub members: Vec<Participant>,
}

/// Replies produced by one turn
#[derive(Debug, Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
}

/// Summary of a stored conversation
#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    pub id: String,
    pub round: VotingRound,
    pub created_at: String,
    pub updated_at: String,
}

/// Response with a list of conversations
#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummary>,
}

/// Response with a conversation's current round
#[derive(Debug, Serialize)]
pub struct RoundResponse {
    pub conversation_id: String,
    pub round: VotingRound,
    /// A story has been named or a vote cast
    pub open: bool,
}

/// The canonical point scale and its option cards
#[derive(Debug, Serialize)]
pub struct StoryPointsResponse {
    pub values: Vec<i32>,
    pub actions: Vec<CardAction>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
