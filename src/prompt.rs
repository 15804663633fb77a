//! Response text and the story point option prompt

use crate::state_machine::state::VotingRound;
use serde::{Deserialize, Serialize};

/// Canonical story point scale offered to voters, in display order
pub const STORY_POINT_SCALE: [i32; 6] = [1, 2, 3, 5, 8, 13];

const WELCOME_SUFFIX: &str = "Please vote when prompted.";

/// How the client should deliver a card's value when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    /// Post the value back as if the user had typed it
    MessageBack,
}

/// A selectable option rendered by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub title: String,
    pub value: String,
}

impl CardAction {
    pub fn vote(points: i32) -> Self {
        Self {
            action_type: ActionType::MessageBack,
            title: points.to_string(),
            value: format!("user-vote {points}"),
        }
    }
}

/// One card per value of [`STORY_POINT_SCALE`]
pub fn vote_options() -> Vec<CardAction> {
    STORY_POINT_SCALE.iter().copied().map(CardAction::vote).collect()
}

pub fn welcome(name: &str) -> String {
    format!("Welcome to the Story Point Poker bot {name}. {WELCOME_SUFFIX}")
}

pub fn vote_started(story_id: Option<&str>) -> String {
    match story_id {
        Some(id) => format!("Starting vote for: {id}"),
        None => "Starting vote:".to_string(),
    }
}

pub fn vote_recorded(voter_name: &str) -> String {
    format!("Vote recorded: {voter_name}")
}

pub fn unknown_command(normalized: &str) -> String {
    format!("Unknown command: {normalized}")
}

/// Multi-line results report, votes in submission order
pub fn voting_results(round: &VotingRound) -> String {
    let header = match round.story_id() {
        Some(id) => format!("Voting results for {id}:"),
        None => "Voting results:".to_string(),
    };

    std::iter::once(header)
        .chain(
            round
                .votes()
                .iter()
                .map(|vote| format!("{} voted: {}", vote.voter_name, vote.points)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}
