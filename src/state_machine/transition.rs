//! Pure state transition function
//!
//! Every command is accepted in every phase: there is no separate
//! open/closed flag, and `end-vote` only reads the round.

use super::state::{Participant, UserVote, VotingRound};
use super::{Effect, Event};
use crate::command::{Command, CommandKind};
use crate::prompt;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_round: VotingRound,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(round: VotingRound) -> Self {
        Self {
            new_round: round,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Pure transition function
///
/// Given the same round and event it always produces the same result and
/// performs no I/O. No input is rejected.
pub fn transition(round: &VotingRound, event: Event) -> TransitionResult {
    match event {
        Event::Command { command, sender } => apply_command(round, command, &sender),

        Event::MembersAdded { members, bot_id } => TransitionResult::new(round.clone())
            .with_effects(
                members
                    .iter()
                    .filter(|member| member.id != bot_id)
                    .map(|member| Effect::send_text(prompt::welcome(&member.name))),
            ),
    }
}

fn apply_command(round: &VotingRound, command: Command, sender: &Participant) -> TransitionResult {
    match command.kind {
        // ============================================================
        // Start Vote: reset votes, set story id, prompt for options
        // ============================================================
        CommandKind::StartVote => {
            let story_id = command.args.into_iter().next();
            let new_round = VotingRound::started(story_id);
            let text = prompt::vote_started(new_round.story_id());
            let snapshot = round_to_json(&new_round);

            TransitionResult::new(new_round)
                .with_effect(Effect::send_text(text))
                .with_effect(Effect::SendVoteOptions)
                .with_effect(Effect::PersistRound)
                .with_effect(Effect::notify_round_changed(snapshot))
        }

        // ============================================================
        // Record Vote: upsert on a valid integer, re-prompt otherwise
        // ============================================================
        CommandKind::UserVote => match parse_points(command.first_arg()) {
            Some(points) => {
                let mut new_round = round.clone();
                new_round.record(UserVote::new(&sender.id, &sender.name, points));
                let snapshot = round_to_json(&new_round);

                TransitionResult::new(new_round)
                    .with_effect(Effect::send_text(prompt::vote_recorded(&sender.name)))
                    .with_effect(Effect::PersistRound)
                    .with_effect(Effect::notify_round_changed(snapshot))
            }
            None => TransitionResult::new(round.clone()).with_effect(Effect::SendVoteOptions),
        },

        // ============================================================
        // End Vote: report only
        // ============================================================
        CommandKind::EndVote => TransitionResult::new(round.clone())
            .with_effect(Effect::send_text(prompt::voting_results(round))),

        CommandKind::Unknown(_) => TransitionResult::new(round.clone())
            .with_effect(Effect::send_text(prompt::unknown_command(&command.normalized))),
    }
}

/// Base-10 integer with optional sign. Off-scale values are accepted.
fn parse_points(arg: Option<&str>) -> Option<i32> {
    arg?.parse().ok()
}

fn round_to_json(round: &VotingRound) -> serde_json::Value {
    serde_json::to_value(round).unwrap_or(serde_json::Value::Null)
}
