//! Conversation runtime executor

use super::traits::RoundStore;
use super::{Activity, RuntimeError, SseEvent, Turn};
use crate::state_machine::{transition, Effect, Event, VotingRound};
use tokio::sync::{broadcast, mpsc};

/// Runtime for one conversation, generic over where rounds are stored
pub struct ConversationRuntime<S>
where
    S: RoundStore + 'static,
{
    conversation_id: String,
    round: VotingRound,
    storage: S,
    turn_rx: mpsc::Receiver<Turn>,
    broadcast_tx: broadcast::Sender<SseEvent>,
}

impl<S> ConversationRuntime<S>
where
    S: RoundStore + 'static,
{
    pub fn new(
        conversation_id: impl Into<String>,
        round: VotingRound,
        storage: S,
        turn_rx: mpsc::Receiver<Turn>,
        broadcast_tx: broadcast::Sender<SseEvent>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            round,
            storage,
            turn_rx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(conv_id = %self.conversation_id, "Starting conversation runtime");

        // One turn at a time: the round is never touched concurrently
        while let Some(Turn { event, reply_tx }) = self.turn_rx.recv().await {
            let result = self.process_event(event).await;
            if let Err(e) = &result {
                tracing::error!(conv_id = %self.conversation_id, error = %e, "Error handling event");
            }
            // The caller may have given up waiting
            let _ = reply_tx.send(result);
        }

        tracing::info!(conv_id = %self.conversation_id, "Conversation runtime stopped");
    }

    async fn process_event(&mut self, event: Event) -> Result<Vec<Activity>, RuntimeError> {
        if let Event::Command { command, sender } = &event {
            tracing::debug!(
                conv_id = %self.conversation_id,
                keyword = %command.kind.keyword(),
                sender = %sender.id,
                "Applying command"
            );
        }

        // Pure state transition
        let result = transition(&self.round, event);
        self.round = result.new_round;

        let mut activities = Vec::new();
        let mut failure = None;

        // Execute every effect even if one fails, so replies still reach subscribers
        for effect in result.effects {
            match self.execute_effect(effect).await {
                Ok(Some(activity)) => activities.push(activity),
                Ok(None) => {}
                Err(e) => {
                    let _ = self.broadcast_tx.send(SseEvent::Error {
                        message: e.to_string(),
                    });
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(activities),
        }
    }

    async fn execute_effect(&self, effect: Effect) -> Result<Option<Activity>, RuntimeError> {
        match effect {
            Effect::SendText { text } => Ok(Some(self.emit(Activity::message(text)))),

            Effect::SendVoteOptions => Ok(Some(self.emit(Activity::vote_options()))),

            Effect::PersistRound => {
                self.storage
                    .save_round(&self.conversation_id, &self.round)
                    .await
                    .map_err(RuntimeError::Storage)?;
                tracing::debug!(
                    conv_id = %self.conversation_id,
                    votes = self.round.votes().len(),
                    "Persisted round"
                );
                Ok(None)
            }

            Effect::NotifyClient { event_type, data } => {
                let _ = self.broadcast_tx.send(SseEvent::Notify { event_type, data });
                Ok(None)
            }
        }
    }

    /// Broadcast an outgoing activity to live subscribers and hand it back
    fn emit(&self, activity: Activity) -> Activity {
        let _ = self.broadcast_tx.send(SseEvent::Activity {
            activity: activity.clone(),
        });
        activity
    }
}
