//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_participant() -> impl Strategy<Value = Participant> {
    // Small id space so voters repeat
    ("[a-d]", "[A-Z][a-z]{2,8}").prop_map(|(id, name)| Participant::new(id, name))
}

fn arb_story_id() -> impl Strategy<Value = String> {
    "[A-Z]{2,5}-[0-9]{1,4}"
}

fn arb_points() -> impl Strategy<Value = i32> {
    prop_oneof![
        proptest::sample::select(crate::prompt::STORY_POINT_SCALE.to_vec()),
        any::<i32>(),
    ]
}

fn arb_start_text() -> impl Strategy<Value = String> {
    proptest::option::of(arb_story_id()).prop_map(|id| match id {
        Some(id) => format!("vote {id}"),
        None => "vote".to_string(),
    })
}

fn arb_vote_text() -> impl Strategy<Value = String> {
    arb_points().prop_map(|p| format!("user-vote {p}"))
}

fn arb_bad_vote_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(|arg| format!("user-vote {arg}")),
        Just("user-vote".to_string()),
        "[0-9]{1,3}\\.[0-9]{1,2}".prop_map(|arg| format!("user-vote {arg}")),
    ]
}

fn arb_unknown_text() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", "[a-z0-9 ]{0,12}")
        .prop_filter("must not be a known keyword", |(kw, _)| kw != "vote")
        .prop_map(|(kw, rest)| format!("{kw} {rest}").trim().to_string())
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => arb_start_text(),
        3 => arb_vote_text(),
        1 => arb_bad_vote_text(),
        1 => Just("end-vote".to_string()),
        1 => arb_unknown_text(),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        9 => (arb_text(), arb_participant()).prop_map(|(text, sender)| Event::message(&text, sender)),
        1 => proptest::collection::vec(arb_participant(), 0..4).prop_map(|members| {
            Event::MembersAdded {
                members,
                bot_id: "a".to_string(),
            }
        }),
    ]
}

fn arb_round() -> impl Strategy<Value = VotingRound> {
    (
        proptest::option::of(arb_story_id()),
        proptest::collection::vec((arb_participant(), arb_points()), 0..6),
    )
        .prop_map(|(story_id, votes)| {
            let mut round = VotingRound::started(story_id);
            for (p, points) in votes {
                round.record(UserVote::new(p.id, p.name, points));
            }
            round
        })
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn voters_are_unique(round: &VotingRound) -> bool {
    let ids: HashSet<_> = round.votes().iter().map(|v| v.voter_id.as_str()).collect();
    ids.len() == round.votes().len()
}

fn sent_texts(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::SendText { text } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: at most one vote per voter after any event sequence
    #[test]
    fn prop_voters_stay_unique(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut round = VotingRound::default();
        for event in events {
            round = transition(&round, event).new_round;
            prop_assert!(voters_are_unique(&round), "Duplicate voter: {:?}", round);
        }
    }

    // Invariant 2: starting a vote resets votes and sets the story id
    #[test]
    fn prop_start_vote_resets(
        round in arb_round(),
        story_id in proptest::option::of(arb_story_id()),
        sender in arb_participant()
    ) {
        let text = match &story_id {
            Some(id) => format!("vote {id}"),
            None => "vote".to_string(),
        };
        let result = transition(&round, Event::message(&text, sender));
        prop_assert!(result.new_round.votes().is_empty());
        prop_assert_eq!(result.new_round.story_id(), story_id.as_deref());
        prop_assert!(result.effects.contains(&Effect::SendVoteOptions));
    }

    // Invariant 3: last vote wins for a repeated voter
    #[test]
    fn prop_last_vote_wins(
        sender in arb_participant(),
        points in proptest::collection::vec(arb_points(), 1..10)
    ) {
        let mut round = VotingRound::started(Some("S-1".to_string()));
        for p in &points {
            round = transition(&round, Event::message(&format!("user-vote {p}"), sender.clone())).new_round;
        }
        let entries: Vec<_> = round.votes().iter().filter(|v| v.voter_id == sender.id).collect();
        prop_assert_eq!(entries.len(), 1);
        prop_assert_eq!(Some(&entries[0].points), points.last());
    }

    // Invariant 4: vote count equals distinct voters since the last start
    #[test]
    fn prop_vote_count_matches_distinct_voters(
        ballots in proptest::collection::vec((arb_participant(), arb_points()), 0..20)
    ) {
        let mut round = transition(
            &VotingRound::default(),
            Event::message("vote S-1", Participant::new("f", "Facilitator")),
        ).new_round;
        let mut expected: HashMap<String, i32> = HashMap::new();

        for (sender, points) in ballots {
            expected.insert(sender.id.clone(), points);
            round = transition(&round, Event::message(&format!("user-vote {points}"), sender)).new_round;
        }

        prop_assert_eq!(round.votes().len(), expected.len());
        for vote in round.votes() {
            prop_assert_eq!(expected.get(&vote.voter_id), Some(&vote.points));
        }
    }

    // Invariant 5: end-vote never mutates and is idempotent
    #[test]
    fn prop_end_vote_is_read_only(round in arb_round(), sender in arb_participant()) {
        let first = transition(&round, Event::message("end-vote", sender.clone()));
        let second = transition(&first.new_round, Event::message("END-VOTE", sender));
        prop_assert_eq!(&first.new_round, &round);
        prop_assert_eq!(&second.new_round, &round);
        prop_assert_eq!(sent_texts(&first.effects), sent_texts(&second.effects));
        prop_assert!(!first.effects.contains(&Effect::PersistRound));
    }

    // Invariant 6: non-integer votes leave the round untouched and re-prompt
    #[test]
    fn prop_bad_vote_is_ignored(round in arb_round(), text in arb_bad_vote_text(), sender in arb_participant()) {
        let result = transition(&round, Event::message(&text, sender));
        prop_assert_eq!(&result.new_round, &round);
        prop_assert_eq!(result.effects, vec![Effect::SendVoteOptions]);
    }

    // Invariant 7: unknown commands echo and leave state unchanged
    #[test]
    fn prop_unknown_echoes(round in arb_round(), text in arb_unknown_text(), sender in arb_participant()) {
        let result = transition(&round, Event::message(&text, sender));
        prop_assert_eq!(&result.new_round, &round);
        prop_assert_eq!(sent_texts(&result.effects), vec![format!("Unknown command: {text}")]);
    }

    // Invariant 8: every round change is persisted
    #[test]
    fn prop_changes_persist(round in arb_round(), event in arb_event()) {
        let result = transition(&round, event);
        if result.new_round != round {
            prop_assert!(
                result.effects.contains(&Effect::PersistRound),
                "Round changed but no PersistRound effect: {:?} -> {:?}",
                round,
                result.new_round
            );
        }
    }

    // Invariant 9: the report lists every vote in stored order
    #[test]
    fn prop_report_lists_votes(round in arb_round(), sender in arb_participant()) {
        let result = transition(&round, Event::message("end-vote", sender));
        let texts = sent_texts(&result.effects);
        prop_assert_eq!(texts.len(), 1);
        let lines: Vec<_> = texts[0].lines().collect();
        prop_assert_eq!(lines.len(), round.votes().len() + 1);
        for (line, vote) in lines.iter().skip(1).zip(round.votes()) {
            prop_assert_eq!(*line, format!("{} voted: {}", vote.voter_name, vote.points));
        }
    }
}
