#![allow(missing_docs)]

use serde_json::Value;

use distractor_builder::{DistractorPair, DraftSession, target_payload};
use distractor_core::Dataset;

const CSV: &str = "\
Domain,Scenario,System_Instruction,Conversation
travel,Booking help,Only discuss bookings.,\"[{\"\"role\"\":\"\"user\"\",\"\"content\"\":\"\"hi\"\"},{\"\"role\"\":\"\"assistant\"\",\"\"content\"\":\"\"  Where to?  \"\"}]\"
insurance,Claims,Only discuss claims.,plain text
";

fn dataset() -> Dataset {
    Dataset::from_reader(CSV.as_bytes()).unwrap()
}

fn pair(bot: &str, distractor: &str, target: &str) -> DistractorPair {
    DistractorPair {
        bot_turn: bot.to_string(),
        distractor: distractor.to_string(),
        target_instruction: target.to_string(),
    }
}

#[test]
fn test_load_row_resets_and_seeds_global_target() {
    let dataset = dataset();
    let mut session = DraftSession::new();
    session.load_row(dataset.row(0).unwrap());
    session.draft.bot_turn = "b".to_string();
    session.draft.distractor = "d".to_string();
    assert!(session.add_pair());

    session.load_row(dataset.row(1).unwrap());
    assert_eq!(session.current_index(), Some(1));
    assert!(session.pairs().is_empty());
    assert_eq!(session.global_target, "Only discuss claims.");
    assert!(session.last_saved().is_none());
}

#[test]
fn test_prefill_uses_last_assistant_turn() {
    let dataset = dataset();
    let row = dataset.row(0).unwrap();
    let mut session = DraftSession::new();
    session.load_row(row);
    session.prefill_bot_turn(&row.conversation());
    assert_eq!(session.draft.bot_turn, "Where to?");

    let plain = dataset.row(1).unwrap();
    session.prefill_bot_turn(&plain.conversation());
    assert_eq!(session.draft.bot_turn, "");
}

#[test]
fn test_add_pair_requires_both_texts_and_trims() {
    let mut session = DraftSession::new();
    session.draft.bot_turn = "   ".to_string();
    session.draft.distractor = "What about lunch?".to_string();
    assert!(!session.add_pair());
    assert_eq!(session.draft.distractor, "What about lunch?");

    session.draft.bot_turn = "  Where to? ".to_string();
    session.draft.target_instruction = "  ".to_string();
    assert!(session.add_pair());
    assert_eq!(session.pairs(), &[pair("Where to?", "What about lunch?", "")]);
    assert!(session.draft.bot_turn.is_empty());
    assert!(session.draft.distractor.is_empty());
}

#[test]
fn test_remove_and_clear_pairs() {
    let mut session = DraftSession::new();
    for text in ["one", "two", "three"] {
        session.draft.bot_turn = text.to_string();
        session.draft.distractor = text.to_string();
        assert!(session.add_pair());
    }
    assert_eq!(session.remove_pair(1).map(|p| p.bot_turn), Some("two".to_string()));
    assert!(session.remove_pair(5).is_none());
    assert_eq!(session.pairs().len(), 2);
    assert!(session.can_save());

    session.clear_pairs();
    assert!(!session.can_save());
}

#[test]
fn test_target_payload_uses_global_without_per_pair_targets() {
    let pairs = [pair("b", "d", ""), pair("b2", "d2", "  ")];
    assert_eq!(target_payload(&pairs, "  Global rule.  "), "Global rule.");
}

#[test]
fn test_target_payload_lists_per_pair_targets_aligned_with_pairs() {
    let pairs = [pair("b", "d", ""), pair("b2", "d2", " Stay on topic ")];
    let payload = target_payload(&pairs, "ignored");
    assert_eq!(payload, r#"["", "Stay on topic"]"#);
    let parsed: Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(parsed, serde_json::json!(["", "Stay on topic"]));
}
