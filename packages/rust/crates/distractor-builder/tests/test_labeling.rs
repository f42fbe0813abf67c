#![allow(missing_docs)]

use serde_json::json;
use tempfile::TempDir;

use distractor_builder::{
    Judgement, LabelLog, LabelLogError, NOT_APPLICABLE, find_assistant_response,
    label_log_file_name, source_distractors, unique_domains,
};

#[test]
fn test_log_file_name_embeds_domain() {
    assert_eq!(
        label_log_file_name("travel"),
        "annotations_travel_distractor_pairs.json"
    );
}

#[test]
fn test_plain_judgement_defaults_detail_fields() {
    let entry = Judgement::plain("on-topic").into_entry(3, 1, "Tell me a joke");
    assert_eq!(entry.entry_idx, 3);
    assert_eq!(entry.pair_idx, 1);
    assert_eq!(entry.role, "user");
    assert_eq!(entry.content, "Tell me a joke");
    assert_eq!(entry.distractor_type, NOT_APPLICABLE);
    assert_eq!(entry.difficulty, NOT_APPLICABLE);
    assert_eq!(entry.fooled_llm, "no");
    assert_eq!(entry.notes, "");
}

#[test]
fn test_only_distractor_label_wants_details() {
    assert!(Judgement::wants_details("Distractor"));
    assert!(!Judgement::wants_details("on-topic"));
    assert!(!Judgement::wants_details("distractors"));
}

#[test]
fn test_log_persists_and_resumes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(label_log_file_name("travel"));

    let mut log = LabelLog::open(&path).unwrap();
    assert!(log.is_empty());
    log.record(Judgement::plain("on-topic").into_entry(0, 0, "a")).unwrap();
    log.record(Judgement::plain("on-topic").into_entry(0, 1, "b")).unwrap();

    let reopened = LabelLog::open(&path).unwrap();
    assert_eq!(reopened.len(), 2);
    assert!(reopened.contains(0, 1));
    assert!(!reopened.contains(1, 0));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0]["type"], "NA");
    assert_eq!(raw[1]["content"], "b");
}

#[test]
fn test_corrupt_log_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(
        LabelLog::open(&path),
        Err(LabelLogError::Parse { .. })
    ));
}

#[test]
fn test_source_distractors_accepts_native_and_encoded_lists() {
    let native = json!({
        "distractors": [{"bot turn": " Hi ", "distractor": " Weather? "}]
    });
    let items = source_distractors(&native);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].bot_turn, "Hi");
    assert_eq!(items[0].distractor, "Weather?");

    let encoded = json!({
        "distractors": "[{\"bot turn\": \"Hi\", \"distractor\": \"Stocks?\"}]"
    });
    assert_eq!(source_distractors(&encoded)[0].distractor, "Stocks?");
    assert!(source_distractors(&json!({})).is_empty());
}

#[test]
fn test_assistant_response_follows_matching_user_turn() {
    let blocks = json!([
        [
            {"role": "user", "content": "Other"},
            {"role": "assistant", "content": "No"}
        ],
        [
            {"role": "assistant", "content": "Hello"},
            {"role": "user", "content": " Weather? "},
            {"role": "assistant", "content": " Sorry, I only help with bookings. "}
        ]
    ]);
    assert_eq!(
        find_assistant_response(&blocks, "Weather?").as_deref(),
        Some("Sorry, I only help with bookings.")
    );
    assert_eq!(find_assistant_response(&blocks, "Missing"), None);
}

#[test]
fn test_assistant_response_needs_immediate_reply() {
    let blocks = json!([[
        {"role": "user", "content": "Weather?"},
        {"role": "user", "content": "Anyone?"}
    ]]);
    assert_eq!(find_assistant_response(&blocks, "Weather?"), None);
}

#[test]
fn test_unique_domains_keep_first_appearance_order() {
    let records = vec![
        json!({"domain": "travel"}),
        json!({"domain": "insurance"}),
        json!({"domain": "travel"}),
    ];
    assert_eq!(unique_domains(&records), vec!["travel", "insurance"]);
}
