//! Tests for conversation normalization and last-assistant extraction.

use serde_json::json;

use distractor_core::{
    NormalizedConversation, Role, canonical_turns, last_assistant_turn, normalize,
    parse_strict_json,
};

#[test]
fn test_structured_sequence_passes_through() {
    let value = json!([
        {"role": "USER", "content": "hi", "extra": 1},
        {"speaker": "bot"}
    ]);
    let expected = value.as_array().unwrap().clone();
    assert_eq!(normalize(&value), NormalizedConversation::Turns(expected));
}

#[test]
fn test_json_array_text_decodes() {
    let value = json!(r#"[{"role":"user","content":"hi"}]"#);
    let NormalizedConversation::Turns(turns) = normalize(&value) else {
        panic!("expected turns");
    };
    assert_eq!(turns, vec![json!({"role": "user", "content": "hi"})]);
}

#[test]
fn test_single_object_text_is_wrapped() {
    let value = json!(r#"{"role":"assistant","content":"hello"}"#);
    assert_eq!(
        normalize(&value),
        NormalizedConversation::Turns(vec![json!({"role": "assistant", "content": "hello"})])
    );
}

#[test]
fn test_single_quoted_text_matches_double_quoted() {
    let single = normalize(&json!("[{'role': 'user', 'content': 'hi'}]"));
    let double = normalize(&json!(r#"[{"role": "user", "content": "hi"}]"#));
    assert!(single.is_turns());
    assert_eq!(single, double);
}

#[test]
fn test_opaque_text_is_returned_unchanged() {
    let value = json!("not a conversation at all");
    assert_eq!(normalize(&value), NormalizedConversation::Raw(value.clone()));
}

#[test]
fn test_blank_text_is_empty_sequence() {
    assert_eq!(normalize(&json!("")), NormalizedConversation::Turns(vec![]));
    assert_eq!(normalize(&json!("  \n\t ")), NormalizedConversation::Turns(vec![]));
}

#[test]
fn test_other_scalars_are_returned_unchanged() {
    for value in [json!(7), json!(null), json!(true), json!([1, 2])] {
        assert_eq!(normalize(&value), NormalizedConversation::Raw(value.clone()));
    }
}

#[test]
fn test_normalize_is_deterministic() {
    let value = json!("[{'role': 'assistant', 'content': 'ok'}]");
    assert_eq!(normalize(&value), normalize(&value));
}

#[test]
fn test_strict_json_attempt_ignores_non_text() {
    assert!(parse_strict_json(&json!([{"role": "user"}])).is_none());
    assert!(parse_strict_json(&json!("\"just a string\"")).is_none());
}

#[test]
fn test_last_assistant_turn_searches_backwards() {
    let value = json!([
        {"role": "user", "content": "hi"},
        {"role": "assistant", "content": "hello"},
        {"role": "user", "content": "bye"}
    ]);
    assert_eq!(last_assistant_turn(&value), "hello");
}

#[test]
fn test_last_assistant_turn_without_assistant_is_empty() {
    let value = json!([{"role": "user", "content": "hi"}]);
    assert_eq!(last_assistant_turn(&value), "");
    assert_eq!(last_assistant_turn(&json!("plain text")), "");
}

#[test]
fn test_last_assistant_turn_from_text_is_trimmed_and_case_insensitive() {
    let value = json!(
        r#"[{"role":"Assistant","content":"  first "},{"role":"user","content":"q"},{"role":"ASSISTANT","content":" second  "}]"#
    );
    assert_eq!(last_assistant_turn(&value), "second");
}

#[test]
fn test_canonical_turns_relabels_roles() {
    let value = json!([
        {"role": "system", "content": "rules"},
        {"role": "Assistant", "content": "hello"}
    ]);
    let turns = canonical_turns(&value).unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role(), Role::User);
    assert_eq!(turns[1].role(), Role::Assistant);
    assert_eq!(turns[1].content(), "hello");
}

#[test]
fn test_canonical_turns_rejects_turns_without_content() {
    let value = json!([{"role": "user", "content": "hi"}, {"role": "assistant"}]);
    assert!(canonical_turns(&value).is_none());
    assert!(canonical_turns(&json!("free text")).is_none());
}

#[test]
fn test_to_json_string_keeps_key_order_and_unicode() {
    let value = json!(r#"[{"role":"user","content":"héllo"}]"#);
    assert_eq!(
        normalize(&value).to_json_string(),
        r#"[{"role": "user", "content": "héllo"}]"#
    );
    assert_eq!(
        normalize(&json!("raw text")).to_json_string(),
        r#""raw text""#
    );
}
