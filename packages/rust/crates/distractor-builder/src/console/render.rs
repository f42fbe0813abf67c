//! Plain-text rendering of rows and conversations.

use std::fmt::Write as _;

use serde_json::Value;

use distractor_core::{DatasetRow, canonical_turns};

/// Render a conversation turn by turn, or as raw text when it does not
/// normalize to role/content turns.
#[must_use]
pub fn render_conversation(value: &Value) -> String {
    let Some(turns) = canonical_turns(value) else {
        let raw = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return format!("Conversation (raw):\n{raw}\n");
    };
    let mut out = String::new();
    for turn in &turns {
        let _ = writeln!(out, "[{}]\n{}", turn.role(), turn.content());
    }
    out
}

/// Full view of a dataset row.
#[must_use]
pub fn render_row(row: &DatasetRow) -> String {
    format!(
        "Domain: `{}`  •  Row: {}\n\n## Scenario\n{}\n\n## System Instruction\n{}\n\n## Conversation\n{}",
        row.domain(),
        row.index(),
        row.get("scenario"),
        row.get("system_instruction"),
        render_conversation(&row.conversation()),
    )
}
