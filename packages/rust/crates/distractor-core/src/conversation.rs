//! Conversation normalization.
//!
//! Conversation cells reach us in whatever shape the previous pipeline stage
//! produced: native lists of turns, strict JSON text, or JSON-ish text written
//! with single quotes. [`normalize`] runs an ordered chain of fallible parse
//! attempts and degrades to passing the input through untouched, so it never
//! fails on the rendering path.

use serde_json::Value;

use crate::json::to_json_text;

/// A single parse attempt in the normalization chain.
///
/// Returns `Some(turns)` when the attempt recognises the input, `None` to hand
/// over to the next attempt.
pub type ParseAttempt = fn(&Value) -> Option<Vec<Value>>;

/// Parse attempts in resolution order. First success wins.
pub const PARSE_CHAIN: &[(&str, ParseAttempt)] = &[
    ("structured", parse_structured),
    ("blank_text", parse_blank_text),
    ("strict_json", parse_strict_json),
    ("single_quoted_json", parse_single_quoted_json),
];

/// Outcome of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedConversation {
    /// Ordered sequence of decoded turns, in conversation order.
    Turns(Vec<Value>),
    /// Input that is not a structured conversation, returned as given.
    Raw(Value),
}

impl NormalizedConversation {
    /// Whether normalization produced a turn sequence.
    #[must_use]
    pub fn is_turns(&self) -> bool {
        matches!(self, Self::Turns(_))
    }

    /// Serialize as cell JSON text. Non-ASCII text is kept verbatim and
    /// object keys keep their source order.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        match self {
            Self::Turns(items) => to_json_text(&Value::Array(items.clone())),
            Self::Raw(value) => to_json_text(value),
        }
    }
}

/// Speaker of a turn. Anything that is not `assistant` is a user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Human side of the conversation.
    User,
    /// Model side of the conversation.
    Assistant,
}

impl Role {
    /// Resolve a free-form role label (case-insensitive).
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        if raw.to_lowercase() == "assistant" {
            Self::Assistant
        } else {
            Self::User
        }
    }

    fn of_value(value: Option<&Value>) -> Self {
        value.and_then(Value::as_str).map_or(Self::User, Self::resolve)
    }

    /// Canonical label (`user` / `assistant`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    /// Read a turn out of a decoded mapping.
    ///
    /// Returns `None` unless the value is an object carrying both a `role`
    /// and a `content` key.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let role = object.get("role")?;
        let content = object.get("content")?;
        Some(Self {
            role: Role::of_value(Some(role)),
            content: text_of(content),
        })
    }

    /// Resolved speaker.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Turn text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Normalize a loosely-typed conversation value.
///
/// Never fails: unrecognised input comes back as [`NormalizedConversation::Raw`].
#[must_use]
pub fn normalize(value: &Value) -> NormalizedConversation {
    for (name, attempt) in PARSE_CHAIN {
        if let Some(turns) = attempt(value) {
            tracing::trace!(attempt = *name, turns = turns.len(), "conversation normalized");
            return NormalizedConversation::Turns(turns);
        }
    }
    tracing::trace!("conversation left as raw value");
    NormalizedConversation::Raw(value.clone())
}

/// Normalize and view the result as canonical turns.
///
/// `Some` only when every element is a mapping with `role` and `content`;
/// this is what decides turn-by-turn rendering versus raw display.
#[must_use]
pub fn canonical_turns(value: &Value) -> Option<Vec<Turn>> {
    match normalize(value) {
        NormalizedConversation::Turns(items) => items.iter().map(Turn::from_value).collect(),
        NormalizedConversation::Raw(_) => None,
    }
}

/// Content of the last assistant turn, trimmed. Empty when there is none.
#[must_use]
pub fn last_assistant_turn(value: &Value) -> String {
    let NormalizedConversation::Turns(items) = normalize(value) else {
        return String::new();
    };
    items
        .iter()
        .rev()
        .filter_map(Value::as_object)
        .find(|turn| Role::of_value(turn.get("role")) == Role::Assistant)
        .and_then(|turn| turn.get("content"))
        .map(|content| text_of(content).trim().to_string())
        .unwrap_or_default()
}

/// Already a sequence of mappings: keep it as is.
#[must_use]
pub fn parse_structured(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) if items.iter().all(Value::is_object) => Some(items.clone()),
        _ => None,
    }
}

/// Empty or whitespace-only text is an empty conversation.
#[must_use]
pub fn parse_blank_text(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::String(text) if text.trim().is_empty() => Some(Vec::new()),
        _ => None,
    }
}

/// Strict JSON: an array, or a single object wrapped as one turn.
#[must_use]
pub fn parse_strict_json(value: &Value) -> Option<Vec<Value>> {
    decode_turns(value.as_str()?.trim())
}

/// Single quotes used in place of double quotes.
///
/// Only tried when the text has no double quote at all, since a blanket
/// substitution would corrupt mixed quoting.
#[must_use]
pub fn parse_single_quoted_json(value: &Value) -> Option<Vec<Value>> {
    let text = value.as_str()?.trim();
    if !text.contains('\'') || text.contains('"') {
        return None;
    }
    decode_turns(&text.replace('\'', "\""))
}

fn decode_turns(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(items),
        object @ Value::Object(_) => Some(vec![object]),
        _ => None,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
