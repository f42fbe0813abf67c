//! Draft session: the annotator's in-progress work on one dataset row.
//!
//! Owned by the front end and handed to the stateless core as plain
//! arguments. Nothing here touches the filesystem.

use chrono::{DateTime, Utc};
use serde_json::Value;

use distractor_core::{DatasetRow, last_assistant_turn, to_json_text};

/// One composed distractor with the bot turn it should follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistractorPair {
    /// Assistant utterance the distractor follows.
    pub bot_turn: String,
    /// The distractor user turn.
    pub distractor: String,
    /// Per-pair target instruction. Never written to the distractor column.
    pub target_instruction: String,
}

/// The text fields currently being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairDraft {
    pub bot_turn: String,
    pub distractor: String,
    pub target_instruction: String,
}

impl PairDraft {
    /// Whether the draft has enough to become a pair.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.bot_turn.trim().is_empty() && !self.distractor.trim().is_empty()
    }
}

/// Session context for one annotator.
#[derive(Debug, Clone, Default)]
pub struct DraftSession {
    current_index: Option<usize>,
    pairs: Vec<DistractorPair>,
    /// Pair being composed.
    pub draft: PairDraft,
    /// Fallback target instruction for the whole row.
    pub global_target: String,
    last_saved: Option<DateTime<Utc>>,
}

impl DraftSession {
    /// Start an empty session with no row loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a row, discarding pairs and draft.
    pub fn load_row(&mut self, row: &DatasetRow) {
        self.current_index = Some(row.index());
        self.pairs.clear();
        self.draft = PairDraft::default();
        self.global_target = row.get("system_instruction").to_string();
        self.last_saved = None;
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    #[must_use]
    pub fn pairs(&self) -> &[DistractorPair] {
        &self.pairs
    }

    #[must_use]
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    /// Seed the draft bot turn from the conversation's last assistant turn.
    pub fn prefill_bot_turn(&mut self, conversation: &Value) {
        self.draft.bot_turn = last_assistant_turn(conversation);
    }

    /// Move the draft into the pair list.
    ///
    /// Returns `false` and leaves the draft untouched when the bot turn or
    /// distractor is blank.
    pub fn add_pair(&mut self) -> bool {
        if !self.draft.is_complete() {
            return false;
        }
        let draft = std::mem::take(&mut self.draft);
        self.pairs.push(DistractorPair {
            bot_turn: draft.bot_turn.trim().to_string(),
            distractor: draft.distractor.trim().to_string(),
            target_instruction: draft.target_instruction.trim().to_string(),
        });
        true
    }

    /// Remove the pair at `index` (0-based).
    pub fn remove_pair(&mut self, index: usize) -> Option<DistractorPair> {
        (index < self.pairs.len()).then(|| self.pairs.remove(index))
    }

    pub fn clear_pairs(&mut self) {
        self.pairs.clear();
    }

    /// A row can be saved once it has at least one pair.
    #[must_use]
    pub fn can_save(&self) -> bool {
        !self.pairs.is_empty()
    }

    /// Value for the `target_system_instruction` column.
    #[must_use]
    pub fn target_payload(&self) -> String {
        target_payload(&self.pairs, &self.global_target)
    }

    pub fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.last_saved = Some(at);
    }
}

/// Per-pair mode when any pair carries a target: a JSON list aligned with
/// `pairs`. Otherwise the trimmed global target.
#[must_use]
pub fn target_payload(pairs: &[DistractorPair], global_target: &str) -> String {
    let per_pair: Vec<&str> = pairs
        .iter()
        .map(|pair| pair.target_instruction.trim())
        .collect();
    if per_pair.iter().any(|target| !target.is_empty()) {
        to_json_text(&Value::from(per_pair))
    } else {
        global_target.trim().to_string()
    }
}
