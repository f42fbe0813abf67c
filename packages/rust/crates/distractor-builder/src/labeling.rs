//! Labeling log for previously generated distractors.
//!
//! Each judgment is keyed by `(entry_idx, pair_idx)`: the record's position in
//! the full source file and the distractor's position within that record.
//! Keys already present in the log are skipped, which is what lets a labeling
//! run resume where it stopped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use distractor_core::{NormalizedConversation, normalize};

use crate::persistence::atomic_write_text;
use crate::source::text_field;

/// Shown when no assistant reply follows the distractor.
pub const RESPONSE_NOT_FOUND: &str = "[Assistant response not found]";

/// Placeholder for judgments that do not apply.
pub const NOT_APPLICABLE: &str = "NA";

/// Log file name for a domain.
#[must_use]
pub fn label_log_file_name(domain: &str) -> String {
    format!("annotations_{domain}_distractor_pairs.json")
}

/// Failures reading or writing the label log.
#[derive(Debug, Error)]
pub enum LabelLogError {
    #[error("failed to read label log {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse label log {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize label log")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write label log {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One recorded judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub entry_idx: usize,
    pub pair_idx: usize,
    pub role: String,
    /// The distractor text that was judged.
    pub content: String,
    pub label: String,
    #[serde(rename = "type")]
    pub distractor_type: String,
    pub difficulty: String,
    pub fooled_llm: String,
    pub notes: String,
}

/// Answers collected for one distractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgement {
    pub label: String,
    pub distractor_type: String,
    pub difficulty: String,
    pub fooled_llm: String,
    pub notes: String,
}

impl Judgement {
    /// Judgment for a label that is not `distractor`: detail fields default.
    #[must_use]
    pub fn plain(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            distractor_type: NOT_APPLICABLE.to_string(),
            difficulty: NOT_APPLICABLE.to_string(),
            fooled_llm: "no".to_string(),
            notes: String::new(),
        }
    }

    /// Whether a label asks for the distractor detail questions.
    #[must_use]
    pub fn wants_details(label: &str) -> bool {
        label.to_lowercase() == "distractor"
    }

    /// Attach the judgment to a pair key.
    #[must_use]
    pub fn into_entry(self, entry_idx: usize, pair_idx: usize, content: &str) -> LabelEntry {
        LabelEntry {
            entry_idx,
            pair_idx,
            role: "user".to_string(),
            content: content.to_string(),
            label: self.label,
            distractor_type: self.distractor_type,
            difficulty: self.difficulty,
            fooled_llm: self.fooled_llm,
            notes: self.notes,
        }
    }
}

/// Append-only judgment log, rewritten after every entry.
#[derive(Debug, Clone)]
pub struct LabelLog {
    path: PathBuf,
    entries: Vec<LabelEntry>,
    seen: HashSet<(usize, usize)>,
}

impl LabelLog {
    /// Open the log at `path`, starting empty when it does not exist.
    ///
    /// # Errors
    ///
    /// Fails when an existing log cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LabelLogError> {
        let path = path.into();
        let entries: Vec<LabelEntry> = if path.exists() {
            let raw = match std::fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(source) => return Err(LabelLogError::Read { path, source }),
            };
            match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(source) => return Err(LabelLogError::Parse { path, source }),
            }
        } else {
            Vec::new()
        };
        let seen = entries
            .iter()
            .map(|entry| (entry.entry_idx, entry.pair_idx))
            .collect();
        if !entries.is_empty() {
            tracing::info!(
                path = %path.display(),
                entries = entries.len(),
                "loaded existing annotations, resuming"
            );
        }
        Ok(Self {
            path,
            entries,
            seen,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether this exact key has been judged already.
    #[must_use]
    pub fn contains(&self, entry_idx: usize, pair_idx: usize) -> bool {
        self.seen.contains(&(entry_idx, pair_idx))
    }

    /// Add an entry and persist the whole log.
    ///
    /// # Errors
    ///
    /// Fails when the log cannot be written; the entry stays in memory.
    pub fn record(&mut self, entry: LabelEntry) -> Result<(), LabelLogError> {
        self.seen.insert((entry.entry_idx, entry.pair_idx));
        self.entries.push(entry);
        self.save()
    }

    fn save(&self) -> Result<(), LabelLogError> {
        let content =
            serde_json::to_string_pretty(&self.entries).map_err(LabelLogError::Serialize)?;
        atomic_write_text(&self.path, &content).map_err(|source| LabelLogError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// One distractor of a source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDistractor {
    pub distractor: String,
    pub bot_turn: String,
}

/// Distractors listed in a source record's `distractors` field, trimmed.
#[must_use]
pub fn source_distractors(record: &Value) -> Vec<SourceDistractor> {
    let Some(field) = record.get("distractors") else {
        return Vec::new();
    };
    sequence_of(field)
        .iter()
        .map(|item| SourceDistractor {
            distractor: text_field(item, "distractor").trim().to_string(),
            bot_turn: text_field(item, "bot turn").trim().to_string(),
        })
        .collect()
}

/// Assistant reply that follows `distractor` in any conversation block.
///
/// Scans blocks in order for a `user` turn whose trimmed content equals the
/// trimmed distractor and that is immediately followed by an `assistant`
/// turn.
#[must_use]
pub fn find_assistant_response(blocks: &Value, distractor: &str) -> Option<String> {
    let distractor = distractor.trim();
    sequence_of(blocks).iter().find_map(|block| {
        sequence_of(block).windows(2).find_map(|window| {
            let (asked, reply) = (&window[0], &window[1]);
            let matches = text_field(asked, "role") == "user"
                && text_field(asked, "content").trim() == distractor
                && text_field(reply, "role") == "assistant";
            matches.then(|| text_field(reply, "content").trim().to_string())
        })
    })
}

/// Native arrays as is (of any element type); text decoded through the
/// conversation normalizer.
fn sequence_of(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => match normalize(other) {
            NormalizedConversation::Turns(items) => items,
            NormalizedConversation::Raw(_) => Vec::new(),
        },
    }
}

/// Distinct domains in first-appearance order.
#[must_use]
pub fn unique_domains(records: &[Value]) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();
    for record in records {
        let domain = text_field(record, "domain");
        if !domains.iter().any(|known| known == domain) {
            domains.push(domain.to_string());
        }
    }
    domains
}
