//! Output record assembly and the per-domain save.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use distractor_core::{AnnotationRecord, DatasetRow, append, normalize, to_json_text};

use crate::session::DistractorPair;

/// Column order of every output store.
pub const OUTPUT_COLUMNS: [&str; 7] = [
    "timestamp",
    "domain",
    "scenario",
    "system_instruction",
    "target_system_instruction",
    "conversation_json",
    "distractors",
];

/// JSON text for the `distractors` column.
///
/// Each item carries exactly `bot turn` and `distractor`; per-pair targets
/// are stripped.
#[must_use]
pub fn distractors_json(pairs: &[DistractorPair]) -> String {
    let persisted: Vec<Value> = pairs
        .iter()
        .map(|pair| {
            let mut item = Map::new();
            item.insert("bot turn".to_string(), Value::from(pair.bot_turn.as_str()));
            item.insert("distractor".to_string(), Value::from(pair.distractor.as_str()));
            Value::Object(item)
        })
        .collect();
    to_json_text(&Value::Array(persisted))
}

/// Timestamp format of the `timestamp` column.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Build the output record for one saved row.
#[must_use]
pub fn build_output_record(
    row: &DatasetRow,
    pairs: &[DistractorPair],
    target_payload: &str,
    at: DateTime<Utc>,
) -> AnnotationRecord {
    let conversation_json = normalize(&row.conversation()).to_json_string();
    AnnotationRecord::from([
        ("timestamp".to_string(), format_timestamp(at)),
        ("domain".to_string(), row.get("domain").to_string()),
        ("scenario".to_string(), row.get("scenario").to_string()),
        (
            "system_instruction".to_string(),
            row.get("system_instruction").to_string(),
        ),
        (
            "target_system_instruction".to_string(),
            target_payload.trim().to_string(),
        ),
        ("conversation_json".to_string(), conversation_json),
        ("distractors".to_string(), distractors_json(pairs)),
    ])
}

/// Store file for `domain` under `output_dir`.
///
/// Path separators in the domain are replaced so the store always lands
/// directly in `output_dir`.
#[must_use]
pub fn store_path(output_dir: &Path, domain: &str) -> PathBuf {
    let file_stem: String = domain
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    output_dir.join(format!("{file_stem}.csv"))
}

/// Append one row of distractor pairs to the domain's store.
///
/// Returns the path written to.
///
/// # Errors
///
/// Fails when the output directory cannot be created or the append fails.
pub fn save_distractor_row(
    output_dir: &Path,
    row: &DatasetRow,
    pairs: &[DistractorPair],
    target_payload: &str,
    at: DateTime<Utc>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    let path = store_path(output_dir, row.domain());
    let record = build_output_record(row, pairs, target_payload, at);
    append(&path, &record, &OUTPUT_COLUMNS)
        .with_context(|| format!("failed to append to {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        row = row.index(),
        pairs = pairs.len(),
        "saved distractor row"
    );
    Ok(path)
}
