//! Source records: JSON Lines as published by the upstream dataset.

use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Read one JSON object per non-blank line.
///
/// # Errors
///
/// Fails on unreadable files, invalid JSON, or lines that are not objects.
pub fn read_source_records(path: &Path) -> Result<Vec<Value>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open source file {}", path.display()))?;
    let mut records = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid JSON record", path.display(), number + 1))?;
        if !value.is_object() {
            bail!("{}:{}: record is not a JSON object", path.display(), number + 1);
        }
        records.push(value);
    }
    tracing::debug!(path = %path.display(), records = records.len(), "source records loaded");
    Ok(records)
}

/// String field of a record, or `""`.
#[must_use]
pub fn text_field<'a>(record: &'a Value, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or("")
}
